//! Mutation requests understood by the remote slides service.
//!
//! Each variant serializes to one entry of a `batchUpdate` request list, e.g.
//! `{"deleteObject": {"objectId": "p3"}}`. Requests address objects by
//! identity, never by position.

use serde::{Deserialize, Serialize};

use super::{AffineTransform, ObjectId, Size, SlideId};

/// One entry of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    DeleteObject(DeleteObject),
    DuplicateObject(DuplicateObject),
    UpdateSlidesPosition(UpdateSlidesPosition),
    DeleteText(DeleteText),
    InsertText(InsertText),
    CreateParagraphBullets(CreateParagraphBullets),
    CreateImage(CreateImage),
    CreateTable(CreateTable),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteObject {
    pub object_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateObject {
    pub object_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlidesPosition {
    pub slide_object_ids: Vec<String>,
    /// Index in the arrangement *before* the move takes place.
    pub insertion_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeType {
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    #[serde(rename = "type")]
    pub kind: RangeType,
}

impl TextRange {
    pub const ALL: TextRange = TextRange {
        kind: RangeType::All,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteText {
    pub object_id: String,
    pub text_range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellLocation {
    pub row_index: usize,
    pub column_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertText {
    pub object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_location: Option<CellLocation>,
    pub text: String,
    pub insertion_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParagraphBullets {
    pub object_id: String,
    pub bullet_preset: String,
    pub text_range: TextRange,
}

/// Placement of a new page element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProperties {
    pub page_object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AffineTransform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImage {
    pub object_id: String,
    pub url: String,
    pub element_properties: ElementProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTable {
    pub object_id: String,
    pub element_properties: ElementProperties,
    pub rows: usize,
    pub columns: usize,
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl Request {
    pub fn delete_object(id: impl AsRef<str>) -> Self {
        Request::DeleteObject(DeleteObject {
            object_id: id.as_ref().to_string(),
        })
    }

    pub fn duplicate_object(id: &SlideId) -> Self {
        Request::DuplicateObject(DuplicateObject {
            object_id: id.0.clone(),
        })
    }

    pub fn reposition(id: &SlideId, insertion_index: usize) -> Self {
        Request::UpdateSlidesPosition(UpdateSlidesPosition {
            slide_object_ids: vec![id.0.clone()],
            insertion_index,
        })
    }

    pub fn clear_text(id: &ObjectId) -> Self {
        Request::DeleteText(DeleteText {
            object_id: id.0.clone(),
            text_range: TextRange::ALL,
        })
    }

    pub fn insert_text(id: &ObjectId, text: impl Into<String>) -> Self {
        Request::InsertText(InsertText {
            object_id: id.0.clone(),
            cell_location: None,
            text: text.into(),
            insertion_index: 0,
        })
    }

    pub fn insert_cell_text(
        table: &ObjectId,
        row_index: usize,
        column_index: usize,
        text: impl Into<String>,
    ) -> Self {
        Request::InsertText(InsertText {
            object_id: table.0.clone(),
            cell_location: Some(CellLocation {
                row_index,
                column_index,
            }),
            text: text.into(),
            insertion_index: 0,
        })
    }

    pub fn bullets(id: &ObjectId, preset: impl Into<String>) -> Self {
        Request::CreateParagraphBullets(CreateParagraphBullets {
            object_id: id.0.clone(),
            bullet_preset: preset.into(),
            text_range: TextRange::ALL,
        })
    }

    pub fn create_image(
        id: ObjectId,
        url: impl Into<String>,
        page: &SlideId,
        size: Size,
        transform: AffineTransform,
    ) -> Self {
        Request::CreateImage(CreateImage {
            object_id: id.0,
            url: url.into(),
            element_properties: ElementProperties {
                page_object_id: page.0.clone(),
                size: Some(size),
                transform: Some(transform),
            },
        })
    }

    pub fn create_table(id: ObjectId, page: &SlideId, rows: usize, columns: usize) -> Self {
        Request::CreateTable(CreateTable {
            object_id: id.0,
            element_properties: ElementProperties {
                page_object_id: page.0.clone(),
                size: None,
                transform: None,
            },
            rows,
            columns,
        })
    }

    /// Short name used in logs and run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::DeleteObject(_) => "deleteObject",
            Request::DuplicateObject(_) => "duplicateObject",
            Request::UpdateSlidesPosition(_) => "updateSlidesPosition",
            Request::DeleteText(_) => "deleteText",
            Request::InsertText(_) => "insertText",
            Request::CreateParagraphBullets(_) => "createParagraphBullets",
            Request::CreateImage(_) => "createImage",
            Request::CreateTable(_) => "createTable",
        }
    }
}
