//! In-memory deck that applies batches with the remote service's semantics.
//!
//! - slides and elements are addressed by identity
//! - `duplicateObject` on a slide inserts the copy right after the original
//! - `updateSlidesPosition` takes an insertion index in the arrangement
//!   *before* the move
//! - a batch is validated against a scratch copy and committed only if every
//!   request applies; a rejected batch leaves the deck untouched
//!
//! Used by `deckmatch plan` and throughout the test suite.

use deckmatch_core::types::{Label, Template};

use super::request::{CreateImage, CreateTable, InsertText, UpdateSlidesPosition};
use super::{
    BatchReply, DeckSnapshot, Element, ElementKind, GatewayError, ObjectId, Request,
    SlideGateway, SlideId, SlideSnapshot,
};

#[derive(Debug, Clone, PartialEq)]
struct MemoryElement {
    element: Element,
    text: String,
    bulleted: bool,
    image_url: Option<String>,
    cells: Vec<Vec<String>>,
}

impl MemoryElement {
    fn new(element: Element) -> Self {
        Self {
            element,
            text: String::new(),
            bulleted: false,
            image_url: None,
            cells: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct MemorySlide {
    id: SlideId,
    layout: Option<Label>,
    elements: Vec<MemoryElement>,
}

/// Observable state of one element, for assertions and plan output.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub id: ObjectId,
    pub kind: ElementKind,
    pub text: String,
    pub bulleted: bool,
    pub image_url: Option<String>,
    pub cells: Vec<Vec<String>>,
}

/// A deck held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryDeck {
    presentation_id: String,
    slides: Vec<MemorySlide>,
    batches: Vec<Vec<Request>>,
    next_copy: usize,
    reject_batch: Option<usize>,
    submitted: usize,
}

impl MemoryDeck {
    /// One slide per label, each with a title and a body placeholder.
    pub fn from_labels(labels: &[Label]) -> Self {
        let snapshot = labels
            .iter()
            .enumerate()
            .map(|(i, label)| SlideSnapshot {
                id: SlideId(format!("slide_{i}")),
                layout: Some(label.clone()),
                elements: vec![
                    Element::text(&format!("slide_{i}_title"), Some("TITLE")),
                    Element::text(&format!("slide_{i}_body"), Some("BODY")),
                ],
            })
            .collect();
        Self::from_snapshot("memory", snapshot)
    }

    /// Seed from a snapshot of a live deck.
    pub fn from_snapshot(presentation_id: &str, snapshot: DeckSnapshot) -> Self {
        Self {
            presentation_id: presentation_id.to_string(),
            slides: snapshot
                .into_iter()
                .map(|s| MemorySlide {
                    id: s.id,
                    layout: s.layout,
                    elements: s.elements.into_iter().map(MemoryElement::new).collect(),
                })
                .collect(),
            batches: Vec::new(),
            next_copy: 0,
            reject_batch: None,
            submitted: 0,
        }
    }

    /// Replace the elements of the slide at `position`.
    pub fn set_elements(&mut self, position: usize, elements: Vec<Element>) {
        if let Some(slide) = self.slides.get_mut(position) {
            slide.elements = elements.into_iter().map(MemoryElement::new).collect();
        }
    }

    /// Reject the `index`-th batch submitted from now on (0-based) with HTTP 500.
    pub fn reject_batch(&mut self, index: usize) {
        self.reject_batch = Some(self.submitted + index);
    }

    /// Layout label per slide; unlabeled slides show as `?`.
    pub fn labels(&self) -> Template {
        self.slides
            .iter()
            .map(|s| s.layout.clone().unwrap_or_else(|| Label::from("?")))
            .collect()
    }

    pub fn slide_ids(&self) -> Vec<SlideId> {
        self.slides.iter().map(|s| s.id.clone()).collect()
    }

    /// Every batch accepted so far, in submission order.
    pub fn batches(&self) -> &[Vec<Request>] {
        &self.batches
    }

    /// Number of accepted requests of the given kind (see [`Request::kind`]).
    pub fn count_requests(&self, kind: &str) -> usize {
        self.batches
            .iter()
            .flatten()
            .filter(|r| r.kind() == kind)
            .count()
    }

    /// Element states of the slide at `position`.
    pub fn elements(&self, position: usize) -> Vec<ElementState> {
        self.slides
            .get(position)
            .map(|s| {
                s.elements
                    .iter()
                    .map(|e| ElementState {
                        id: e.element.id.clone(),
                        kind: e.element.kind,
                        text: e.text.clone(),
                        bulleted: e.bulleted,
                        image_url: e.image_url.clone(),
                        cells: e.cells.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn slide_index(&self, id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id.0 == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut MemoryElement> {
        self.slides
            .iter_mut()
            .flat_map(|s| s.elements.iter_mut())
            .find(|e| e.element.id.0 == id)
    }

    fn object_exists(&self, id: &str) -> bool {
        self.slide_index(id).is_some()
            || self
                .slides
                .iter()
                .flat_map(|s| s.elements.iter())
                .any(|e| e.element.id.0 == id)
    }

    fn apply(&mut self, request: &Request) -> Result<serde_json::Value, String> {
        match request {
            Request::DeleteObject(r) => {
                if let Some(idx) = self.slide_index(&r.object_id) {
                    self.slides.remove(idx);
                    return Ok(serde_json::Value::Null);
                }
                for slide in &mut self.slides {
                    if let Some(pos) = slide
                        .elements
                        .iter()
                        .position(|e| e.element.id.0 == r.object_id)
                    {
                        slide.elements.remove(pos);
                        return Ok(serde_json::Value::Null);
                    }
                }
                Err(format!("no object with id '{}'", r.object_id))
            }
            Request::DuplicateObject(r) => {
                let idx = self
                    .slide_index(&r.object_id)
                    .ok_or_else(|| format!("no slide with id '{}'", r.object_id))?;
                self.next_copy += 1;
                let suffix = format!("_copy{}", self.next_copy);
                let mut copy = self.slides[idx].clone();
                copy.id = SlideId(format!("{}{suffix}", copy.id));
                for e in &mut copy.elements {
                    e.element.id = ObjectId(format!("{}{suffix}", e.element.id));
                }
                let new_id = copy.id.0.clone();
                self.slides.insert(idx + 1, copy);
                Ok(serde_json::json!({"duplicateObject": {"objectId": new_id}}))
            }
            Request::UpdateSlidesPosition(r) => self.reposition(r).map(|_| serde_json::Value::Null),
            Request::DeleteText(r) => {
                let e = self
                    .element_mut(&r.object_id)
                    .ok_or_else(|| format!("no element with id '{}'", r.object_id))?;
                if e.element.kind != ElementKind::Text {
                    return Err(format!("'{}' holds no text", r.object_id));
                }
                e.text.clear();
                e.bulleted = false;
                Ok(serde_json::Value::Null)
            }
            Request::InsertText(r) => self.insert_text(r).map(|_| serde_json::Value::Null),
            Request::CreateParagraphBullets(r) => {
                let e = self
                    .element_mut(&r.object_id)
                    .ok_or_else(|| format!("no element with id '{}'", r.object_id))?;
                e.bulleted = true;
                Ok(serde_json::Value::Null)
            }
            Request::CreateImage(r) => self.create_image(r),
            Request::CreateTable(r) => self.create_table(r),
        }
    }

    fn reposition(&mut self, r: &UpdateSlidesPosition) -> Result<(), String> {
        if r.insertion_index > self.slides.len() {
            return Err(format!(
                "insertion index {} exceeds slide count {}",
                r.insertion_index,
                self.slides.len()
            ));
        }
        let mut moving = Vec::with_capacity(r.slide_object_ids.len());
        let mut before_insertion = 0;
        for id in &r.slide_object_ids {
            let idx = self
                .slide_index(id)
                .ok_or_else(|| format!("no slide with id '{id}'"))?;
            moving.push(idx);
        }
        moving.sort_unstable();
        let mut block = Vec::with_capacity(moving.len());
        for &idx in moving.iter().rev() {
            if idx < r.insertion_index {
                before_insertion += 1;
            }
            block.push(self.slides.remove(idx));
        }
        block.reverse();
        let at = r.insertion_index - before_insertion;
        for (offset, slide) in block.into_iter().enumerate() {
            self.slides.insert(at + offset, slide);
        }
        Ok(())
    }

    fn insert_text(&mut self, r: &InsertText) -> Result<(), String> {
        let e = self
            .element_mut(&r.object_id)
            .ok_or_else(|| format!("no element with id '{}'", r.object_id))?;
        match r.cell_location {
            Some(cell) => {
                let target = e
                    .cells
                    .get_mut(cell.row_index)
                    .and_then(|row| row.get_mut(cell.column_index))
                    .ok_or_else(|| {
                        format!(
                            "cell ({}, {}) outside table '{}'",
                            cell.row_index, cell.column_index, r.object_id
                        )
                    })?;
                target.insert_str(0, &r.text);
            }
            None => {
                if e.element.kind != ElementKind::Text {
                    return Err(format!("'{}' holds no text", r.object_id));
                }
                let byte_at = e
                    .text
                    .char_indices()
                    .nth(r.insertion_index)
                    .map(|(b, _)| b)
                    .or_else(|| (r.insertion_index == e.text.chars().count()).then(|| e.text.len()))
                    .ok_or_else(|| format!("insertion index {} out of range", r.insertion_index))?;
                e.text.insert_str(byte_at, &r.text);
            }
        }
        Ok(())
    }

    fn create_image(&mut self, r: &CreateImage) -> Result<serde_json::Value, String> {
        if self.object_exists(&r.object_id) {
            return Err(format!("object id '{}' already in use", r.object_id));
        }
        let page = &r.element_properties.page_object_id;
        let idx = self
            .slide_index(page)
            .ok_or_else(|| format!("no slide with id '{page}'"))?;
        let mut element = MemoryElement::new(Element::image(
            &r.object_id,
            r.element_properties.size.clone(),
            r.element_properties.transform.clone(),
        ));
        element.image_url = Some(r.url.clone());
        self.slides[idx].elements.push(element);
        Ok(serde_json::json!({"createImage": {"objectId": r.object_id}}))
    }

    fn create_table(&mut self, r: &CreateTable) -> Result<serde_json::Value, String> {
        if self.object_exists(&r.object_id) {
            return Err(format!("object id '{}' already in use", r.object_id));
        }
        if r.rows == 0 || r.columns == 0 {
            return Err("table needs at least one row and one column".to_string());
        }
        let page = &r.element_properties.page_object_id;
        let idx = self
            .slide_index(page)
            .ok_or_else(|| format!("no slide with id '{page}'"))?;
        let mut element = MemoryElement::new(Element {
            id: ObjectId(r.object_id.clone()),
            kind: ElementKind::Table,
            placeholder: None,
            size: None,
            transform: None,
        });
        element.cells = vec![vec![String::new(); r.columns]; r.rows];
        self.slides[idx].elements.push(element);
        Ok(serde_json::json!({"createTable": {"objectId": r.object_id}}))
    }
}

impl SlideGateway for MemoryDeck {
    fn presentation_id(&self) -> &str {
        &self.presentation_id
    }

    fn snapshot(&mut self) -> Result<DeckSnapshot, GatewayError> {
        Ok(self
            .slides
            .iter()
            .map(|s| SlideSnapshot {
                id: s.id.clone(),
                layout: s.layout.clone(),
                elements: s.elements.iter().map(|e| e.element.clone()).collect(),
            })
            .collect())
    }

    fn submit_batch(&mut self, requests: &[Request]) -> Result<BatchReply, GatewayError> {
        let attempt = self.submitted;
        self.submitted += 1;
        if self.reject_batch == Some(attempt) {
            return Err(GatewayError::Http {
                status: 500,
                message: "batch rejected".to_string(),
            });
        }

        let mut scratch = self.clone();
        let mut replies = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            let reply = scratch
                .apply(request)
                .map_err(|reason| GatewayError::InvalidRequest {
                    index,
                    kind: request.kind(),
                    reason,
                })?;
            replies.push(reply);
        }
        scratch.batches.push(requests.to_vec());
        *self = scratch;
        Ok(BatchReply { replies })
    }

    fn thumbnail_url(&mut self, position: usize) -> Result<String, GatewayError> {
        let id = self.resolve(position)?;
        Ok(format!("memory://{}/{id}.png", self.presentation_id))
    }
}
