//! Response shapes of the slides REST API and their conversion to snapshots.
//!
//! Only the fields the engine reads are modelled; everything else is ignored.
//! The service omits zero-valued numbers, so translations default to `0.0`.

use std::collections::HashMap;

use serde::Deserialize;

use deckmatch_core::types::Label;

use super::{
    AffineTransform, DeckSnapshot, Dimension, Element, ElementKind, ObjectId, Size, SlideId,
    SlideSnapshot,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Presentation {
    #[serde(default)]
    pub slides: Vec<Page>,
    #[serde(default)]
    pub layouts: Vec<Page>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page {
    pub object_id: String,
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
    #[serde(default)]
    pub slide_properties: Option<SlideProperties>,
    #[serde(default)]
    pub layout_properties: Option<LayoutProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SlideProperties {
    #[serde(default)]
    pub layout_object_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LayoutProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageElement {
    pub object_id: String,
    #[serde(default)]
    pub size: Option<WireSize>,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub image: Option<serde_json::Value>,
    #[serde(default)]
    pub table: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireSize {
    #[serde(default)]
    pub width: WireDimension,
    #[serde(default)]
    pub height: WireDimension,
}

/// A dimension whose zero magnitude may be omitted, e.g. the height of a line.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireDimension {
    #[serde(default)]
    pub magnitude: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

impl WireDimension {
    fn into_dimension(self) -> Dimension {
        match self.unit {
            Some(unit) => Dimension {
                magnitude: self.magnitude,
                unit,
            },
            None => Dimension::emu(self.magnitude),
        }
    }
}

impl WireSize {
    fn into_size(self) -> Size {
        Size {
            width: self.width.into_dimension(),
            height: self.height.into_dimension(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Shape {
    #[serde(default)]
    pub text: Option<serde_json::Value>,
    #[serde(default)]
    pub placeholder: Option<Placeholder>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Placeholder {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Transform {
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    #[serde(default)]
    pub translate_x: f64,
    #[serde(default)]
    pub translate_y: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Thumbnail {
    pub content_url: String,
}

impl Transform {
    /// `None` unless scale and unit are all present.
    fn complete(self) -> Option<AffineTransform> {
        Some(AffineTransform {
            scale_x: self.scale_x?,
            scale_y: self.scale_y?,
            translate_x: self.translate_x,
            translate_y: self.translate_y,
            unit: self.unit?,
        })
    }
}

impl PageElement {
    fn into_element(self) -> Element {
        let kind = if self.image.is_some() {
            ElementKind::Image
        } else if self.table.is_some() {
            ElementKind::Table
        } else if self.shape.as_ref().is_some_and(|s| s.text.is_some()) {
            ElementKind::Text
        } else {
            ElementKind::Other
        };
        let placeholder = self
            .shape
            .and_then(|s| s.placeholder)
            .and_then(|p| p.kind);
        Element {
            id: ObjectId(self.object_id),
            kind,
            placeholder,
            size: self.size.map(WireSize::into_size),
            transform: self.transform.and_then(Transform::complete),
        }
    }
}

impl Presentation {
    pub fn into_snapshot(self) -> DeckSnapshot {
        let layout_names: HashMap<String, String> = self
            .layouts
            .into_iter()
            .filter_map(|layout| {
                let props = layout.layout_properties?;
                let name = props.display_name.or(props.name)?;
                Some((layout.object_id, name))
            })
            .collect();

        self.slides
            .into_iter()
            .map(|slide| {
                let layout = slide
                    .slide_properties
                    .and_then(|p| p.layout_object_id)
                    .and_then(|id| layout_names.get(&id).cloned())
                    .map(Label);
                SlideSnapshot {
                    id: SlideId(slide.object_id),
                    layout,
                    elements: slide
                        .page_elements
                        .into_iter()
                        .map(PageElement::into_element)
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fixture() -> serde_json::Value {
        json!({
            "presentationId": "deck",
            "layouts": [
                {"objectId": "L1", "layoutProperties": {"name": "TITLE", "displayName": "cover"}},
                {"objectId": "L2", "layoutProperties": {"name": "ONLY_TEXT"}}
            ],
            "slides": [
                {
                    "objectId": "p1",
                    "slideProperties": {"layoutObjectId": "L1"},
                    "pageElements": [
                        {"objectId": "title", "shape": {"shapeType": "TEXT_BOX",
                            "placeholder": {"type": "CENTERED_TITLE"}, "text": {"textElements": []}}},
                        {"objectId": "pic",
                            "size": {"width": {"magnitude": 3000000.0, "unit": "EMU"},
                                     "height": {"magnitude": 2000000.0, "unit": "EMU"}},
                            "transform": {"scaleX": 1.5, "scaleY": 1.5, "translateY": 40.0, "unit": "EMU"},
                            "image": {"contentUrl": "https://example.com/x.png"}},
                        {"objectId": "line", "line": {},
                            "size": {"width": {"magnitude": 3000000.0, "unit": "EMU"},
                                     "height": {"unit": "EMU"}}}
                    ]
                },
                {
                    "objectId": "p2",
                    "slideProperties": {"layoutObjectId": "L2"},
                    "pageElements": [
                        {"objectId": "tbl", "table": {"rows": 2, "columns": 2}},
                        {"objectId": "skew", "transform": {"scaleX": 1.0, "unit": "EMU"}, "image": {}}
                    ]
                },
                {"objectId": "p3"},
                {
                    "objectId": "p4",
                    "slideProperties": {"layoutObjectId": "L2"},
                    "pageElements": [
                        {"objectId": "p4_title", "shape": {"shapeType": "TEXT_BOX",
                            "placeholder": {"type": "TITLE"}, "text": {"textElements": []}}},
                        {"objectId": "p4_picture", "shape": {"shapeType": "RECTANGLE",
                            "placeholder": {"type": "PICTURE"}}},
                        {"objectId": "p4_body", "shape": {"shapeType": "TEXT_BOX",
                            "placeholder": {"type": "BODY"}, "text": {"textElements": []}}}
                    ]
                }
            ]
        })
    }

    #[test]
    fn snapshot_maps_slides_layouts_and_elements() {
        let presentation: Presentation = serde_json::from_value(fixture()).expect("decode");
        let deck = presentation.into_snapshot();
        assert_eq!(deck.len(), 4);

        assert_eq!(deck[0].id, SlideId::from("p1"));
        assert_eq!(deck[0].layout, Some(Label::from("cover")));
        assert_eq!(deck[1].layout, Some(Label::from("ONLY_TEXT")), "falls back to name");
        assert_eq!(deck[2].layout, None);

        let kinds: Vec<_> = deck[0].elements.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Text, ElementKind::Image, ElementKind::Other]
        );
        assert!(deck[0].elements[0].is_title());
    }

    #[test]
    fn omitted_translation_defaults_to_zero() {
        let deck = serde_json::from_value::<Presentation>(fixture())
            .expect("decode")
            .into_snapshot();
        let t = deck[0].elements[1].transform.as_ref().expect("transform");
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.translate_y, 40.0);
        assert_eq!(t.scale_x, 1.5);
    }

    #[test]
    fn incomplete_transform_becomes_none() {
        let deck = serde_json::from_value::<Presentation>(fixture())
            .expect("decode")
            .into_snapshot();
        assert_eq!(deck[1].elements[0].kind, ElementKind::Table);
        assert!(deck[1].elements[1].transform.is_none());
    }

    #[test]
    fn zero_magnitude_may_be_omitted() {
        let deck = serde_json::from_value::<Presentation>(fixture())
            .expect("decode")
            .into_snapshot();
        let line = &deck[0].elements[2];
        assert_eq!(line.id, ObjectId::from("line"));
        let size = line.size.as_ref().expect("size");
        assert_eq!(size.width, Dimension::emu(3_000_000.0));
        assert_eq!(size.height, Dimension::emu(0.0));
    }

    #[test]
    fn placeholder_without_text_is_not_a_text_box() {
        let deck = serde_json::from_value::<Presentation>(fixture())
            .expect("decode")
            .into_snapshot();
        let kinds: Vec<_> = deck[3].elements.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Text, ElementKind::Other, ElementKind::Text]
        );
        assert_eq!(deck[3].elements[1].placeholder.as_deref(), Some("PICTURE"));
    }
}
