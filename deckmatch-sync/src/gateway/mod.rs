//! Remote Slide Gateway: the only channel to the remote deck.
//!
//! Implementations supply three primitives: a fresh [`DeckSnapshot`] read, an
//! atomic batch submission, and a thumbnail lookup. Position-based helpers
//! ([`SlideGateway::resolve`], [`SlideGateway::read_elements`], ...) are
//! derived from the snapshot read, so every call observes the deck as it is
//! *now*. Resolve identities before mutating: requests address slides by
//! identity, which stays valid while other positions shift.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use deckmatch_core::types::Label;

pub mod http;
pub mod memory;
pub mod request;
pub(crate) mod wire;

pub use http::HttpGateway;
pub use memory::MemoryDeck;
pub use request::Request;

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// Opaque identity of a remote slide, stable across moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(pub String);

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SlideId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SlideId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for SlideId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque identity of a page element (text box, image, table).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: String,
}

impl Dimension {
    pub fn emu(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: "EMU".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

/// 2-D placement of an element: scale then translate, in `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffineTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub unit: String,
}

// ---------------------------------------------------------------------------
// Elements and snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A shape carrying text.
    Text,
    Image,
    Table,
    Other,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Text => write!(f, "text"),
            ElementKind::Image => write!(f, "image"),
            ElementKind::Table => write!(f, "table"),
            ElementKind::Other => write!(f, "other"),
        }
    }
}

/// A page element as read from the remote deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ObjectId,
    pub kind: ElementKind,
    /// Placeholder type (`TITLE`, `BODY`, ...) when the element is a layout placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// `None` when the remote transform was absent or incomplete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AffineTransform>,
}

impl Element {
    pub fn text(id: &str, placeholder: Option<&str>) -> Self {
        Self {
            id: ObjectId::from(id),
            kind: ElementKind::Text,
            placeholder: placeholder.map(str::to_string),
            size: None,
            transform: None,
        }
    }

    pub fn image(id: &str, size: Option<Size>, transform: Option<AffineTransform>) -> Self {
        Self {
            id: ObjectId::from(id),
            kind: ElementKind::Image,
            placeholder: None,
            size,
            transform,
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(
            self.placeholder.as_deref(),
            Some("TITLE") | Some("CENTERED_TITLE")
        )
    }

    pub fn is_body(&self) -> bool {
        matches!(self.placeholder.as_deref(), Some("BODY") | Some("SUBTITLE"))
    }

    /// Sort key for text boxes: titles, then bodies, then everything else.
    pub fn text_role(&self) -> u8 {
        if self.is_title() {
            0
        } else if self.is_body() {
            1
        } else {
            2
        }
    }
}

/// One slide as observed in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSnapshot {
    pub id: SlideId,
    /// Display name of the layout the slide was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Label>,
    pub elements: Vec<Element>,
}

/// The whole deck, in slide order.
pub type DeckSnapshot = Vec<SlideSnapshot>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced by a gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The remote service answered with a non-success status.
    #[error("remote returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, TLS or timeout failure below HTTP.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode remote response: {0}")]
    Decode(String),

    #[error("no access token configured; set DECKMATCH_ACCESS_TOKEN or access_token in config.yaml")]
    MissingToken,

    #[error("position {position} is out of range for a deck of {len} slides")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("no object with id '{id}'")]
    UnknownObject { id: String },

    /// The batch was rejected as a whole; nothing was applied.
    #[error("invalid request #{index} ({kind}): {reason}")]
    InvalidRequest {
        index: usize,
        kind: &'static str,
        reason: String,
    },
}

/// Result of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReply {
    /// One reply per request, in request order.
    #[serde(default)]
    pub replies: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Channel to one remote deck.
///
/// Every method is a round trip in the HTTP implementation; callers treat a
/// [`submit_batch`](SlideGateway::submit_batch) call as the unit of both
/// atomicity and cost.
pub trait SlideGateway {
    /// Identifier of the deck this gateway is bound to.
    fn presentation_id(&self) -> &str;

    /// Read the current deck state.
    fn snapshot(&mut self) -> Result<DeckSnapshot, GatewayError>;

    /// Submit `requests` as one atomic batch, executed in order.
    fn submit_batch(&mut self, requests: &[Request]) -> Result<BatchReply, GatewayError>;

    /// Downloadable thumbnail URL for the slide at `position`.
    fn thumbnail_url(&mut self, position: usize) -> Result<String, GatewayError>;

    fn slide_count(&mut self) -> Result<usize, GatewayError> {
        Ok(self.snapshot()?.len())
    }

    /// Full snapshot of the slide at `position`.
    fn read_slide(&mut self, position: usize) -> Result<SlideSnapshot, GatewayError> {
        let mut deck = self.snapshot()?;
        let len = deck.len();
        if position >= len {
            return Err(GatewayError::PositionOutOfRange { position, len });
        }
        Ok(deck.swap_remove(position))
    }

    /// Identity of the slide currently at `position`.
    fn resolve(&mut self, position: usize) -> Result<SlideId, GatewayError> {
        Ok(self.read_slide(position)?.id)
    }

    /// Identities at several positions, all read from one observation.
    fn resolve_all(&mut self, positions: &[usize]) -> Result<Vec<SlideId>, GatewayError> {
        let deck = self.snapshot()?;
        positions
            .iter()
            .map(|&position| {
                deck.get(position)
                    .map(|s| s.id.clone())
                    .ok_or(GatewayError::PositionOutOfRange {
                        position,
                        len: deck.len(),
                    })
            })
            .collect()
    }

    /// Page elements of the slide at `position`, in document order.
    fn read_elements(&mut self, position: usize) -> Result<Vec<Element>, GatewayError> {
        Ok(self.read_slide(position)?.elements)
    }

    /// Layout label of every slide, in slide order.
    fn layout_labels(&mut self) -> Result<Vec<Option<Label>>, GatewayError> {
        Ok(self.snapshot()?.into_iter().map(|s| s.layout).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckmatch_core::types::template;

    #[test]
    fn resolve_reads_current_position() {
        let mut deck = MemoryDeck::from_labels(&template(["a", "b", "c"]));
        let ids = deck.slide_ids();
        assert_eq!(deck.resolve(1).expect("resolve"), ids[1]);
        assert!(matches!(
            deck.resolve(3),
            Err(GatewayError::PositionOutOfRange { position: 3, len: 3 })
        ));
    }

    #[test]
    fn resolve_all_uses_one_observation() {
        let mut deck = MemoryDeck::from_labels(&template(["a", "b", "c"]));
        let ids = deck.slide_ids();
        let got = deck.resolve_all(&[2, 0]).expect("resolve_all");
        assert_eq!(got, vec![ids[2].clone(), ids[0].clone()]);
    }

    #[test]
    fn title_placeholders_are_recognised() {
        assert!(Element::text("t", Some("CENTERED_TITLE")).is_title());
        assert!(!Element::text("b", Some("BODY")).is_title());
        assert!(!Element::text("x", None).is_title());
    }
}
