//! Content Writer: push final text and images into positioned slides.
//!
//! Per slide, one batch:
//!
//! 1. clear + insert the title (first text element, title placeholders first)
//! 2. clear + insert the body into the second text element; bullet bodies
//!    get a `createParagraphBullets` over the whole range; table bodies
//!    replace any table already on the slide with a new one, filled cell by
//!    cell
//! 3. for each image URL, replace the matching image element with a new image
//!    carrying the same size and transform
//!
//! Text elements are ordered by role: title placeholders, then body and
//! subtitle placeholders, then the rest in document order.
//!
//! New object ids carry a per-run tag, so content can be pushed again into a
//! deck that was already written.
//!
//! A missing text placeholder is an error. Image URLs without a placeholder
//! and images with unusable geometry are skipped with a warning.

pub mod text;

use serde::Serialize;
use uuid::Uuid;

use deckmatch_core::types::{Body, SlideDescriptor};

use crate::error::{Locus, Phase, ReconcileError};
use crate::gateway::{Element, ElementKind, ObjectId, Request, SlideGateway, SlideId, SlideSnapshot};

pub use text::TextRenderer;

/// Requests built for one slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlideContent {
    pub position: usize,
    pub slide: SlideId,
    #[serde(skip)]
    pub requests: Vec<Request>,
    pub request_count: usize,
    pub warnings: Vec<String>,
}

fn text_boxes(slide: &SlideSnapshot) -> Vec<&Element> {
    let mut boxes: Vec<&Element> = slide
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Text)
        .collect();
    boxes.sort_by_key(|e| e.text_role());
    boxes
}

fn require<'a>(
    boxes: &[&'a Element],
    index: usize,
    position: usize,
) -> Result<&'a Element, ReconcileError> {
    boxes
        .get(index)
        .copied()
        .ok_or(ReconcileError::MissingElement {
            position,
            kind: ElementKind::Text,
            index,
        })
}

fn replace_text(requests: &mut Vec<Request>, target: &ObjectId, text: &str) {
    requests.push(Request::clear_text(target));
    if !text.is_empty() {
        requests.push(Request::insert_text(target, text));
    }
}

/// Build the batch for the slide at `position`. Pure: no remote calls.
///
/// `run_tag` is appended to the ids of created tables.
pub fn build_requests(
    position: usize,
    slide: &SlideSnapshot,
    descriptor: &SlideDescriptor,
    renderer: &TextRenderer,
    bullet_preset: &str,
    run_tag: &str,
) -> Result<SlideContent, ReconcileError> {
    let boxes = text_boxes(slide);
    let mut requests = Vec::new();
    let mut warnings = Vec::new();

    let title = require(&boxes, 0, position)?;
    replace_text(&mut requests, &title.id, &descriptor.title);

    match &descriptor.body {
        Body::Bullets { subject, points } => {
            let body = require(&boxes, 1, position)?;
            let rendered = renderer.bullets(subject, points)?;
            replace_text(&mut requests, &body.id, &rendered);
            if !rendered.is_empty() {
                requests.push(Request::bullets(&body.id, bullet_preset));
            }
        }
        Body::Description { text } => {
            let body = require(&boxes, 1, position)?;
            let rendered = renderer.description(text)?;
            replace_text(&mut requests, &body.id, &rendered);
        }
        Body::Table { rows } => {
            if let Some(body) = boxes.get(1) {
                requests.push(Request::clear_text(&body.id));
            }
            for old in slide.elements.iter().filter(|e| e.kind == ElementKind::Table) {
                requests.push(Request::delete_object(&old.id));
            }
            let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
            if rows.is_empty() || columns == 0 {
                warnings.push(format!("slide #{position}: empty table body skipped"));
            } else {
                let table = ObjectId(format!("{}_table_{run_tag}", slide.id));
                requests.push(Request::create_table(table.clone(), &slide.id, rows.len(), columns));
                for (r, row) in rows.iter().enumerate() {
                    for (c, cell) in row.iter().enumerate() {
                        if !cell.is_empty() {
                            requests.push(Request::insert_cell_text(&table, r, c, cell.as_str()));
                        }
                    }
                }
            }
        }
    }

    let images: Vec<&Element> = slide
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Image)
        .collect();
    for (i, url) in descriptor.image_urls.iter().enumerate() {
        let Some(image) = images.get(i) else {
            warnings.push(format!(
                "slide #{position}: no image placeholder #{i} for {url}; skipped"
            ));
            continue;
        };
        match (&image.size, &image.transform) {
            (Some(size), Some(transform)) => {
                requests.push(Request::delete_object(&image.id));
                requests.push(Request::create_image(
                    ObjectId(format!("{}_new_image", image.id)),
                    url.as_str(),
                    &slide.id,
                    size.clone(),
                    transform.clone(),
                ));
            }
            _ => warnings.push(format!(
                "slide #{position}: image '{}' has no usable size/transform; {url} skipped",
                image.id
            )),
        }
    }

    for w in &warnings {
        tracing::warn!("{w}");
    }

    Ok(SlideContent {
        position,
        slide: slide.id.clone(),
        request_count: requests.len(),
        requests,
        warnings,
    })
}

/// Write every descriptor's content into the slide at its page, one batch per slide.
///
/// Stops at the first failing slide; earlier slides keep their new content.
pub fn write_content<G: SlideGateway + ?Sized>(
    gateway: &mut G,
    descriptors: &[SlideDescriptor],
    bullet_preset: &str,
) -> Result<Vec<SlideContent>, ReconcileError> {
    let renderer = TextRenderer::new()?;
    let run_tag = Uuid::new_v4().simple().to_string();
    let mut written = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let position = descriptor.page;
        let slide = gateway
            .read_slide(position)
            .map_err(ReconcileError::remote(Phase::Content, Locus::at(position)))?;
        let content = build_requests(
            position,
            &slide,
            descriptor,
            &renderer,
            bullet_preset,
            &run_tag,
        )?;
        gateway
            .submit_batch(&content.requests)
            .map_err(ReconcileError::remote(Phase::Content, Locus::slide(position, &slide.id)))?;
        tracing::info!(
            "updated content of slide #{position} ({}) with {} requests",
            slide.id,
            content.request_count
        );
        written.push(content);
    }

    Ok(written)
}
