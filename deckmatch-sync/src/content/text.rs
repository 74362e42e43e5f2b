//! Body text rendering: Tera templates baked in at compile time.
//!
//! A bullet body renders as the subject line followed by one tab-indented
//! line per point; the indentation becomes the second bullet level once
//! `createParagraphBullets` is applied. A description gets a trailing newline.

use tera::{Context, Tera};

const BULLETS: &str = "bullets.txt";
const DESCRIPTION: &str = "description.txt";

const TPLS: &[(&str, &str)] = &[
    (BULLETS, include_str!("templates/bullets.txt.tera")),
    (DESCRIPTION, include_str!("templates/description.txt.tera")),
];

/// Renders slide body text.
pub struct TextRenderer {
    tera: Tera,
}

impl TextRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TPLS.iter().copied())?;
        Ok(Self { tera })
    }

    pub fn bullets(&self, subject: &str, points: &[String]) -> Result<String, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("subject", subject);
        ctx.insert("points", points);
        self.tera.render(BULLETS, &ctx)
    }

    pub fn description(&self, text: &str) -> Result<String, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("text", text);
        self.tera.render(DESCRIPTION, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_indent_each_point() {
        let r = TextRenderer::new().expect("renderer");
        let out = r
            .bullets("Types of AI", &["Computer Vision".into(), "NLP".into()])
            .expect("render");
        assert_eq!(out, "Types of AI\n\tComputer Vision\n\tNLP");
    }

    #[test]
    fn bullets_without_points_is_just_subject() {
        let r = TextRenderer::new().expect("renderer");
        assert_eq!(r.bullets("Alone", &[]).expect("render"), "Alone");
    }

    #[test]
    fn description_is_not_escaped() {
        let r = TextRenderer::new().expect("renderer");
        assert_eq!(
            r.description("a < b & \"c\"").expect("render"),
            "a < b & \"c\"\n"
        );
    }
}
