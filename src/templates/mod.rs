//! Built-in blog theme using the Tera template engine
//!
//! All templates are embedded directly in the binary, so a generated site
//! needs no theme directory on disk.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("theme/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("theme/partials/footer.html"),
            ),
            (
                "partials/pager.html",
                include_str!("theme/partials/pager.html"),
            ),
            (
                "partials/related.html",
                include_str!("theme/partials/related.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    Ok(tera::Value::String(crate::helpers::truncate_chars(
        &s, length,
    )))
}

/// Site-wide data for templates
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

/// Per-post data for templates
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub date: String,
    pub iso_date: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub path: String,
    pub permalink: String,
    pub excerpt: String,
    pub content: String,
}

/// Pagination state for index pages
#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub per_page: usize,
    pub total: usize,
    pub current: usize,
    pub current_url: String,
    pub prev_link: String,
    pub next_link: String,
}

/// Prev/next navigation entry on post pages
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}
