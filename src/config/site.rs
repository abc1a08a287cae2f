//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    /// Directory segment post pages live under (e.g. /blog/<slug>/)
    pub blog_dir: String,

    // Writing
    pub new_post_name: String,
    pub render_drafts: bool,
    pub future: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Category & Tag
    pub default_category: String,

    // Related posts shown on each post page
    pub related_posts: usize,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,

    // Social sharing
    pub twitter_card: String,

    // Date format
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "PDFzone Blog".to_string(),
            subtitle: String::new(),
            description: "Guides and news about working with PDF documents".to_string(),
            keywords: None,
            author: "PDFzone Team".to_string(),
            language: "en".to_string(),

            url: "https://pdfzone.example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),

            new_post_name: ":title.md".to_string(),
            render_drafts: false,
            future: true,
            highlight: HighlightConfig::default(),

            default_category: "general".to_string(),

            related_posts: 3,

            per_page: 10,
            pagination_dir: "page".to_string(),

            twitter_card: "summary_large_image".to_string(),

            date_format: "%Y-%m-%d".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "PDFzone Blog");
        assert_eq!(config.related_posts, 3);
        assert_eq!(config.per_page, 10);
        assert_eq!(config.blog_dir, "blog");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My PDF Blog
author: Test User
url: https://blog.example.com
related_posts: 5
per_page: 20
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My PDF Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.url, "https://blog.example.com");
        assert_eq!(config.related_posts, 5);
        assert_eq!(config.per_page, 20);
        // Untouched fields keep their defaults
        assert_eq!(config.blog_dir, "blog");
    }

    #[test]
    fn test_extra_fields_preserved() {
        let yaml = r#"
title: My PDF Blog
plausible_domain: blog.example.com
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.extra.contains_key("plausible_domain"));
    }
}
