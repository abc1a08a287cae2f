//! Page metadata synthesis
//!
//! Maps a slug resolution (or an index page) into the head/SEO data the
//! templates emit: title, description, canonical URL, Open Graph and Twitter
//! card fields, and robots directives. Metadata objects are built fresh per
//! page, never mutated, and serialized once into the head partial.

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::full_url_for;
use crate::store::Resolution;

/// Structured head data for one generated page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub alternates: Alternates,
    pub open_graph: OpenGraph,
    pub twitter: Twitter,
    pub robots: Robots,
}

/// Alternate representations of the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternates {
    pub canonical: Option<String>,
}

/// Open Graph sharing block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OgKind,
    pub url: Option<String>,
    pub published_time: Option<String>,
    pub authors: Vec<String>,
}

/// Open Graph object type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OgKind {
    Article,
    Website,
}

/// Twitter card block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Twitter {
    pub card: TwitterCard,
    pub title: String,
    pub description: String,
}

/// Twitter card variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TwitterCard {
    Summary,
    SummaryLargeImage,
}

impl TwitterCard {
    /// Parse the configured card name, defaulting to the large variant
    pub fn from_config(name: &str) -> Self {
        match name {
            "summary" => TwitterCard::Summary,
            _ => TwitterCard::SummaryLargeImage,
        }
    }
}

/// Robots indexing directives
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
}

/// Builds page metadata from the site configuration
pub struct MetadataBuilder<'a> {
    site: &'a SiteConfig,
}

impl<'a> MetadataBuilder<'a> {
    pub fn new(site: &'a SiteConfig) -> Self {
        Self { site }
    }

    /// Metadata for a slug resolution: the post's own head data when found,
    /// the fixed not-found sentinel otherwise
    pub fn for_resolution(&self, resolution: &Resolution<'_>) -> PageMetadata {
        match resolution {
            Resolution::Found(post) => self.for_post(post),
            Resolution::NotFound => self.not_found(),
        }
    }

    /// Metadata for a resolved post; a pure function of the post
    pub fn for_post(&self, post: &Post) -> PageMetadata {
        let title = format!("{} | {}", post.title, self.site.title);
        PageMetadata {
            title,
            description: post.excerpt.clone(),
            alternates: Alternates {
                canonical: Some(post.permalink.clone()),
            },
            open_graph: OpenGraph {
                title: post.title.clone(),
                description: post.excerpt.clone(),
                kind: OgKind::Article,
                url: Some(post.permalink.clone()),
                published_time: Some(post.date.to_rfc3339()),
                authors: vec![post.author.clone()],
            },
            twitter: Twitter {
                card: TwitterCard::from_config(&self.site.twitter_card),
                title: post.title.clone(),
                description: post.excerpt.clone(),
            },
            robots: Robots {
                index: true,
                follow: true,
            },
        }
    }

    /// Fixed sentinel for unresolved slugs; article-specific fields omitted
    pub fn not_found(&self) -> PageMetadata {
        let description = "The post you are looking for does not exist or has been moved.";
        PageMetadata {
            title: format!("Post Not Found | {}", self.site.title),
            description: description.to_string(),
            alternates: Alternates { canonical: None },
            open_graph: OpenGraph {
                title: "Post Not Found".to_string(),
                description: description.to_string(),
                kind: OgKind::Website,
                url: None,
                published_time: None,
                authors: Vec::new(),
            },
            twitter: Twitter {
                card: TwitterCard::from_config(&self.site.twitter_card),
                title: "Post Not Found".to_string(),
                description: description.to_string(),
            },
            robots: Robots {
                index: false,
                follow: true,
            },
        }
    }

    /// Metadata for a post-listing index page
    pub fn for_index(&self, page_num: usize, page_path: &str) -> PageMetadata {
        let title = if page_num <= 1 {
            self.site.title.clone()
        } else {
            format!("{} | Page {}", self.site.title, page_num)
        };
        let canonical = full_url_for(self.site, page_path);
        PageMetadata {
            title: title.clone(),
            description: self.site.description.clone(),
            alternates: Alternates {
                canonical: Some(canonical.clone()),
            },
            open_graph: OpenGraph {
                title,
                description: self.site.description.clone(),
                kind: OgKind::Website,
                url: Some(canonical),
                published_time: None,
                authors: Vec::new(),
            },
            twitter: Twitter {
                card: TwitterCard::from_config(&self.site.twitter_card),
                title: self.site.title.clone(),
                description: self.site.description.clone(),
            },
            robots: Robots {
                index: true,
                follow: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostId;
    use chrono::{Local, TimeZone};

    fn compress_post() -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let mut post = Post::new(
            PostId(2),
            "Compress PDF Title".to_string(),
            date,
            "_posts/compress-pdf.md".to_string(),
        );
        post.slug = "compress-pdf".to_string();
        post.category = "tools".to_string();
        post.author = "Dana Reeve".to_string();
        post.excerpt = "Shrink PDF files without losing quality.".to_string();
        post.permalink = "https://pdfzone.example.com/blog/compress-pdf/".to_string();
        post
    }

    #[test]
    fn test_post_metadata_title_template() {
        let config = SiteConfig::default();
        let builder = MetadataBuilder::new(&config);
        let meta = builder.for_post(&compress_post());

        assert_eq!(meta.title, "Compress PDF Title | PDFzone Blog");
        assert_eq!(meta.description, "Shrink PDF files without losing quality.");
        assert_eq!(meta.open_graph.kind, OgKind::Article);
        assert_eq!(meta.open_graph.title, "Compress PDF Title");
        assert_eq!(meta.open_graph.authors, vec!["Dana Reeve".to_string()]);
        assert!(meta.open_graph.published_time.is_some());
        assert_eq!(
            meta.alternates.canonical.as_deref(),
            Some("https://pdfzone.example.com/blog/compress-pdf/")
        );
        assert!(meta.robots.index);
    }

    #[test]
    fn test_og_type_serializes_as_article() {
        let config = SiteConfig::default();
        let builder = MetadataBuilder::new(&config);
        let meta = builder.for_post(&compress_post());

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["open_graph"]["type"], "article");
        assert_eq!(json["twitter"]["card"], "summary_large_image");
    }

    #[test]
    fn test_metadata_is_deterministic() {
        let config = SiteConfig::default();
        let builder = MetadataBuilder::new(&config);
        let post = compress_post();

        assert_eq!(builder.for_post(&post), builder.for_post(&post));
        assert_eq!(builder.not_found(), builder.not_found());
    }

    #[test]
    fn test_not_found_sentinel() {
        let config = SiteConfig::default();
        let builder = MetadataBuilder::new(&config);
        let meta = builder.for_resolution(&Resolution::NotFound);

        assert_eq!(meta.title, "Post Not Found | PDFzone Blog");
        assert_eq!(meta.open_graph.kind, OgKind::Website);
        assert!(meta.alternates.canonical.is_none());
        assert!(meta.open_graph.published_time.is_none());
        assert!(meta.open_graph.authors.is_empty());
        assert!(!meta.robots.index);
        assert!(meta.robots.follow);
    }

    #[test]
    fn test_for_resolution_found_branch() {
        let config = SiteConfig::default();
        let builder = MetadataBuilder::new(&config);
        let post = compress_post();
        let meta = builder.for_resolution(&Resolution::Found(&post));
        assert_eq!(meta, builder.for_post(&post));
    }

    #[test]
    fn test_twitter_card_from_config() {
        assert_eq!(TwitterCard::from_config("summary"), TwitterCard::Summary);
        assert_eq!(
            TwitterCard::from_config("summary_large_image"),
            TwitterCard::SummaryLargeImage
        );
    }

    #[test]
    fn test_index_metadata() {
        let config = SiteConfig::default();
        let builder = MetadataBuilder::new(&config);

        let first = builder.for_index(1, "/");
        assert_eq!(first.title, "PDFzone Blog");
        assert_eq!(first.open_graph.kind, OgKind::Website);

        let third = builder.for_index(3, "/page/3/");
        assert_eq!(third.title, "PDFzone Blog | Page 3");
        assert_eq!(
            third.alternates.canonical.as_deref(),
            Some("https://pdfzone.example.com/page/3/")
        );
    }
}
