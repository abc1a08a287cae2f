//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Numeric post identity, distinct from the slug.
///
/// Ids can be pinned in front-matter; the loader assigns ordinals otherwise.
/// The slug (not the id) is the stable identity routes depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub u32);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique numeric identity
    pub id: PostId,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Last updated date
    pub updated: Option<DateTime<Local>>,

    /// Post author
    pub author: String,

    /// Slug (URL-friendly name, unique across the store)
    pub slug: String,

    /// Category used as the relation key for similarity grouping
    pub category: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Plain-text summary, mirrored into page metadata descriptions
    pub excerpt: String,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without domain)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Whether the post is published
    pub published: bool,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(id: PostId, title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            id,
            title,
            date,
            updated: None,
            author: String::new(),
            slug,
            category: String::new(),
            tags: Vec::new(),
            excerpt: String::new(),
            raw: String::new(),
            content: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            permalink: String::new(),
            published: true,
            extra: HashMap::new(),
        }
    }

    /// Whether the other post shares this post's relation key
    pub fn shares_category(&self, other: &Post) -> bool {
        !self.category.is_empty() && self.category == other.category
    }

    /// Number of tags shared with the other post
    pub fn shared_tags(&self, other: &Post) -> usize {
        self.tags
            .iter()
            .filter(|t| other.tags.iter().any(|o| o == *t))
            .count()
    }

    /// Get the previous (older) post in a date-descending list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        posts.get(pos + 1)
    }

    /// Get the next (newer) post in a date-descending list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        if pos > 0 {
            posts.get(pos - 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u32, title: &str) -> Post {
        Post::new(
            PostId(id),
            title.to_string(),
            Local::now(),
            format!("_posts/{}.md", id),
        )
    }

    #[test]
    fn test_new_post_slug() {
        let p = post(1, "How to Merge PDF Files");
        assert_eq!(p.slug, "how-to-merge-pdf-files");
        assert!(p.published);
    }

    #[test]
    fn test_shares_category() {
        let mut a = post(1, "A");
        let mut b = post(2, "B");
        a.category = "tools".to_string();
        b.category = "tools".to_string();
        assert!(a.shares_category(&b));

        b.category = "misc".to_string();
        assert!(!a.shares_category(&b));

        // Empty relation keys never relate
        a.category.clear();
        b.category.clear();
        assert!(!a.shares_category(&b));
    }

    #[test]
    fn test_shared_tags() {
        let mut a = post(1, "A");
        let mut b = post(2, "B");
        a.tags = vec!["merge".to_string(), "howto".to_string()];
        b.tags = vec!["howto".to_string(), "compress".to_string()];
        assert_eq!(a.shared_tags(&b), 1);
    }

    #[test]
    fn test_prev_next() {
        let posts = vec![post(1, "Newest"), post(2, "Middle"), post(3, "Oldest")];
        assert_eq!(posts[1].prev(&posts).unwrap().id, PostId(3));
        assert_eq!(posts[1].next(&posts).unwrap().id, PostId(1));
        assert!(posts[0].next(&posts).is_none());
        assert!(posts[2].prev(&posts).is_none());
    }
}
