//! Content store - slug-addressed lookup over the loaded post snapshot
//!
//! The store is built once per generation from the loaded posts and is
//! read-only afterwards, so page generation can proceed without coordination.
//! Store order is recency (newest first).

use indexmap::IndexMap;
use std::collections::HashMap;
use thiserror::Error;

use crate::content::{Post, PostId};

/// Violations that make the content snapshot unusable.
///
/// These are data/programming errors and fail the build loudly; a missing
/// slug at lookup time is never one of them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate slug \"{slug}\" in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("duplicate post id {id} in {first} and {second}")]
    DuplicateId {
        id: PostId,
        first: String,
        second: String,
    },

    #[error("enumerated slug \"{slug}\" does not resolve")]
    UnresolvableSlug { slug: String },
}

/// Outcome of a slug lookup.
///
/// Absence is a first-class outcome the caller must branch on, not an error.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Found(&'a Post),
    NotFound,
}

impl<'a> Resolution<'a> {
    /// The resolved post, if any
    pub fn post(&self) -> Option<&'a Post> {
        match *self {
            Resolution::Found(post) => Some(post),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Read-only snapshot of all published posts
#[derive(Debug)]
pub struct ContentStore {
    /// Posts in store order (publication date descending)
    posts: Vec<Post>,
    /// Slug index; iteration order follows store order
    by_slug: IndexMap<String, usize>,
    by_id: HashMap<PostId, usize>,
}

impl ContentStore {
    /// Build a store from loaded posts, enforcing slug and id uniqueness
    pub fn from_posts(posts: Vec<Post>) -> Result<Self, StoreError> {
        let mut by_slug: IndexMap<String, usize> = IndexMap::with_capacity(posts.len());
        let mut by_id = HashMap::with_capacity(posts.len());

        for (idx, post) in posts.iter().enumerate() {
            if let Some(&prev) = by_slug.get(&post.slug) {
                return Err(StoreError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: posts[prev].source.clone(),
                    second: post.source.clone(),
                });
            }
            by_slug.insert(post.slug.clone(), idx);

            if let Some(prev) = by_id.insert(post.id, idx) {
                return Err(StoreError::DuplicateId {
                    id: post.id,
                    first: posts[prev].source.clone(),
                    second: post.source.clone(),
                });
            }
        }

        Ok(Self {
            posts,
            by_slug,
            by_id,
        })
    }

    /// Resolve a slug to a post.
    ///
    /// Empty or whitespace slugs are a miss, not an error. The lookup is a
    /// pure function of the snapshot.
    pub fn resolve(&self, slug: &str) -> Resolution<'_> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Resolution::NotFound;
        }
        match self.by_slug.get(slug) {
            Some(&idx) => Resolution::Found(&self.posts[idx]),
            None => Resolution::NotFound,
        }
    }

    /// Select up to `count` posts related to the post identified by `id`.
    ///
    /// A candidate is related when it shares the source's category or at
    /// least one tag. Category matches rank first, then shared-tag count;
    /// ties keep store order (recency). The source post itself is always
    /// excluded, and unrelated posts are never used as filler, so a short
    /// or empty result is a success.
    pub fn related_to(&self, id: PostId, count: usize) -> Vec<&Post> {
        let Some(&src_idx) = self.by_id.get(&id) else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }
        let src = &self.posts[src_idx];

        let mut candidates: Vec<(u8, usize, &Post)> = Vec::new();
        for post in &self.posts {
            if post.id == id {
                continue;
            }
            let same_category = src.shares_category(post);
            let shared_tags = src.shared_tags(post);
            if same_category || shared_tags > 0 {
                candidates.push((same_category as u8, shared_tags, post));
            }
        }

        // Stable sort keeps store order within equal ranks
        candidates.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        candidates.truncate(count);
        candidates.into_iter().map(|(_, _, post)| post).collect()
    }

    /// Enumerate every slug in store order, one route per slug
    pub fn all_slugs(&self) -> Vec<&str> {
        self.by_slug.keys().map(|s| s.as_str()).collect()
    }

    /// Assert the enumerator/resolver consistency invariant.
    ///
    /// Every enumerated slug must resolve against this same snapshot; a
    /// violation means a route would be generated that cannot be served.
    pub fn verify(&self) -> Result<(), StoreError> {
        for slug in self.all_slugs() {
            if !self.resolve(slug).is_found() {
                return Err(StoreError::UnresolvableSlug {
                    slug: slug.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Look up a post by id
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.by_id.get(&id).map(|&idx| &self.posts[idx])
    }

    /// All posts in store order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn post(id: u32, slug: &str, category: &str, day: u32) -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
        let mut p = Post::new(
            PostId(id),
            format!("{} Title", title_case(slug)),
            date,
            format!("_posts/{}.md", slug),
        );
        p.slug = slug.to_string();
        p.category = category.to_string();
        p
    }

    fn title_case(slug: &str) -> String {
        slug.split('-')
            .map(|w| {
                let mut c = w.chars();
                match c.next() {
                    Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Store from the reference scenario: two "tools" posts and one "misc",
    /// dated so store order is merge-pdf, compress-pdf, history.
    fn scenario_store() -> ContentStore {
        ContentStore::from_posts(vec![
            post(1, "merge-pdf", "tools", 3),
            post(2, "compress-pdf", "tools", 2),
            post(3, "history", "misc", 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_found() {
        let store = scenario_store();
        let found = store.resolve("compress-pdf");
        assert!(found.is_found());
        assert_eq!(found.post().unwrap().id, PostId(2));
    }

    #[test]
    fn test_resolve_misses_are_not_errors() {
        let store = scenario_store();
        assert!(!store.resolve("no-such-slug").is_found());
        assert!(!store.resolve("").is_found());
        assert!(!store.resolve("   ").is_found());
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let store = scenario_store();
        assert!(store.resolve(" merge-pdf ").is_found());
    }

    #[test]
    fn test_related_excludes_self_and_unrelated() {
        let store = scenario_store();
        let related = store.related_to(PostId(1), 3);
        // Post 2 shares the "tools" category; post 3 ("misc") never qualifies
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, PostId(2));
    }

    #[test]
    fn test_related_bounds() {
        let store = scenario_store();
        for n in 0..5 {
            let related = store.related_to(PostId(1), n);
            assert!(related.len() <= n);
            assert!(related.iter().all(|p| p.id != PostId(1)));
        }
        assert!(store.related_to(PostId(1), 0).is_empty());
    }

    #[test]
    fn test_related_unknown_id_is_empty() {
        let store = scenario_store();
        assert!(store.related_to(PostId(99), 3).is_empty());
    }

    #[test]
    fn test_related_rank_category_before_tags() {
        let mut tag_only = post(4, "ocr-scans", "misc", 4);
        tag_only.tags = vec!["compression".to_string()];
        let mut src = post(1, "compress-pdf", "tools", 3);
        src.tags = vec!["compression".to_string()];
        let same_cat = post(2, "merge-pdf", "tools", 2);

        let store = ContentStore::from_posts(vec![tag_only, src, same_cat]).unwrap();
        let related = store.related_to(PostId(1), 3);
        assert_eq!(related.len(), 2);
        // Category match outranks the newer tag-only match
        assert_eq!(related[0].id, PostId(2));
        assert_eq!(related[1].id, PostId(4));
    }

    #[test]
    fn test_related_ties_keep_store_order() {
        let store = ContentStore::from_posts(vec![
            post(1, "src", "tools", 9),
            post(2, "newer", "tools", 8),
            post(3, "older", "tools", 7),
        ])
        .unwrap();
        let related = store.related_to(PostId(1), 3);
        assert_eq!(related[0].id, PostId(2));
        assert_eq!(related[1].id, PostId(3));
    }

    #[test]
    fn test_all_slugs_in_store_order_and_resolvable() {
        let store = scenario_store();
        let slugs = store.all_slugs();
        assert_eq!(slugs, vec!["merge-pdf", "compress-pdf", "history"]);
        for slug in slugs {
            assert!(store.resolve(slug).is_found());
        }
        store.verify().unwrap();
    }

    #[test]
    fn test_empty_store_is_valid() {
        let store = ContentStore::from_posts(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert!(store.all_slugs().is_empty());
        store.verify().unwrap();
    }

    #[test]
    fn test_duplicate_slug_fails() {
        let err = ContentStore::from_posts(vec![
            post(1, "merge-pdf", "tools", 3),
            post(2, "merge-pdf", "tools", 2),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug { .. }));
        assert!(err.to_string().contains("merge-pdf"));
    }

    #[test]
    fn test_duplicate_id_fails() {
        let err = ContentStore::from_posts(vec![
            post(7, "merge-pdf", "tools", 3),
            post(7, "compress-pdf", "tools", 2),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));
    }
}
