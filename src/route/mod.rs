//! Post route controller
//!
//! Drives a single slug through `Resolving -> {Found, NotFound}`. The
//! metadata hook and the body hook are independently callable and
//! side-effect-free; they share one memoized resolution per route instance,
//! never across instances. There are no retries: resolution is a pure
//! in-memory lookup, so a miss is definitional, not transient.

use std::cell::OnceCell;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::meta::{MetadataBuilder, PageMetadata};
use crate::store::{ContentStore, Resolution};

/// Terminal page state handed to the renderer
#[derive(Debug)]
pub enum PageOutcome<'a> {
    /// Resolution succeeded; the body receives the post and its related set
    Found {
        post: &'a Post,
        related: Vec<&'a Post>,
    },
    /// Hard termination: no related fetch occurs and no post body is produced
    NotFound,
}

impl PageOutcome<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, PageOutcome::Found { .. })
    }
}

/// One slug-addressed page request against a store snapshot
pub struct PostRoute<'a> {
    store: &'a ContentStore,
    site: &'a SiteConfig,
    slug: String,
    resolved: OnceCell<Option<&'a Post>>,
}

impl<'a> PostRoute<'a> {
    pub fn new(store: &'a ContentStore, site: &'a SiteConfig, slug: impl Into<String>) -> Self {
        Self {
            store,
            site,
            slug: slug.into(),
            resolved: OnceCell::new(),
        }
    }

    /// The memoized resolution backing both hooks
    fn resolution(&self) -> Resolution<'a> {
        match *self
            .resolved
            .get_or_init(|| self.store.resolve(&self.slug).post())
        {
            Some(post) => Resolution::Found(post),
            None => Resolution::NotFound,
        }
    }

    /// Head metadata for this route; invocable before (or without) rendering
    pub fn metadata(&self) -> PageMetadata {
        MetadataBuilder::new(self.site).for_resolution(&self.resolution())
    }

    /// Resolve the page body: the post plus its bounded related set, or the
    /// not-found termination
    pub fn outcome(&self) -> PageOutcome<'a> {
        match self.resolution() {
            Resolution::Found(post) => PageOutcome::Found {
                post,
                related: self.store.related_to(post.id, self.site.related_posts),
            },
            Resolution::NotFound => PageOutcome::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostId;
    use chrono::{Local, TimeZone};

    fn store() -> ContentStore {
        let mk = |id: u32, slug: &str, category: &str, day: u32| {
            let date = Local.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
            let mut p = Post::new(
                PostId(id),
                slug.to_string(),
                date,
                format!("_posts/{}.md", slug),
            );
            p.slug = slug.to_string();
            p.category = category.to_string();
            p
        };
        ContentStore::from_posts(vec![
            mk(1, "merge-pdf", "tools", 3),
            mk(2, "compress-pdf", "tools", 2),
            mk(3, "history", "misc", 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_found_route() {
        let store = store();
        let config = SiteConfig::default();
        let route = PostRoute::new(&store, &config, "merge-pdf");

        let meta = route.metadata();
        assert!(meta.title.starts_with("merge-pdf |"));

        match route.outcome() {
            PageOutcome::Found { post, related } => {
                assert_eq!(post.id, PostId(1));
                assert_eq!(related.len(), 1);
                assert_eq!(related[0].id, PostId(2));
            }
            PageOutcome::NotFound => panic!("expected found"),
        }
    }

    #[test]
    fn test_not_found_route_is_terminal() {
        let store = store();
        let config = SiteConfig::default();
        let route = PostRoute::new(&store, &config, "no-such-slug");

        assert!(!route.outcome().is_found());
        assert!(route.metadata().title.contains("Post Not Found"));
    }

    #[test]
    fn test_hooks_agree_on_one_resolution() {
        let store = store();
        let config = SiteConfig::default();
        let route = PostRoute::new(&store, &config, "compress-pdf");

        // Metadata first, body second: both hooks see the same resolution
        let meta = route.metadata();
        let outcome = route.outcome();
        assert!(outcome.is_found());
        assert!(meta.title.starts_with("compress-pdf |"));
        // And again, in either order
        assert_eq!(route.metadata(), meta);
    }

    #[test]
    fn test_related_count_bounded_by_config() {
        let store = store();
        let mut config = SiteConfig::default();
        config.related_posts = 0;
        let route = PostRoute::new(&store, &config, "merge-pdf");
        match route.outcome() {
            PageOutcome::Found { related, .. } => assert!(related.is_empty()),
            PageOutcome::NotFound => panic!("expected found"),
        }
    }
}
