//! Content loader - loads posts from the source directory

use anyhow::Result;
use chrono::Local;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post, PostId};
use crate::helpers::{full_url_for, strip_html, truncate_chars, url_for};
use crate::Pdfzone;

/// Fallback summary length when a post has no excerpt
const EXCERPT_CHARS: usize = 200;

/// Loads posts from the source directory
pub struct ContentLoader<'a> {
    site: &'a Pdfzone,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Pdfzone) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.highlight.line_number,
        );
        Self { site, renderer }
    }

    /// Load all posts from source/_posts, sorted newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.site.source_dir.join("_posts");
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let now = Local::now();
        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => {
                        if !post.published && !self.site.config.render_drafts {
                            continue;
                        }
                        if post.date > now && !self.site.config.future {
                            tracing::debug!("Skipping future-dated post: {}", post.source);
                            continue;
                        }
                        posts.push(post);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Store order is recency: newest first
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        assign_ids(&mut posts);

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        // Get file metadata for dates
        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t));

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        let updated = fm.parse_updated().or(file_modified);

        // Get title from front-matter or filename
        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // Slug comes from front-matter or the filename, normalized to be
        // URL-safe. Slugs are the stable route identity and must not change
        // once a post is published.
        let slug = fm
            .slug
            .clone()
            .map(|s| slug::slugify(&s))
            .unwrap_or_else(|| {
                slug::slugify(
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("untitled"),
                )
            });

        let config = &self.site.config;
        let page_path = url_for(config, &format!("{}/{}/", config.blog_dir, slug));
        let permalink = full_url_for(config, &page_path);

        // Split excerpt and render markdown
        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let content_html = self.renderer.render(&full_md)?;

        let excerpt = match &fm.excerpt {
            Some(e) => e.trim().to_string(),
            None => {
                let summary_src = match &excerpt_md {
                    Some(md) => self.renderer.render(md)?,
                    None => content_html.clone(),
                };
                truncate_chars(strip_html(&summary_src).trim(), EXCERPT_CHARS)
            }
        };

        // The id is fixed up by assign_ids after sorting unless pinned
        let id = PostId(fm.id.unwrap_or(0));

        let mut post = Post::new(id, title, date, source);
        post.updated = updated;
        post.author = fm.author.clone().unwrap_or_else(|| config.author.clone());
        post.slug = slug;
        post.category = fm
            .category
            .clone()
            .unwrap_or_else(|| config.default_category.clone());
        post.tags = fm.tags.clone();
        post.excerpt = excerpt;
        post.raw = body.to_string();
        post.content = content_html;
        post.full_source = path.to_path_buf();
        post.path = page_path;
        post.permalink = permalink;
        post.published = fm.published;
        post.extra = fm.extra;

        Ok(post)
    }
}

/// Assign ordinal ids to posts without a pinned front-matter id.
///
/// Pinned ids are kept as-is; ordinals fill the gaps in store order.
fn assign_ids(posts: &mut [Post]) {
    let pinned: HashSet<u32> = posts.iter().map(|p| p.id.0).filter(|&id| id != 0).collect();

    let mut next = 1u32;
    for post in posts.iter_mut() {
        if post.id.0 == 0 {
            while pinned.contains(&next) {
                next += 1;
            }
            post.id = PostId(next);
            next += 1;
        }
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, content: &str) {
        let posts_dir = dir.join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        let mut f = fs::File::create(posts_dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn site(dir: &TempDir) -> Pdfzone {
        Pdfzone::new(dir.path()).unwrap()
    }

    #[test]
    fn test_load_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "older.md",
            "---\ntitle: Older\ndate: 2024-01-01\n---\n\nOld body.\n",
        );
        write_post(
            dir.path(),
            "newer.md",
            "---\ntitle: Newer\ndate: 2024-06-01\n---\n\nNew body.\n",
        );

        let site = site(&dir);
        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Newer");
        assert_eq!(posts[1].title, "Older");
        assert_eq!(posts[0].slug, "newer");
        assert!(posts[0].path.ends_with("/blog/newer/"));
    }

    #[test]
    fn test_unpublished_posts_skipped() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "draft.md",
            "---\ntitle: Draft\ndate: 2024-01-01\npublished: false\n---\n\nBody.\n",
        );

        let site = site(&dir);
        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_pinned_ids_kept_and_gaps_filled() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "a.md",
            "---\ntitle: A\ndate: 2024-03-01\nid: 1\n---\n\nBody.\n",
        );
        write_post(
            dir.path(),
            "b.md",
            "---\ntitle: B\ndate: 2024-02-01\n---\n\nBody.\n",
        );

        let site = site(&dir);
        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts[0].id, PostId(1)); // pinned
        assert_eq!(posts[1].id, PostId(2)); // first free ordinal
    }

    #[test]
    fn test_excerpt_from_more_marker() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "c.md",
            "---\ntitle: C\ndate: 2024-03-01\n---\n\nShort intro here.\n\n<!-- more -->\n\nLong body follows.\n",
        );

        let site = site(&dir);
        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts[0].excerpt, "Short intro here.");
        assert!(posts[0].content.contains("Long body follows."));
    }
}
