//! Generator module - emits the static site from a content store snapshot
//!
//! One page per enumerated slug, paginated index pages, a 404 fallback built
//! from the not-found metadata sentinel, an Atom feed and a search index.
//! Every page generation is an independent read of the immutable store, so
//! ordering between pages does not matter.

use anyhow::Result;
use std::fs;
use std::path::Path;

use chrono::Datelike;
use tera::Context;
use walkdir::WalkDir;

use crate::content::Post;
use crate::helpers::{escape_html, strip_html};
use crate::meta::MetadataBuilder;
use crate::route::{PageOutcome, PostRoute};
use crate::store::ContentStore;
use crate::templates::{NavPost, PaginationData, PostData, SiteData, TemplateRenderer};
use crate::Pdfzone;

/// Number of entries in the Atom feed
const FEED_LIMIT: usize = 20;

/// Static site generator using the embedded Tera theme
pub struct Generator {
    site: Pdfzone,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Pdfzone) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            site: site.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, store: &ContentStore) -> Result<()> {
        // Enumerator/resolver consistency: a slug that cannot resolve would
        // produce a broken route, so it fails the build here.
        store.verify()?;

        fs::create_dir_all(&self.site.public_dir)?;

        self.copy_source_assets()?;

        let site_data = self.build_site_data();

        self.generate_index_pages(store, &site_data)?;
        self.generate_post_pages(store, &site_data)?;
        self.generate_not_found_page(&site_data)?;
        self.generate_atom_feed(store)?;
        self.generate_search_index(store)?;

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(&self) -> SiteData {
        let config = &self.site.config;
        SiteData {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }

    /// Build per-post template data
    fn build_post_data(&self, post: &Post) -> PostData {
        PostData {
            title: post.title.clone(),
            date: post.date.format(&self.site.config.date_format).to_string(),
            iso_date: post.date.to_rfc3339(),
            author: post.author.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            path: post.path.clone(),
            permalink: post.permalink.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert(
            "current_year",
            &chrono::Local::now().year().to_string(),
        );
        context
    }

    /// Generate index pages with pagination
    fn generate_index_pages(&self, store: &ContentStore, site_data: &SiteData) -> Result<()> {
        let config = &self.site.config;
        let posts = store.posts();
        let per_page = config.per_page.max(1);
        let total_pages = posts.len().div_ceil(per_page).max(1);
        let builder = MetadataBuilder::new(config);

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(posts.len());
            let page_posts: Vec<PostData> = posts[start..end]
                .iter()
                .map(|p| self.build_post_data(p))
                .collect();

            let page_url = |n: usize| -> String {
                if n <= 1 {
                    config.root.clone()
                } else {
                    format!("{}{}/{}/", config.root, config.pagination_dir, n)
                }
            };

            let pagination = PaginationData {
                per_page,
                total: total_pages,
                current: page_num,
                current_url: page_url(page_num),
                prev_link: if page_num > 1 {
                    page_url(page_num - 1)
                } else {
                    String::new()
                },
                next_link: if page_num < total_pages {
                    page_url(page_num + 1)
                } else {
                    String::new()
                },
            };

            let meta = builder.for_index(page_num, &pagination.current_url);

            let mut context = self.create_base_context(site_data);
            context.insert("meta", &meta);
            context.insert("page_posts", &page_posts);
            context.insert("pagination", &pagination);

            let html = self.renderer.render("index.html", &context)?;

            let output_path = if page_num == 1 {
                self.site.public_dir.join("index.html")
            } else {
                self.site
                    .public_dir
                    .join(format!("{}/{}/index.html", config.pagination_dir, page_num))
            };

            write_page(&output_path, &html)?;
            tracing::debug!("Generated: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate one page per enumerated slug
    fn generate_post_pages(&self, store: &ContentStore, site_data: &SiteData) -> Result<()> {
        let config = &self.site.config;

        for slug in store.all_slugs() {
            let route = PostRoute::new(store, config, slug);
            let meta = route.metadata();

            let (post, related) = match route.outcome() {
                PageOutcome::Found { post, related } => (post, related),
                // verify() ran before generation, so this is unreachable
                // data corruption rather than a user-facing 404
                PageOutcome::NotFound => {
                    anyhow::bail!("enumerated slug \"{}\" failed to resolve", slug)
                }
            };

            let related_data: Vec<PostData> =
                related.iter().map(|p| self.build_post_data(p)).collect();

            let mut context = self.create_base_context(site_data);
            context.insert("meta", &meta);
            context.insert("post", &self.build_post_data(post));
            context.insert("related", &related_data);

            if let Some(prev) = post.prev(store.posts()) {
                context.insert(
                    "prev_post",
                    &NavPost {
                        title: prev.title.clone(),
                        path: prev.path.clone(),
                    },
                );
            }
            if let Some(next) = post.next(store.posts()) {
                context.insert(
                    "next_post",
                    &NavPost {
                        title: next.title.clone(),
                        path: next.path.clone(),
                    },
                );
            }

            let html = self.renderer.render("post.html", &context)?;

            let clean_path = post.path.trim_start_matches('/');
            let output_path = self.site.public_dir.join(clean_path).join("index.html");
            write_page(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        tracing::info!("Generated {} post pages", store.len());
        Ok(())
    }

    /// Generate the 404 fallback page from the not-found metadata sentinel
    fn generate_not_found_page(&self, site_data: &SiteData) -> Result<()> {
        let meta = MetadataBuilder::new(&self.site.config).not_found();

        let mut context = self.create_base_context(site_data);
        context.insert("meta", &meta);

        let html = self.renderer.render("not_found.html", &context)?;
        let output_path = self.site.public_dir.join("404.html");
        write_page(&output_path, &html)?;
        tracing::info!("Generated 404.html");

        Ok(())
    }

    /// Generate the Atom feed
    fn generate_atom_feed(&self, store: &ContentStore) -> Result<()> {
        let config = &self.site.config;
        let base_url = config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_html(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
            base_url
        ));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Local::now().to_rfc3339()
        ));
        feed.push_str(&format!("  <id>{}/</id>\n", base_url));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_html(&config.author)
        ));

        for post in store.posts().iter().take(FEED_LIMIT) {
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_html(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", post.permalink));
            feed.push_str(&format!("    <id>{}</id>\n", post.permalink));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                post.date.to_rfc3339()
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                post.updated.unwrap_or(post.date).to_rfc3339()
            ));
            feed.push_str(&format!(
                "    <author><name>{}</name></author>\n",
                escape_html(&post.author)
            ));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_html(&post.excerpt)
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.site.public_dir.join("atom.xml");
        fs::write(&output_path, feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, store: &ContentStore) -> Result<()> {
        let search_data: Vec<serde_json::Value> = store
            .posts()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.title,
                    "url": p.path,
                    "category": p.category,
                    "tags": p.tags,
                    "excerpt": p.excerpt,
                    "content": strip_html(&p.content),
                    "date": p.date.format("%Y-%m-%d").to_string(),
                })
            })
            .collect();

        let output_path = self.site.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Copy source assets (images, etc.) to the public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());

                // Markdown is processed separately
                if matches!(ext, Some("md") | Some("markdown")) {
                    continue;
                }

                if path
                    .components()
                    .any(|c| c.as_os_str() == "_posts" || c.as_os_str() == "_drafts")
                {
                    continue;
                }

                let relative = path.strip_prefix(source_dir)?;
                let dest = self.site.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Write a rendered page, creating parent directories as needed
fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(output_path, html)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
    Ok(())
}
