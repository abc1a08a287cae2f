//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::store::ContentStore;
use crate::Pdfzone;

/// List site content by type
pub fn run(site: &Pdfzone, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(site);
    let posts = loader.load_posts()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        "slug" | "slugs" | "route" | "routes" => {
            let store = ContentStore::from_posts(posts)?;
            store.verify()?;
            println!("Routes ({}):", store.len());
            for slug in store.all_slugs() {
                println!("  {}{}/{}/", site.config.root, site.config.blog_dir, slug);
            }
        }
        "category" | "categories" => {
            let mut categories: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for post in &posts {
                *categories.entry(post.category.clone()).or_insert(0) += 1;
            }
            println!("Categories ({}):", categories.len());
            let mut categories: Vec<_> = categories.into_iter().collect();
            categories.sort_by(|a, b| b.1.cmp(&a.1));
            for (cat, count) in categories {
                println!("  {} ({})", cat, count);
            }
        }
        "tag" | "tags" => {
            let mut tags: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, slug, category, tag",
                content_type
            );
        }
    }

    Ok(())
}
