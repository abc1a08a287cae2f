//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Pdfzone;

/// Create a new post source file under source/_posts
pub fn run(site: &Pdfzone, title: &str) -> Result<()> {
    let now = chrono::Local::now();

    let posts_dir = site.source_dir.join("_posts");
    fs::create_dir_all(&posts_dir)?;

    let post_slug = slug::slugify(title);
    let filename = site
        .config
        .new_post_name
        .replace(":title", &post_slug)
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string());

    let file_path = posts_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        r#"---
title: {}
date: {}
author: {}
category: {}
tags:
---
"#,
        title,
        now.format("%Y-%m-%d %H:%M:%S"),
        site.config.author,
        site.config.default_category,
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_post_created() {
        let dir = TempDir::new().unwrap();
        let site = Pdfzone::new(dir.path()).unwrap();

        run(&site, "How to Merge PDF Files").unwrap();

        let path = dir
            .path()
            .join("source/_posts/how-to-merge-pdf-files.md");
        assert!(path.exists());
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("title: How to Merge PDF Files"));
        assert!(content.contains("category: general"));
    }

    #[test]
    fn test_new_post_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = Pdfzone::new(dir.path()).unwrap();

        run(&site, "Duplicate").unwrap();
        assert!(run(&site, "Duplicate").is_err());
    }
}
