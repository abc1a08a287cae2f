//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_posts"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Already initialized: {:?}", config_path);
    }

    let config_content = r#"# Site
title: PDFzone Blog
subtitle: ''
description: Guides and news about working with PDF documents
author: PDFzone Team
language: en

# URL
url: https://pdfzone.example.com
root: /

# Directory
source_dir: source
public_dir: public
blog_dir: blog

# Writing
new_post_name: :title.md
render_drafts: false
future: true
highlight:
  theme: base16-ocean.dark
  line_number: false

# Category & Tag
default_category: general

# Related posts shown on each post page
related_posts: 3

# Pagination
per_page: 10
pagination_dir: page

# Social sharing
twitter_card: summary_large_image

# Date format (strftime)
date_format: '%Y-%m-%d'
"#;

    fs::write(&config_path, config_content)?;

    let welcome = r#"---
title: Welcome to the PDFzone Blog
date: 2024-01-01 09:00:00
category: general
tags:
  - announcements
---

First post. Write guides under `source/_posts`.

<!-- more -->

Run `pdfzone generate` to build the site into `public/`.
"#;

    fs::write(
        target_dir.join("source/_posts/welcome.md"),
        welcome,
    )?;

    Ok(())
}
