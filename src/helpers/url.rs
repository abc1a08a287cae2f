//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL path with the site root
///
/// # Examples
/// ```ignore
/// url_for(&config, "blog/merge-pdf/") // -> "/blog/merge-pdf/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/merge-pdf/") // -> "https://pdfzone.example.com/blog/merge-pdf/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = url_for(config, path);
    format!("{}{}", base, path)
}

/// Decode a percent-encoded URL path
pub fn decode_url(path: &str) -> String {
    percent_encoding::percent_decode_str(path)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://pdfzone.example.com".to_string(),
            root: "/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "blog/merge-pdf/"), "/blog/merge-pdf/");
        assert_eq!(url_for(&config, "/blog/merge-pdf/"), "/blog/merge-pdf/");
        assert_eq!(url_for(&config, ""), "/");
    }

    #[test]
    fn test_url_for_with_subroot() {
        let mut config = test_config();
        config.root = "/docs/".to_string();
        assert_eq!(url_for(&config, "blog/merge-pdf/"), "/docs/blog/merge-pdf/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/blog/merge-pdf/"),
            "https://pdfzone.example.com/blog/merge-pdf/"
        );
    }

    #[test]
    fn test_decode_url() {
        assert_eq!(decode_url("a%20b"), "a b");
        assert_eq!(decode_url("plain"), "plain");
    }
}
