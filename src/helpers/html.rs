//! HTML helper functions

/// Strip HTML tags from content
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate to at most `length` characters, appending an ellipsis when cut
pub fn truncate_chars(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(length).collect();
        format!("{}…", truncated.trim_end())
    }
}

/// Escape text for safe embedding in HTML/XML attributes and content
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_html("no tags"), "no tags");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("hello world", 5), "hello…");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b < c"), "a &amp; b &lt; c");
    }
}
