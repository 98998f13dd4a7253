//! HTML helper functions

/// Generate an anchor tag
pub fn link_to(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, href, html_escape(text))
}

/// Generate an image tag
pub fn image_tag(src: &str, alt: &str) -> String {
    format!(r#"<img src="{}" alt="{}">"#, html_escape(src), html_escape(alt))
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
