//! Comments widget embedding
//!
//! Server-side counterpart of the fire-and-forget script injector: the
//! widget script is embedded inside a configured anchor element, scoped to
//! the page being rendered. Everything here is best-effort; a page without
//! the anchor, or an unconfigured widget, renders unchanged.

use crate::config::CommentsConfig;
use crate::helpers::html_escape;

const WIDGET_SRC: &str = "https://utteranc.es/client.js";

/// The widget script tag for one page.
pub fn widget_script(config: &CommentsConfig) -> String {
    format!(
        concat!(
            r#"<script src="{src}" async crossorigin="anonymous""#,
            r#" repo="{repo}" issue-term="{term}" label="{label}" theme="{theme}">"#,
            "</script>"
        ),
        src = WIDGET_SRC,
        repo = html_escape(&config.repo),
        term = html_escape(&config.issue_term),
        label = html_escape(&config.label),
        theme = html_escape(&config.theme),
    )
}

/// Attach the widget to its anchor element in a rendered page.
///
/// Any previously attached widget instance inside the anchor is removed
/// first, so repeated injection never stacks scripts. A missing anchor or
/// a widget without a configured repo leaves the page untouched.
pub fn inject(html: &str, config: &CommentsConfig) -> String {
    if !config.enable || config.repo.is_empty() {
        return html.to_string();
    }

    let open_tag = format!(r#"<div id="{}">"#, config.anchor_id);
    let Some(anchor_start) = html.find(&open_tag) else {
        tracing::debug!(anchor = %config.anchor_id, "comments anchor not present, skipping");
        return html.to_string();
    };

    let body_start = anchor_start + open_tag.len();
    let Some(body_len) = html[body_start..].find("</div>") else {
        return html.to_string();
    };

    let mut body = html[body_start..body_start + body_len].to_string();
    if let Some(prev) = body.find("<script") {
        // drop the previously attached instance
        if let Some(end) = body[prev..].find("</script>") {
            body.replace_range(prev..prev + end + "</script>".len(), "");
        }
    }
    body.push_str(&widget_script(config));

    let mut out = String::with_capacity(html.len() + 200);
    out.push_str(&html[..body_start]);
    out.push_str(&body);
    out.push_str(&html[body_start + body_len..]);
    out
}
