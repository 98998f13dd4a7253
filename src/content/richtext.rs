//! Rich-text to HTML rendering
//!
//! The provider stores post bodies as structured text: a flat list of typed
//! nodes, each carrying plain text plus formatting spans addressed by
//! character offset. [`render_html`] is the single conversion boundary;
//! resolved posts keep their nodes unmodified and conversion happens only
//! at render time.

use serde::{Deserialize, Serialize};

/// One block-level node of structured rich text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RichTextNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Plain text content, empty for images
    #[serde(default)]
    pub text: String,

    /// Formatting spans, addressed by character offsets into `text`
    #[serde(default)]
    pub spans: Vec<Span>,

    /// Image source, present for image nodes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Image alt text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl RichTextNode {
    /// A span-free text node
    pub fn text(kind: NodeKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
        }
    }
}

/// Block node types understood by the renderer.
///
/// An unknown type tag fails deserialization, which surfaces as a malformed
/// response instead of being silently dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeKind {
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OListItem,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "image")]
    Image,
}

/// An inline formatting span over `[start, end)` character offsets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpanKind {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "hyperlink")]
    Hyperlink,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
}

impl Span {
    fn open_tag(&self) -> String {
        match self.kind {
            SpanKind::Strong => "<strong>".to_string(),
            SpanKind::Em => "<em>".to_string(),
            SpanKind::Hyperlink => {
                let url = self
                    .data
                    .as_ref()
                    .and_then(|d| d.url.as_deref())
                    .unwrap_or("");
                format!(r#"<a href="{}">"#, escape(url))
            }
        }
    }

    fn close_tag(&self) -> &'static str {
        match self.kind {
            SpanKind::Strong => "</strong>",
            SpanKind::Em => "</em>",
            SpanKind::Hyperlink => "</a>",
        }
    }
}

/// Render a sequence of rich-text nodes to an HTML fragment.
///
/// Consecutive list items of the same flavor are grouped into a single
/// `<ul>`/`<ol>`. All text and attribute content is escaped.
pub fn render_html(nodes: &[RichTextNode]) -> String {
    let mut out = String::new();
    let mut i = 0;

    while i < nodes.len() {
        let node = &nodes[i];
        match node.kind {
            NodeKind::ListItem | NodeKind::OListItem => {
                let flavor = node.kind;
                let tag = if flavor == NodeKind::ListItem { "ul" } else { "ol" };
                out.push_str(&format!("<{}>", tag));
                while i < nodes.len() && nodes[i].kind == flavor {
                    out.push_str("<li>");
                    out.push_str(&render_spans(&nodes[i].text, &nodes[i].spans));
                    out.push_str("</li>");
                    i += 1;
                }
                out.push_str(&format!("</{}>", tag));
                continue;
            }
            NodeKind::Paragraph => {
                out.push_str("<p>");
                out.push_str(&render_spans(&node.text, &node.spans));
                out.push_str("</p>");
            }
            NodeKind::Heading1
            | NodeKind::Heading2
            | NodeKind::Heading3
            | NodeKind::Heading4
            | NodeKind::Heading5
            | NodeKind::Heading6 => {
                let level = heading_level(node.kind);
                out.push_str(&format!("<h{}>", level));
                out.push_str(&render_spans(&node.text, &node.spans));
                out.push_str(&format!("</h{}>", level));
            }
            NodeKind::Preformatted => {
                out.push_str("<pre>");
                out.push_str(&escape(&node.text));
                out.push_str("</pre>");
            }
            NodeKind::Image => {
                let src = node.url.as_deref().unwrap_or("");
                let alt = node.alt.as_deref().unwrap_or("");
                out.push_str(&format!(
                    r#"<img src="{}" alt="{}">"#,
                    escape(src),
                    escape(alt)
                ));
            }
        }
        i += 1;
    }

    out
}

fn heading_level(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Heading1 => 1,
        NodeKind::Heading2 => 2,
        NodeKind::Heading3 => 3,
        NodeKind::Heading4 => 4,
        NodeKind::Heading5 => 5,
        NodeKind::Heading6 => 6,
        _ => 6,
    }
}

/// Apply formatting spans to a text run, escaping as we go.
///
/// Spans are addressed in character offsets and assumed properly nested,
/// which is what the provider emits. Closing tags are written before
/// opening tags at the same offset so adjacent spans do not interleave.
fn render_spans(text: &str, spans: &[Span]) -> String {
    if spans.is_empty() {
        return escape(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    // Outer spans open before inner ones at the same offset.
    let mut opening: Vec<&Span> = spans.iter().collect();
    opening.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    for pos in 0..=chars.len() {
        // Inner spans close before outer ones.
        let mut closing: Vec<&Span> = spans.iter().filter(|s| s.end == pos).collect();
        closing.sort_by(|a, b| b.start.cmp(&a.start));
        for span in closing {
            out.push_str(span.close_tag());
        }

        for span in &opening {
            if span.start == pos {
                out.push_str(&span.open_tag());
            }
        }

        if let Some(c) = chars.get(pos) {
            push_escaped(&mut out, *c);
        }
    }

    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, kind: SpanKind) -> Span {
        Span {
            start,
            end,
            kind,
            data: None,
        }
    }

    #[test]
    fn test_paragraph() {
        let nodes = [RichTextNode::text(NodeKind::Paragraph, "Hello world")];
        assert_eq!(render_html(&nodes), "<p>Hello world</p>");
    }

    #[test]
    fn test_heading_levels() {
        let nodes = [
            RichTextNode::text(NodeKind::Heading1, "Top"),
            RichTextNode::text(NodeKind::Heading3, "Sub"),
        ];
        assert_eq!(render_html(&nodes), "<h1>Top</h1><h3>Sub</h3>");
    }

    #[test]
    fn test_text_is_escaped() {
        let nodes = [RichTextNode::text(NodeKind::Paragraph, "a < b & \"c\"")];
        assert_eq!(
            render_html(&nodes),
            "<p>a &lt; b &amp; &quot;c&quot;</p>"
        );
    }

    #[test]
    fn test_strong_span() {
        let mut node = RichTextNode::text(NodeKind::Paragraph, "be bold now");
        node.spans = vec![span(3, 7, SpanKind::Strong)];
        assert_eq!(render_html(&[node]), "<p>be <strong>bold</strong> now</p>");
    }

    #[test]
    fn test_nested_spans() {
        let mut node = RichTextNode::text(NodeKind::Paragraph, "abcdef");
        node.spans = vec![span(0, 6, SpanKind::Strong), span(2, 4, SpanKind::Em)];
        assert_eq!(
            render_html(&[node]),
            "<p><strong>ab<em>cd</em>ef</strong></p>"
        );
    }

    #[test]
    fn test_adjacent_spans_do_not_interleave() {
        let mut node = RichTextNode::text(NodeKind::Paragraph, "abcd");
        node.spans = vec![span(0, 2, SpanKind::Strong), span(2, 4, SpanKind::Em)];
        assert_eq!(
            render_html(&[node]),
            "<p><strong>ab</strong><em>cd</em></p>"
        );
    }

    #[test]
    fn test_span_to_end_of_text() {
        let mut node = RichTextNode::text(NodeKind::Paragraph, "tail");
        node.spans = vec![span(0, 4, SpanKind::Em)];
        assert_eq!(render_html(&[node]), "<p><em>tail</em></p>");
    }

    #[test]
    fn test_hyperlink_span() {
        let mut node = RichTextNode::text(NodeKind::Paragraph, "see docs");
        node.spans = vec![Span {
            start: 4,
            end: 8,
            kind: SpanKind::Hyperlink,
            data: Some(SpanData {
                url: Some("https://example.com".to_string()),
            }),
        }];
        assert_eq!(
            render_html(&[node]),
            r#"<p>see <a href="https://example.com">docs</a></p>"#
        );
    }

    #[test]
    fn test_span_offsets_are_character_based() {
        // multi-byte characters before the span must not shift it
        let mut node = RichTextNode::text(NodeKind::Paragraph, "héllo wörld");
        node.spans = vec![span(6, 11, SpanKind::Strong)];
        assert_eq!(
            render_html(&[node]),
            "<p>héllo <strong>wörld</strong></p>"
        );
    }

    #[test]
    fn test_consecutive_list_items_group() {
        let nodes = [
            RichTextNode::text(NodeKind::ListItem, "one"),
            RichTextNode::text(NodeKind::ListItem, "two"),
            RichTextNode::text(NodeKind::Paragraph, "after"),
        ];
        assert_eq!(
            render_html(&nodes),
            "<ul><li>one</li><li>two</li></ul><p>after</p>"
        );
    }

    #[test]
    fn test_ordered_and_unordered_lists_do_not_merge() {
        let nodes = [
            RichTextNode::text(NodeKind::ListItem, "a"),
            RichTextNode::text(NodeKind::OListItem, "b"),
        ];
        assert_eq!(render_html(&nodes), "<ul><li>a</li></ul><ol><li>b</li></ol>");
    }

    #[test]
    fn test_preformatted_and_image() {
        let nodes = [
            RichTextNode::text(NodeKind::Preformatted, "let x = 1 < 2;"),
            RichTextNode {
                kind: NodeKind::Image,
                text: String::new(),
                spans: Vec::new(),
                url: Some("https://img.example/banner.png".to_string()),
                alt: Some("banner".to_string()),
            },
        ];
        assert_eq!(
            render_html(&nodes),
            r#"<pre>let x = 1 &lt; 2;</pre><img src="https://img.example/banner.png" alt="banner">"#
        );
    }

    #[test]
    fn test_deserialize_provider_shape() {
        let json = r#"[
            {"type": "paragraph", "text": "hi", "spans": [
                {"start": 0, "end": 2, "type": "strong"}
            ]},
            {"type": "image", "url": "https://img.example/a.png", "alt": "a"}
        ]"#;
        let nodes: Vec<RichTextNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes[0].kind, NodeKind::Paragraph);
        assert_eq!(nodes[0].spans[0].kind, SpanKind::Strong);
        assert_eq!(nodes[1].url.as_deref(), Some("https://img.example/a.png"));
    }

    #[test]
    fn test_unknown_node_type_is_rejected() {
        let json = r#"[{"type": "embed", "text": ""}]"#;
        assert!(serde_json::from_str::<Vec<RichTextNode>>(json).is_err());
    }
}
