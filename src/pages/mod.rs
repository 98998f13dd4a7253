//! HTML page rendering
//!
//! Pages are plain strings assembled from the domain model. Rich text is
//! converted at this point and nowhere earlier.

use crate::comments;
use crate::config::SiteConfig;
use crate::content::{richtext, PostSummary, ResolvedPost};
use crate::helpers::{html_escape, image_tag, link_to, time_tag};

/// Render the listing page: accumulated post cards plus a load-more
/// control when further pages are available.
pub fn render_listing(config: &SiteConfig, posts: &[PostSummary], has_more: bool) -> String {
    let mut cards = String::new();
    for post in posts {
        cards.push_str("<article class=\"post-card\">");
        cards.push_str(&format!(
            r#"<a href="/post/{}"><strong>{}</strong></a>"#,
            post.uid,
            html_escape(&post.title)
        ));
        cards.push_str(&format!("<p>{}</p>", html_escape(&post.subtitle)));
        cards.push_str("<div class=\"info\">");
        if let Some(date) = &post.first_publication_date {
            cards.push_str(&time_tag(date, &config.date_format));
        }
        cards.push_str(&format!("<span>{}</span>", html_escape(&post.author)));
        cards.push_str("</div></article>");
    }

    // no control at all when the listing is complete; a dead load-more
    // action is worse than none
    let load_more = if has_more {
        r#"<div class="load-posts"><a href="/load-more">Load more posts</a></div>"#
    } else {
        ""
    };

    layout(
        config,
        &config.title,
        &format!(r#"<main class="listing">{}{}</main>"#, cards, load_more),
    )
}

/// Render a resolved post page.
pub fn render_post(config: &SiteConfig, resolved: &ResolvedPost) -> String {
    let post = &resolved.post;
    let mut body = String::new();

    if let Some(banner) = &post.banner_url {
        body.push_str(&format!(
            r#"<div class="banner">{}</div>"#,
            image_tag(banner, &post.uid)
        ));
    }

    body.push_str(&format!("<h1>{}</h1>", html_escape(&post.title)));

    body.push_str("<div class=\"info\">");
    if let Some(date) = &post.first_publication_date {
        body.push_str(&time_tag(date, &config.date_format));
    }
    body.push_str(&format!("<span>{}</span>", html_escape(&post.author)));
    body.push_str(&format!("<span>{} min</span>", post.reading_minutes()));
    body.push_str("</div>");

    if post.is_edited() {
        if let Some(edited) = &post.last_publication_date {
            body.push_str(&format!(
                r#"<p class="edited">* edited on {}</p>"#,
                crate::helpers::format_date(edited, &config.date_format)
            ));
        }
    }

    for block in &post.content {
        body.push_str(&format!("<h2>{}</h2>", html_escape(&block.heading)));
        body.push_str(&richtext::render_html(&block.body));
    }

    body.push_str("<nav class=\"post-nav\">");
    if let Some(prev) = &resolved.previous {
        body.push_str(&format!(
            r#"<div class="previous"><p>{}</p>{}</div>"#,
            html_escape(&prev.title),
            link_to(&format!("/post/{}", prev.uid), "Previous post")
        ));
    }
    if let Some(next) = &resolved.next {
        body.push_str(&format!(
            r#"<div class="next"><p>{}</p>{}</div>"#,
            html_escape(&next.title),
            link_to(&format!("/post/{}", next.uid), "Next post")
        ));
    }
    body.push_str("</nav>");

    body.push_str(&format!(
        r#"<div id="{}"></div>"#,
        config.comments.anchor_id
    ));

    let page = layout(config, &post.title, &format!("<main class=\"post\">{}</main>", body));
    comments::inject(&page, &config.comments)
}

/// Render the not-found page for an unknown slug.
pub fn render_not_found(config: &SiteConfig, slug: &str) -> String {
    layout(
        config,
        "Post not found",
        &format!(
            "<main class=\"not-found\"><h1>Post not found</h1><p>No post exists at <code>{}</code>.</p>{}</main>",
            html_escape(slug),
            link_to("/", "Back to all posts")
        ),
    )
}

fn layout(config: &SiteConfig, title: &str, main: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="{lang}">"#,
            "<head><meta charset=\"utf-8\"><title>{title} | {site}</title></head>",
            "<body><header><a href=\"/\">{site}</a></header>{main}</body></html>"
        ),
        lang = config.language,
        title = html_escape(title),
        site = html_escape(&config.title),
        main = main,
    )
}
