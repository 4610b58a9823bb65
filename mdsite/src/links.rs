//! Anchor scanning and `href` rewriting over rendered HTML, built on `lol_html`.

use foldhash::HashMap;
use lol_html::{element, errors::RewritingError, rewrite_str, RewriteStrSettings};

/// Whether an `href` names a Markdown document that may belong to the site.
#[must_use]
pub fn is_markdown_link(href: &str) -> bool {
    href.len() > ".md".len() && href.ends_with(".md")
}

/// Collects the `href` of every anchor that points at a Markdown document, in document order.
/// Repeated links are reported once per anchor.
///
/// # Errors
/// This function returns an error if the HTML rewriter rejects the markup.
pub fn markdown_links(html: &str) -> Result<Vec<String>, RewritingError> {
    let mut hrefs = Vec::new();

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("a[href]", |el| {
                if let Some(href) = el.get_attribute("href").filter(|href| is_markdown_link(href)) {
                    hrefs.push(href);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    Ok(hrefs)
}

/// Replaces anchor `href` values found in `rewrites`. Every other byte of the input is kept.
///
/// # Errors
/// This function returns an error if the HTML rewriter rejects the markup.
pub fn rewrite_links(
    html: &str,
    rewrites: &HashMap<String, String>,
) -> Result<String, RewritingError> {
    if rewrites.is_empty() {
        return Ok(html.to_owned());
    }

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("a[href]", |el| {
                if let Some(target) = el
                    .get_attribute("href")
                    .and_then(|href| rewrites.get(&href))
                {
                    el.set_attribute("href", target)?;
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
}

#[cfg(test)]
mod test {
    use super::{is_markdown_link, markdown_links, rewrite_links};
    use foldhash::{HashMap, HashMapExt};
    use pretty_assertions::assert_eq;

    const PAGE: &str = concat!(
        r#"<ul><li><a href="./2.md">url2</a></li>"#,
        r#"<li><a href="https://example.com">ext</a></li>"#,
        r#"<li><a href=".md">bare</a></li>"#,
        r#"<li><a href="./2.md#intro">fragment</a></li>"#,
        r#"<li><a href="missing.md">missing</a></li>"#,
        r#"<li><a href="./2.md">again</a></li></ul>"#,
    );

    #[test]
    fn markdown_suffix() {
        assert!(is_markdown_link("a.md"));
        assert!(is_markdown_link("../docs/readme.md"));
        assert!(!is_markdown_link(".md"));
        assert!(!is_markdown_link("a.md#top"));
        assert!(!is_markdown_link("a.mdx"));
    }

    #[test]
    fn scans_anchors_in_order() {
        assert_eq!(
            markdown_links(PAGE).expect("scanning should succeed"),
            vec!["./2.md", "missing.md", "./2.md"]
        );
    }

    #[test]
    fn rewrites_matching_hrefs_only() {
        let mut rewrites = HashMap::new();
        rewrites.insert("./2.md".to_owned(), "./2.html".to_owned());

        let html = rewrite_links(PAGE, &rewrites).expect("rewriting should succeed");

        assert_eq!(
            html,
            PAGE.replace(r#""./2.md""#, r#""./2.html""#),
            "only exact `href` matches should change"
        );
        assert!(html.contains(r#"<a href="missing.md">missing</a>"#));
    }

    #[test]
    fn no_rewrites_is_identity() {
        assert_eq!(
            rewrite_links(PAGE, &HashMap::new()).expect("rewriting should succeed"),
            PAGE
        );
    }
}
