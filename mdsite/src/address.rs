//! Output addressing: where each page is written and what links to it look like.
//!
//! Output paths mirror links as they are written in the source. A document reached through
//! `./4/4.md` from a page written to `dist/index.html` lands at `dist/4/4.html`, so the relative
//! link structure of the output tree matches the input tree.

use camino::{Utf8Path, Utf8PathBuf};
use common::{
    join_sibling, parent_dir, relative_path, replace_extension, replace_stem, split_last_segment,
};

const PAGE_EXTENSION: &str = "html";
const INDEX_FILE: &str = "index.html";

/// How a document was reached during the crawl.
#[derive(Debug, Clone, Copy)]
pub enum Origin<'a> {
    /// The document the crawl starts from
    Entry {
        explicit_output: Option<&'a Utf8Path>,
    },
    /// A document linked as `href` from the page written to `referrer_output`
    Linked {
        referrer_output: &'a Utf8Path,
        href: &'a str,
    },
}

/// Computes output locations under one addressing policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver {
    pretty_urls: bool,
}

impl PathResolver {
    /// With `pretty_urls`, pages are written as `<name>/index.html` and linked as `<name>/`.
    #[must_use]
    pub fn new(pretty_urls: bool) -> Self {
        Self { pretty_urls }
    }

    #[must_use]
    pub fn pretty_urls(&self) -> bool {
        self.pretty_urls
    }

    /// Computes where the page for the document at `input` is written.
    ///
    /// An explicit entry output is returned verbatim. Otherwise the location is derived from the
    /// entry's own input path or from the referring page's output directory joined with the link,
    /// the extension becomes `.html`, a linked document's `slug` replaces its basename, and in
    /// pretty-URL mode `<name>.html` becomes `<name>/index.html`.
    #[must_use]
    pub fn output_path(&self, input: &Utf8Path, slug: Option<&str>, origin: Origin<'_>) -> Utf8PathBuf {
        let (candidate, slug) = match origin {
            Origin::Entry {
                explicit_output: Some(output),
            } => return output.to_owned(),
            // the entry keeps its own name even when it declares a slug
            Origin::Entry {
                explicit_output: None,
            } => (input.to_owned(), None),
            Origin::Linked {
                referrer_output,
                href,
            } => (join_sibling(referrer_output, href), slug),
        };

        let mut path = replace_extension(candidate.as_str(), PAGE_EXTENSION);

        if let Some(slug) = slug {
            path = replace_stem(&path, slug);
        }

        if self.pretty_urls {
            path = format!("{}/{INDEX_FILE}", strip_page_extension(&path));
        }

        path.into()
    }

    /// Rewrites a link to a non-entry document the way it was written, with the `.html`
    /// extension and the target's slug applied. In pretty-URL mode the link is `<name>/`.
    #[must_use]
    pub fn href(&self, href: &str, slug: Option<&str>) -> String {
        let mut rewritten = replace_extension(href, PAGE_EXTENSION);

        if let Some(slug) = slug {
            rewritten = replace_stem(&rewritten, slug);
        }

        if self.pretty_urls {
            rewritten = format!("{}/", strip_page_extension(&rewritten));
        }

        rewritten
    }

    /// Rewrites a link to a document whose output location is already fixed, such as the entry
    /// or a page placed by an earlier referrer. The link is computed from the two output paths
    /// rather than from the link as written. In pretty-URL mode a trailing `index.html` is
    /// dropped. A link written with a leading `./` keeps it.
    #[must_use]
    pub fn href_to_output(
        &self,
        referrer_output: &Utf8Path,
        target_output: &Utf8Path,
        href: &str,
    ) -> String {
        let Some(relative) = relative_path(parent_dir(referrer_output), target_output) else {
            // no lexical route between the two outputs; keep the link's own directory
            let (dir, _) = split_last_segment(href);
            return format!("{dir}{}", target_output.file_name().unwrap_or(INDEX_FILE));
        };

        let mut relative = relative.into_string();

        if self.pretty_urls {
            if let Some(dir) = relative
                .strip_suffix(INDEX_FILE)
                .filter(|dir| dir.is_empty() || dir.ends_with('/'))
            {
                relative = if dir.is_empty() { "./".into() } else { dir.into() };
            }
        }

        if href.starts_with("./") && !relative.starts_with("./") && !relative.starts_with("../") {
            relative.insert_str(0, "./");
        }

        relative
    }
}

fn strip_page_extension(path: &str) -> &str {
    path.strip_suffix(".html").unwrap_or(path)
}
