//! Depth-first traversal of the link graph rooted at the entry document.
//!
//! Each reachable document is rendered, has its Markdown links rewritten to the generated pages,
//! and is written exactly once. A page's output location is fixed by the first page that links to
//! it, and every later link to it is computed against that location.

use crate::{
    address::{Origin, PathResolver},
    builder::{Page, PageBuilder},
    config::Config,
    fs::FileSystem,
    links::{markdown_links, rewrite_links},
    render::Render,
    store::DocumentStore,
    Error,
};
use camino::{Utf8Path, Utf8PathBuf};
use common::{clean, join_sibling};
use foldhash::{HashMap, HashSet, HashSetExt};
use tracing::{debug, info};

/// Outcome of reaching a document during the crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Processed,
    /// The document was already processed or is being processed further up the traversal
    SkippedDuplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Pages written by a successful run, in write order
    pub pages: Vec<WrittenPage>,
    /// Links that led back to a document already processed or in progress
    pub skipped: usize,
}

/// Link rewrites for one page and the documents they lead to.
#[derive(Default)]
struct ResolvedLinks {
    rewrites: HashMap<String, String>,
    // (input, output) in the order the links first appear
    targets: Vec<(Utf8PathBuf, Utf8PathBuf)>,
}

/// Run-scoped crawler. Construct one per build.
pub struct Crawler<'a> {
    config: &'a Config,
    resolver: PathResolver,
    renderer: &'a dyn Render,
    pages: &'a PageBuilder,
    fs: &'a dyn FileSystem,
    store: DocumentStore<'a>,
    visited: HashSet<Utf8PathBuf>,
    summary: Summary,
}

impl<'a> Crawler<'a> {
    #[must_use]
    pub fn new(
        config: &'a Config,
        renderer: &'a dyn Render,
        pages: &'a PageBuilder,
        fs: &'a dyn FileSystem,
    ) -> Self {
        Self {
            config,
            resolver: PathResolver::new(config.omit_html_suffix),
            renderer,
            pages,
            fs,
            store: DocumentStore::new(fs),
            visited: HashSet::new(),
            summary: Summary::default(),
        }
    }

    /// Builds the site reachable from `entry`.
    ///
    /// # Errors
    /// This function returns an error if the entry document is missing, or if any reachable
    /// document cannot be read, parsed, rendered or written. The run stops at the first error;
    /// pages written before it should not be trusted.
    pub fn run(mut self, entry: &Utf8Path) -> Result<Summary, Error> {
        let config = self.config;
        let entry = clean(entry);

        let doc = self.store.load_mut(&entry)?;
        let output = self.resolver.output_path(
            &entry,
            doc.slug(),
            Origin::Entry {
                explicit_output: config.explicit_output(),
            },
        );
        doc.place(output.clone());

        self.process(entry, output, config.explicit_title())?;

        Ok(self.summary)
    }

    fn process(
        &mut self,
        path: Utf8PathBuf,
        output: Utf8PathBuf,
        title: Option<&str>,
    ) -> Result<Visit, Error> {
        if !self.visited.insert(path.clone()) {
            debug!("{path} already visited");
            return Ok(Visit::SkippedDuplicate);
        }

        info!("{path} -> {output}");

        let doc = self.store.load_mut(&path)?;
        let markup = self
            .renderer
            .render(doc.body())
            .map_err(|source| Error::Render {
                path: path.clone(),
                source,
            })?;
        doc.rendered(markup);

        let hrefs = if self.config.link {
            markdown_links(doc.markup().unwrap_or_default()).map_err(|source| Error::Links {
                path: path.clone(),
                source,
            })?
        } else {
            Vec::new()
        };

        let links = self.resolve_links(&path, &output, &hrefs)?;

        let doc = self.store.load_mut(&path)?;
        let markup = rewrite_links(doc.markup().unwrap_or_default(), &links.rewrites).map_err(
            |source| Error::Links {
                path: path.clone(),
                source,
            },
        )?;
        doc.links_rewritten(markup);

        let page = self.pages.build_page(&Page {
            title: title.unwrap_or(doc.title()),
            body: doc.markup().unwrap_or_default(),
            slug: doc.slug(),
        });

        self.fs
            .write(&output, &page)
            .map_err(|source| Error::Write {
                input: path.clone(),
                output: output.clone(),
                source,
            })?;
        doc.written();

        self.summary.pages.push(WrittenPage {
            input: path.clone(),
            output,
        });

        for (target, target_output) in links.targets {
            if self.process(target, target_output, None)? == Visit::SkippedDuplicate {
                self.summary.skipped += 1;
            }
        }

        self.store.load_mut(&path)?.done();

        Ok(Visit::Processed)
    }

    /// Works out the rewritten form of each Markdown link on the page at `path`, placing targets
    /// that no earlier page has linked to.
    fn resolve_links(
        &mut self,
        path: &Utf8Path,
        output: &Utf8Path,
        hrefs: &[String],
    ) -> Result<ResolvedLinks, Error> {
        let mut links = ResolvedLinks::default();

        for href in hrefs {
            if links.rewrites.contains_key(href) {
                continue;
            }

            let target = join_sibling(path, href);
            if !self.store.probe(&target)? {
                debug!("{path}: no document at {target}, leaving {href} as is");
                continue;
            }

            let doc = self.store.load_mut(&target)?;
            let mirrored = self.resolver.output_path(
                &target,
                doc.slug(),
                Origin::Linked {
                    referrer_output: output,
                    href,
                },
            );

            let (placed, rewritten) = match doc.output() {
                Some(placed) if placed != mirrored.as_path() => (
                    placed.to_owned(),
                    self.resolver.href_to_output(output, placed, href),
                ),
                Some(_) => (mirrored, self.resolver.href(href, doc.slug())),
                None => {
                    doc.place(mirrored.clone());
                    (mirrored, self.resolver.href(href, doc.slug()))
                }
            };

            if !links.targets.iter().any(|(input, _)| *input == target) {
                links.targets.push((target, placed));
            }
            links.rewrites.insert(href.clone(), rewritten);
        }

        Ok(links)
    }
}
