//! Run-scoped table of source documents, keyed by canonical input path.

use crate::{
    frontmatter::{Frontmatter, Meta},
    fs::FileSystem,
    Error,
};
use camino::{Utf8Path, Utf8PathBuf};
use common::clean;
use foldhash::{HashMap, HashMapExt};
use std::{collections::hash_map::Entry, io::ErrorKind};

/// Where a document is in the build pipeline. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Loaded,
    Rendered,
    LinksRewritten,
    Written,
    Done,
}

#[derive(Debug)]
pub struct Document {
    path: Utf8PathBuf,
    body: String,
    meta: Option<Meta>,
    markup: Option<String>,
    output: Option<Utf8PathBuf>,
    stage: Stage,
}

impl Document {
    fn new(path: Utf8PathBuf, Frontmatter { body, meta }: Frontmatter) -> Self {
        Self {
            path,
            body,
            meta,
            markup: None,
            output: None,
            stage: Stage::Loaded,
        }
    }

    /// Source text with the frontmatter block removed.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.meta.as_ref().and_then(Meta::slug)
    }

    /// The frontmatter title, falling back to the document's file name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(Meta::title)
            .or_else(|| self.path.file_name())
            .unwrap_or(self.path.as_str())
    }

    /// Rendered HTML, with links rewritten once the document reaches [`Stage::LinksRewritten`].
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Where the page is written. Fixed by the first page that links here, or by the entry
    /// resolution for the entry document.
    #[must_use]
    pub fn output(&self) -> Option<&Utf8Path> {
        self.output.as_deref()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn place(&mut self, output: Utf8PathBuf) {
        debug_assert!(self.output.is_none(), "{} placed twice", self.path);
        self.output = Some(output);
    }

    pub(crate) fn rendered(&mut self, markup: String) {
        self.advance(Stage::Loaded, Stage::Rendered);
        self.markup = Some(markup);
    }

    pub(crate) fn links_rewritten(&mut self, markup: String) {
        self.advance(Stage::Rendered, Stage::LinksRewritten);
        self.markup = Some(markup);
    }

    pub(crate) fn written(&mut self) {
        self.advance(Stage::LinksRewritten, Stage::Written);
    }

    pub(crate) fn done(&mut self) {
        self.advance(Stage::Written, Stage::Done);
    }

    fn advance(&mut self, from: Stage, to: Stage) {
        debug_assert_eq!(self.stage, from, "{} skipped a stage", self.path);
        self.stage = to;
    }
}

/// Loads each document at most once per run.
pub struct DocumentStore<'fs> {
    fs: &'fs dyn FileSystem,
    documents: HashMap<Utf8PathBuf, Document>,
}

impl<'fs> DocumentStore<'fs> {
    #[must_use]
    pub fn new(fs: &'fs dyn FileSystem) -> Self {
        Self {
            fs,
            documents: HashMap::new(),
        }
    }

    /// Returns the document at `path`, reading and parsing it on first use.
    ///
    /// # Errors
    /// This function returns an error if:
    /// - no file exists at `path` ([`Error::NotFound`])
    /// - the file cannot be read
    /// - the file's frontmatter is malformed
    pub fn load(&mut self, path: &Utf8Path) -> Result<&Document, Error> {
        self.load_mut(path).map(|doc| &*doc)
    }

    /// Whether a link target exists. A missing file, a directory or a path that runs through a
    /// file is not an error here, but a target that exists and fails to load is.
    ///
    /// # Errors
    /// See [`DocumentStore::load`], except for [`Error::NotFound`].
    pub fn probe(&mut self, path: &Utf8Path) -> Result<bool, Error> {
        match self.load(path) {
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn load_mut(&mut self, path: &Utf8Path) -> Result<&mut Document, Error> {
        let path = clean(path);

        match self.documents.entry(path) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = entry.key().clone();

                let source = self.fs.read(&path).map_err(|source| {
                    // a directory, or a path through a file, is no document either
                    if matches!(
                        source.kind(),
                        ErrorKind::NotFound | ErrorKind::IsADirectory | ErrorKind::NotADirectory
                    ) {
                        Error::NotFound { path: path.clone() }
                    } else {
                        Error::Read {
                            path: path.clone(),
                            source,
                        }
                    }
                })?;

                let frontmatter = Frontmatter::from_text(&source).map_err(|source| {
                    Error::Frontmatter {
                        path: path.clone(),
                        source,
                    }
                })?;

                Ok(entry.insert(Document::new(path, frontmatter)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{DocumentStore, Stage};
    use crate::{fs::FileSystem, Error};
    use camino::{Utf8Path, Utf8PathBuf};
    use std::{
        cell::Cell,
        collections::HashMap,
        io::{self, ErrorKind},
    };

    /// Serves fixed files and counts reads.
    struct CountingFs {
        files: HashMap<Utf8PathBuf, &'static str>,
        reads: Cell<usize>,
    }

    impl CountingFs {
        fn new(files: &[(&str, &'static str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, text)| (Utf8PathBuf::from(*path), *text))
                    .collect(),
                reads: Cell::new(0),
            }
        }
    }

    impl FileSystem for CountingFs {
        fn read(&self, path: &Utf8Path) -> io::Result<String> {
            self.reads.set(self.reads.get() + 1);
            self.files
                .get(path)
                .map(|text| (*text).to_owned())
                .ok_or_else(|| io::Error::from(ErrorKind::NotFound))
        }

        fn write(&self, _: &Utf8Path, _: &str) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn loads_once() {
        let fs = CountingFs::new(&[("docs/a.md", "---\ntitle: A\n---\nbody")]);
        let mut store = DocumentStore::new(&fs);

        let doc = store
            .load(Utf8Path::new("docs/a.md"))
            .expect("document should load");
        assert_eq!(doc.title(), "A");
        assert_eq!(doc.body(), "body");
        assert_eq!(doc.stage(), Stage::Loaded);

        // Equivalent spellings of the same path share one entry
        store
            .load(Utf8Path::new("docs/./x/../a.md"))
            .expect("document should load");

        assert_eq!(fs.reads.get(), 1);
    }

    #[test]
    fn title_falls_back_to_file_name() {
        let fs = CountingFs::new(&[("2.md", "[url3](./3.md)")]);
        let mut store = DocumentStore::new(&fs);

        let doc = store.load(Utf8Path::new("2.md")).expect("document should load");
        assert_eq!(doc.title(), "2.md");
        assert!(doc.meta().is_none());
    }

    #[test]
    fn missing_documents() {
        let fs = CountingFs::new(&[]);
        let mut store = DocumentStore::new(&fs);

        assert!(matches!(
            store.load(Utf8Path::new("missing.md")),
            Err(Error::NotFound { path }) if path == "missing.md"
        ));
        assert!(!store
            .probe(Utf8Path::new("missing.md"))
            .expect("probing a missing file should succeed"));
    }

    /// Fails every read the way the OS does for a directory or for a path through a file.
    struct DirectoryFs;

    impl FileSystem for DirectoryFs {
        fn read(&self, path: &Utf8Path) -> io::Result<String> {
            Err(io::Error::from(if path.as_str().contains(".md/") {
                ErrorKind::NotADirectory
            } else {
                ErrorKind::IsADirectory
            }))
        }

        fn write(&self, _: &Utf8Path, _: &str) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn non_files_are_missing() {
        let mut store = DocumentStore::new(&DirectoryFs);

        assert!(!store
            .probe(Utf8Path::new("d.md"))
            .expect("probing a directory should succeed"));
        assert!(!store
            .probe(Utf8Path::new("1.md/x.md"))
            .expect("probing a path through a file should succeed"));
        assert!(matches!(
            store.load(Utf8Path::new("d.md")),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn malformed_frontmatter_propagates() {
        let fs = CountingFs::new(&[("bad.md", "---\nslug: \"open\n---\n")]);
        let mut store = DocumentStore::new(&fs);

        assert!(matches!(
            store.probe(Utf8Path::new("bad.md")),
            Err(Error::Frontmatter { .. })
        ));
    }
}
