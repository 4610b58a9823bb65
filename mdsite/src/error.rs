use crate::{frontmatter::FrontmatterError, render::RenderError};
use camino::Utf8PathBuf;
use lol_html::errors::RewritingError;
use std::io;
use thiserror::Error;

/// Failures that abort a site build. Every variant names the document involved.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no document found at {path}")]
    NotFound { path: Utf8PathBuf },

    #[error("failed to read document at {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse frontmatter of {path}")]
    Frontmatter {
        path: Utf8PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("failed to render {path}")]
    Render {
        path: Utf8PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("failed to process links in {path}")]
    Links {
        path: Utf8PathBuf,
        #[source]
        source: RewritingError,
    },

    #[error("failed to write page for {input} to {output}")]
    Write {
        input: Utf8PathBuf,
        output: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}
