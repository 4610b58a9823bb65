//! Builds a static site from a Markdown document and everything it links to.
//!
//! Starting at an entry document, [`Crawler`] renders each reachable document, rewrites links to
//! other Markdown documents so they point at the generated pages, and writes one page per
//! document.

mod address;
mod builder;
mod config;
mod crawler;
mod error;
mod frontmatter;
mod fs;
mod links;
mod render;
mod store;

pub use address::{Origin, PathResolver};
pub use builder::{Page, PageBuilder, TemplateError, DEFAULT_TEMPLATE};
pub use config::{Config, ConfigError, Gitalk, Overrides};
pub use crawler::{Crawler, Summary, WrittenPage};
pub use error::Error;
pub use frontmatter::{parse_entry, EntryError, Frontmatter, FrontmatterError, Meta};
pub use fs::{DiskFileSystem, FileSystem};
pub use links::{is_markdown_link, markdown_links, rewrite_links};
pub use render::{
    GithubRenderer, MarkdownRenderer, Render, RenderError, RendererKind, RENDER_TIMEOUT,
};
pub use store::{Document, DocumentStore, Stage};
