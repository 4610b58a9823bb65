//! Code for reading build configuration from an optional TOML file, with command-line overrides
//! layered on top.

use crate::render::RendererKind;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{fs::read_to_string, io::ErrorKind};
use thiserror::Error;
use toml_edit::de::from_str as toml_from_str;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    // Follow links to other Markdown documents and rewrite them to the generated pages
    pub link: bool,
    // Title of the entry page; other pages use their frontmatter title or file name
    pub title: Option<String>,
    // Where the entry page is written; other pages are placed relative to it
    pub output: Option<Utf8PathBuf>,
    // Write `name/index.html` and link to `name/` instead of `name.html`
    pub omit_html_suffix: bool,
    // Include FastClick on every page
    pub fast_click: bool,
    // Markdown rendering backend
    pub renderer: RendererKind,
    // Custom page template; the built-in template is used when unset
    pub template: Option<Utf8PathBuf>,
    // Gitalk comment widget; omitted from pages when unset
    pub gitalk: Option<Gitalk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Gitalk {
    pub client_id: String,
    pub client_secret: String,
    pub repo: String,
    pub owner: String,
    pub admin: Vec<String>,
    pub id: Option<String>,
    pub labels: Vec<String>,
}

/// Settings given on the command line. Unset fields leave the file configuration untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub link: bool,
    pub title: Option<String>,
    pub output: Option<Utf8PathBuf>,
    pub omit_html_suffix: bool,
    pub renderer: Option<RendererKind>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: toml_edit::de::Error,
    },
}

impl Config {
    /// Reads a config file. A missing file yields the default configuration.
    ///
    /// # Errors
    /// This function returns an error if the file exists but cannot be read or is not a valid
    /// configuration.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = match read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };

        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// # Errors
    /// This function returns an error if `text` is not a valid configuration.
    pub fn from_toml(text: &str) -> Result<Self, toml_edit::de::Error> {
        toml_from_str(text)
    }

    /// Applies command-line settings. Flags can only switch features on; non-empty values
    /// replace the file's values.
    #[must_use]
    pub fn merge(mut self, overrides: Overrides) -> Self {
        self.link |= overrides.link;
        self.omit_html_suffix |= overrides.omit_html_suffix;

        if let Some(title) = overrides.title.filter(|title| !title.is_empty()) {
            self.title = Some(title);
        }
        if let Some(output) = overrides.output.filter(|output| !output.as_str().is_empty()) {
            self.output = Some(output);
        }
        if let Some(renderer) = overrides.renderer {
            self.renderer = renderer;
        }

        self
    }

    /// The entry page's explicit output location, if any.
    #[must_use]
    pub fn explicit_output(&self) -> Option<&Utf8Path> {
        self.output
            .as_deref()
            .filter(|output| !output.as_str().is_empty())
    }

    /// The entry page's explicit title, if any.
    #[must_use]
    pub fn explicit_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.is_empty())
    }
}
