//! Markdown-to-HTML rendering backends.

use clap::ValueEnum;
use pulldown_cmark::{html::push_html, Options, Parser};
use reqwest::{
    blocking::Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use thiserror::Error;

/// Upper bound on a single call to a remote render service.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(3);

const GITHUB_MARKDOWN_API: &str = "https://api.github.com/markdown";

/// Converts a Markdown document body into an HTML fragment.
pub trait Render {
    /// # Errors
    /// Returns an error if the backend could not be reached or refused the document.
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to reach render service")]
    Transport(#[from] reqwest::Error),
    #[error("render service rejected the document (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Which [`Render`] backend a build uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// GitHub's Markdown API; output matches github.com
    #[default]
    Github,
    /// Offline rendering with `pulldown-cmark`
    Local,
}

impl RendererKind {
    /// # Errors
    /// This function returns an error if the HTTP client for a remote backend cannot be built.
    pub fn build(self) -> Result<Box<dyn Render>, RenderError> {
        Ok(match self {
            Self::Github => Box::new(GithubRenderer::from_env()?),
            Self::Local => Box::new(MarkdownRenderer::new()),
        })
    }
}

/// Renders through `POST /markdown` of the GitHub REST API.
pub struct GithubRenderer {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct RejectionBody {
    message: String,
}

impl GithubRenderer {
    /// Initializes a renderer authenticated with `token`, if any.
    /// Anonymous requests are subject to GitHub's stricter rate limit.
    ///
    /// # Errors
    /// This function returns an error if the TLS backend of the HTTP client fails to initialize.
    pub fn new(token: Option<String>) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(RENDER_TIMEOUT)
            .user_agent(concat!("mdsite/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            client,
            endpoint: GITHUB_MARKDOWN_API.into(),
            token,
        })
    }

    /// Initializes a renderer using the `GITHUB_TOKEN` environment variable when it is set.
    ///
    /// # Errors
    /// See [`GithubRenderer::new`].
    pub fn from_env() -> Result<Self, RenderError> {
        Self::new(env::var("GITHUB_TOKEN").ok().filter(|token| !token.is_empty()))
    }

    /// Points the renderer at a GitHub Enterprise or mock endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Render for GithubRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .json(&RenderRequest { text: markdown });

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            return Ok(body);
        }

        // GitHub explains rejections in a JSON `message` field; fall back to the raw body
        let message = match serde_json::from_str::<RejectionBody>(&body) {
            Ok(rejection) => rejection.message,
            Err(_) => body,
        };

        Err(RenderError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Renders locally with `pulldown-cmark`, enabling the GitHub-flavored extensions it supports.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Render for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        push_html(&mut html, Parser::new_ext(markdown, self.options));
        Ok(html)
    }
}
