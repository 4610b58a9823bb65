//! Code for building complete HTML pages from rendered document bodies.

use crate::config::Gitalk;
use aho_corasick::AhoCorasick;
use html_escape::encode_text;
use thiserror::Error;

/// The page template used when no custom template is configured.
pub const DEFAULT_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/template.html"));

const TITLE: &str = "{{ title }}";
const HEAD: &str = "{{ head }}";
const BODY: &str = "{{ body }}";
const FOOTER: &str = "{{ footer }}";

const FAST_CLICK_HEAD: &str = concat!(
    r#"<script src="https://cdn.jsdelivr.net/npm/fastclick@1.0.6/lib/fastclick.min.js"></script>"#,
    "\n<script>document.addEventListener('DOMContentLoaded', function () { FastClick.attach(document.body); }, false);</script>\n",
);
const GITALK_HEAD: &str =
    "<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/gitalk@1/dist/gitalk.css\">\n";
const GITALK_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/gitalk@1/dist/gitalk.min.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("page template has no `{{{{ body }}}}` placeholder")]
    MissingBody,
}

/// Values substituted into the template for one page.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub title: &'a str,
    pub body: &'a str,
    /// Keys the page's comment thread when present
    pub slug: Option<&'a str>,
}

pub struct PageBuilder {
    template: String,
    placeholders: AhoCorasick,
    head: String,
    gitalk: Option<Gitalk>,
}

impl PageBuilder {
    /// Initializes the page builder from template text containing `{{ title }}`, `{{ head }}`,
    /// `{{ body }}` and `{{ footer }}` placeholders. Only `{{ body }}` is required.
    ///
    /// # Errors
    /// This function returns an error if the template has no `{{ body }}` placeholder.
    ///
    /// # Panics
    /// This function panics if the fixed placeholder set cannot be compiled into a matcher.
    pub fn new(
        template: impl Into<String>,
        gitalk: Option<Gitalk>,
        fast_click: bool,
    ) -> Result<Self, TemplateError> {
        let template = template.into();

        if !template.contains(BODY) {
            return Err(TemplateError::MissingBody);
        }

        let placeholders = AhoCorasick::new([TITLE, HEAD, BODY, FOOTER])
            .expect("placeholder patterns should compile");

        let mut head = String::new();
        if fast_click {
            head.push_str(FAST_CLICK_HEAD);
        }
        if gitalk.is_some() {
            head.push_str(GITALK_HEAD);
        }

        Ok(Self {
            template,
            placeholders,
            head,
            gitalk,
        })
    }

    /// Fills the template for one page. The title is HTML-escaped; the body is inserted as-is.
    /// Substituted text is never scanned for placeholders again.
    #[must_use]
    pub fn build_page(&self, page: &Page<'_>) -> String {
        let title = encode_text(page.title);
        let footer = self
            .gitalk
            .as_ref()
            .map(|gitalk| gitalk_footer(gitalk, page.slug))
            .unwrap_or_default();

        self.placeholders.replace_all(
            &self.template,
            &[&*title, self.head.as_str(), page.body, footer.as_str()],
        )
    }
}

fn gitalk_footer(gitalk: &Gitalk, slug: Option<&str>) -> String {
    // Threads are keyed by the page slug, then the configured id, then the URL path
    let id = slug
        .or(gitalk.id.as_deref())
        .map_or_else(|| "location.pathname".to_owned(), js_string);

    format!(
        concat!(
            "<div id=\"gitalk-container\"></div>\n",
            "<script src=\"{script}\"></script>\n",
            "<script>\nnew Gitalk({{\n",
            "  clientID: {client_id},\n",
            "  clientSecret: {client_secret},\n",
            "  repo: {repo},\n",
            "  owner: {owner},\n",
            "  admin: {admin},\n",
            "  labels: {labels},\n",
            "  id: {id},\n",
            "  distractionFreeMode: false\n",
            "}}).render('gitalk-container');\n</script>\n",
        ),
        script = GITALK_SCRIPT,
        client_id = js_string(&gitalk.client_id),
        client_secret = js_string(&gitalk.client_secret),
        repo = js_string(&gitalk.repo),
        owner = js_string(&gitalk.owner),
        admin = js_array(&gitalk.admin),
        labels = js_array(&gitalk.labels),
        id = id,
    )
}

/// Single-quoted JavaScript string literal, safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('\'');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '<' => literal.push_str("\\x3C"),
            _ => literal.push(c),
        }
    }
    literal.push('\'');
    literal
}

fn js_array(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|value| js_string(value)).collect();
    format!("[{}]", items.join(","))
}
