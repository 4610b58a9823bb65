use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use mdsite::{
    Config, Crawler, DiskFileSystem, Overrides, PageBuilder, RendererKind, DEFAULT_TEMPLATE,
};
use std::{fs::read_to_string, io::stderr};
use tracing_subscriber::EnvFilter;

/// Converts a Markdown document, and every Markdown document it links to, into HTML pages.
#[derive(Parser)]
#[command(name = "mdsite", version, about)]
struct Cli {
    /// Markdown document the site starts from
    input: Utf8PathBuf,
    /// Title of the entry page
    #[arg(short, long)]
    title: Option<String>,
    /// Where the entry page is written
    #[arg(short, long)]
    output: Option<Utf8PathBuf>,
    /// Follow links to other Markdown documents and point them at the generated pages
    #[arg(short, long)]
    link: bool,
    /// Configuration file; ignored if it does not exist
    #[arg(short = 'C', long, default_value = "mdsite.toml")]
    config: Utf8PathBuf,
    /// Write `name/index.html` and link to `name/`
    #[arg(long)]
    omit_html_suffix: bool,
    /// Markdown rendering backend
    #[arg(long, value_enum)]
    renderer: Option<RendererKind>,
    /// Log every page as it is built
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();

    // Read configuration, then apply command-line settings
    let config = Config::from_path(&cli.config)
        .context("failed to read configuration file")?
        .merge(Overrides {
            link: cli.link,
            title: cli.title,
            output: cli.output,
            omit_html_suffix: cli.omit_html_suffix,
            renderer: cli.renderer,
        });

    // Get page template text
    let template = match &config.template {
        Some(path) => read_to_string(path)
            .with_context(|| format!("failed to read page template file at {path}"))?,
        None => DEFAULT_TEMPLATE.to_owned(),
    };

    let page_builder = PageBuilder::new(template, config.gitalk.clone(), config.fast_click)
        .context("failed to process page template")?;

    let renderer = config
        .renderer
        .build()
        .context("failed to initialize Markdown renderer")?;

    let summary = Crawler::new(&config, &*renderer, &page_builder, &DiskFileSystem)
        .run(&cli.input)
        .with_context(|| format!("failed to build site from {}", cli.input))?;

    if let Some(entry) = summary.pages.first() {
        eprintln!(
            "built {} page(s); entry page written to {}",
            summary.pages.len(),
            entry.output
        );
    }

    Ok(())
}
