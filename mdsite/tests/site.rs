use camino::{Utf8Path, Utf8PathBuf};
use mdsite::{
    Config, Crawler, DiskFileSystem, Error, MarkdownRenderer, PageBuilder, Summary,
    DEFAULT_TEMPLATE,
};
use pretty_assertions::assert_eq;
use std::fs::{create_dir, create_dir_all, read_to_string, write};
use tempfile::TempDir;

struct Site {
    // Removed on drop
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Site {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_owned()).expect("temp path should be UTF-8");

        for (path, text) in files {
            let path = root.join(path);
            if let Some(parent) = path.parent() {
                create_dir_all(parent).expect("source directory should be created");
            }
            write(&path, text).expect("source file should be written");
        }

        Self { _dir: dir, root }
    }

    fn build(&self, entry: &str, config: &Config) -> Result<Summary, Error> {
        let pages =
            PageBuilder::new(DEFAULT_TEMPLATE, None, false).expect("template should be accepted");

        Crawler::new(config, &MarkdownRenderer::new(), &pages, &DiskFileSystem)
            .run(&self.root.join(entry))
    }

    fn read(&self, path: &str) -> String {
        read_to_string(self.root.join(path)).expect("page should have been written")
    }

    fn relative<'a>(&self, path: &'a Utf8Path) -> &'a str {
        path.strip_prefix(&self.root)
            .expect("page should be inside the site")
            .as_str()
    }
}

const EXAMPLE: &[(&str, &str)] = &[
    (
        "docs/1.md",
        "# hi\n\n- [url2](./2.md)\n- [url3](./3.md)\n- [url4](./4/4.md)\n- [def](./def.md)\n- [gone](./missing.md)\n",
    ),
    ("docs/2.md", "## two\n\n[url3](./3.md)\n"),
    ("docs/3.md", "three\n"),
    ("docs/4/4.md", "[home](../1.md)\n"),
    (
        "docs/def.md",
        "---\ntitle: \"Defined: elsewhere\"\nslug: custom-name\n---\n# def\n",
    ),
];

#[test]
fn example_site() {
    let site = Site::new(EXAMPLE);
    let config = Config {
        link: true,
        output: Some(site.root.join("dist/index.html")),
        ..Config::default()
    };

    let summary = site.build("docs/1.md", &config).expect("build should succeed");

    let outputs: Vec<&str> = summary
        .pages
        .iter()
        .map(|page| site.relative(&page.output))
        .collect();
    assert_eq!(
        outputs,
        [
            "dist/index.html",
            "dist/2.html",
            "dist/3.html",
            "dist/4/4.html",
            "dist/custom-name.html"
        ]
    );

    let index = site.read("dist/index.html");
    for href in [
        "./2.html",
        "./3.html",
        "./4/4.html",
        "./custom-name.html",
        "./missing.md",
    ] {
        assert!(index.contains(&format!("href=\"{href}\"")), "{href} missing");
    }
    assert!(index.contains("<title>1.md</title>"));

    assert!(site.read("dist/2.html").contains("href=\"./3.html\""));
    assert!(site.read("dist/4/4.html").contains("href=\"../index.html\""));

    let def = site.read("dist/custom-name.html");
    assert!(def.contains("<title>Defined: elsewhere</title>"));
    assert!(!def.contains("custom-name"));
    assert!(!def.contains("---"));
}

#[test]
fn pretty_urls() {
    let site = Site::new(EXAMPLE);
    let config = Config {
        link: true,
        omit_html_suffix: true,
        output: Some(site.root.join("dist/index.html")),
        ..Config::default()
    };

    site.build("docs/1.md", &config).expect("build should succeed");

    let index = site.read("dist/index.html");
    assert!(index.contains("href=\"./2/\""));
    assert!(index.contains("href=\"./custom-name/\""));
    assert!(site.read("dist/4/4/index.html").contains("href=\"../../\""));
    assert!(site.read("dist/custom-name/index.html").contains("<h1>def</h1>"));
}

#[test]
fn malformed_frontmatter() {
    let site = Site::new(&[
        ("1.md", "[two](./2.md)\n"),
        ("2.md", "---\nslug: \"never closed\n---\nbody\n"),
    ]);
    let config = Config {
        link: true,
        ..Config::default()
    };

    assert!(matches!(
        site.build("1.md", &config),
        Err(Error::Frontmatter { path, .. }) if path.ends_with("2.md")
    ));
}

#[test]
fn non_file_link_targets_left_alone() {
    let site = Site::new(&[("1.md", "[dir](./d.md) [through](./1.md/x.md)\n")]);
    create_dir(site.root.join("d.md")).expect("directory should be created");
    let config = Config {
        link: true,
        ..Config::default()
    };

    let summary = site.build("1.md", &config).expect("build should succeed");

    assert_eq!(summary.pages.len(), 1);
    let page = site.read("1.html");
    assert!(page.contains("href=\"./d.md\""));
    assert!(page.contains("href=\"./1.md/x.md\""));
}

#[test]
fn non_utf8_documents_render() {
    let site = Site::new(&[("1.md", "[two](./2.md)\n")]);
    write(site.root.join("2.md"), b"caf\xe9\n").expect("source file should be written");
    let config = Config {
        link: true,
        ..Config::default()
    };

    site.build("1.md", &config).expect("build should succeed");

    assert!(site.read("1.html").contains("href=\"./2.html\""));
    assert!(site.read("2.html").contains("caf\u{fffd}"));
}
