//! Lexical path helpers shared by the crates in this workspace.
//!
//! None of these functions touch the filesystem. Input trees and output trees are addressed with
//! the same directory-relative semantics, so links written against one can be replayed on the
//! other.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Lexically normalizes a path: drops `.` components and folds `..` into the preceding
/// component where one exists. Leading `..` components of a relative path are kept.
/// An empty result becomes `.`.
#[must_use]
pub fn clean(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }

    let mut cleaned = Utf8PathBuf::new();
    for part in parts {
        cleaned.push(part.as_str());
    }
    cleaned
}

/// Returns the directory containing `path`, or `.` for a bare file name.
#[must_use]
pub fn parent_dir(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Joins `relative` onto the directory containing `file`, then cleans the result.
///
/// This is how a link written inside `file` is resolved: `join_sibling("docs/4/4.md", "../1.md")`
/// is `docs/1.md`.
#[must_use]
pub fn join_sibling(file: &Utf8Path, relative: &str) -> Utf8PathBuf {
    clean(&parent_dir(file).join(relative))
}

/// Computes the path that leads from directory `from_dir` to `to`.
///
/// Returns `None` when no lexical answer exists, i.e. one path is absolute and the other is not,
/// or `from_dir` climbs above the point where the two paths diverge.
#[must_use]
pub fn relative_path(from_dir: &Utf8Path, to: &Utf8Path) -> Option<Utf8PathBuf> {
    let from_dir = clean(from_dir);
    let to = clean(to);

    if from_dir.is_absolute() != to.is_absolute() {
        return None;
    }

    let from_parts = normal_parts(&from_dir);
    let to_parts = normal_parts(&to);

    let shared = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    if from_parts[shared..].contains(&"..") {
        return None;
    }

    let mut relative = Utf8PathBuf::new();
    for _ in shared..from_parts.len() {
        relative.push("..");
    }
    for part in &to_parts[shared..] {
        relative.push(part);
    }

    if relative.as_str().is_empty() {
        relative.push(".");
    }

    Some(relative)
}

fn normal_parts(path: &Utf8Path) -> Vec<&str> {
    path.components()
        .filter(|component| {
            !matches!(
                component,
                Utf8Component::CurDir | Utf8Component::RootDir | Utf8Component::Prefix(_)
            )
        })
        .map(|component| component.as_str())
        .collect()
}

/// Splits a slash-separated path string into its directory prefix (including the trailing `/`)
/// and its final segment.
#[must_use]
pub fn split_last_segment(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

/// Replaces the extension of the final segment of a slash-separated path string,
/// appending one if the segment has none.
///
/// The rest of the string is kept byte for byte, so `./a/b.md` becomes `./a/b.html`.
#[must_use]
pub fn replace_extension(path: &str, extension: &str) -> String {
    let (dir, name) = split_last_segment(path);
    let stem = name.rfind('.').map_or(name, |idx| &name[..idx]);
    format!("{dir}{stem}.{extension}")
}

/// Replaces the stem of the final segment of a slash-separated path string, keeping the
/// directory prefix and the extension.
#[must_use]
pub fn replace_stem(path: &str, stem: &str) -> String {
    let (dir, name) = split_last_segment(path);
    match name.rfind('.') {
        Some(idx) => format!("{dir}{stem}{}", &name[idx..]),
        None => format!("{dir}{stem}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clean_paths() {
        assert_eq!(clean(Utf8Path::new("dist/./4/4.md")), "dist/4/4.md");
        assert_eq!(clean(Utf8Path::new("docs/4/../1.md")), "docs/1.md");
        assert_eq!(clean(Utf8Path::new("../a/../../b")), "../../b");
        assert_eq!(clean(Utf8Path::new("/../a")), "/a");
        assert_eq!(clean(Utf8Path::new("./")), ".");
        assert_eq!(clean(Utf8Path::new("")), ".");
    }

    #[test]
    fn sibling_links() {
        assert_eq!(join_sibling(Utf8Path::new("1.md"), "./2.md"), "2.md");
        assert_eq!(join_sibling(Utf8Path::new("docs/1.md"), "./4/4.md"), "docs/4/4.md");
        assert_eq!(join_sibling(Utf8Path::new("docs/4/4.md"), "../1.md"), "docs/1.md");
        assert_eq!(join_sibling(Utf8Path::new("dist/index.html"), "./2.md"), "dist/2.md");
    }

    #[test]
    fn parent_of_bare_name() {
        assert_eq!(parent_dir(Utf8Path::new("1.md")), ".");
        assert_eq!(parent_dir(Utf8Path::new("a/1.md")), "a");
    }

    #[test]
    fn relative_paths() {
        let rel = |from: &str, to: &str| {
            relative_path(Utf8Path::new(from), Utf8Path::new(to)).map(Utf8PathBuf::into_string)
        };

        assert_eq!(rel("dist/4", "dist/index.html").as_deref(), Some("../index.html"));
        assert_eq!(rel("dist", "dist/index.html").as_deref(), Some("index.html"));
        assert_eq!(rel(".", "index.html").as_deref(), Some("index.html"));
        assert_eq!(rel("a/b/c", "a/x/y.html").as_deref(), Some("../../x/y.html"));
        assert_eq!(rel("a", "a").as_deref(), Some("."));
        assert_eq!(rel("../a", "b.html"), None);
        assert_eq!(rel("/srv", "b.html"), None);
    }

    #[test]
    fn extensions() {
        assert_eq!(replace_extension("./2.md", "html"), "./2.html");
        assert_eq!(replace_extension("../a.b/readme", "html"), "../a.b/readme.html");
        assert_eq!(replace_extension("notes.v2.md", "html"), "notes.v2.html");
        assert_eq!(replace_stem("./def.html", "custom-name"), "./custom-name.html");
        assert_eq!(replace_stem("a/b/c", "slug"), "a/b/slug");
    }
}
