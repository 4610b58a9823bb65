//! Filesystem access used by the crawler.

use camino::Utf8Path;
use std::{
    fs::{create_dir_all, read, write},
    io,
};

/// Reads source documents and writes finished pages.
pub trait FileSystem {
    /// Reads the document at `path` as text. Bytes that are not valid UTF-8 may be replaced.
    ///
    /// # Errors
    /// Returns an error of kind [`io::ErrorKind::NotFound`] if no file exists at `path`.
    fn read(&self, path: &Utf8Path) -> io::Result<String>;

    /// Writes `contents` to `path`, creating any missing parent directories.
    ///
    /// # Errors
    /// Returns an error if a directory or the file cannot be created.
    fn write(&self, path: &Utf8Path, contents: &str) -> io::Result<()>;
}

/// The real filesystem, with paths resolved against the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    fn read(&self, path: &Utf8Path) -> io::Result<String> {
        // invalid UTF-8 is replaced rather than rejected
        read(path).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write(&self, path: &Utf8Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            create_dir_all(parent)?;
        }
        write(path, contents)
    }
}
