//! Code for parsing the dash-delimited metadata block at the head of a document.
//!
//! ```text
//! ---
//! title: "Release notes"
//! slug: release-notes
//! ---
//! # Body starts here
//! ```

use std::{collections::BTreeMap, iter::Peekable, str::Chars};
use thiserror::Error;

/// A document split into its body text and its optional metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub body: String,
    /// `None` when the document does not open with a delimiter line.
    pub meta: Option<Meta>,
}

/// Key/value pairs declared in a frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed frontmatter entry on line {line}: {entry:?}")]
pub struct FrontmatterError {
    pub line: usize,
    pub entry: String,
    #[source]
    pub reason: EntryError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("quoted literal is never closed")]
    UnterminatedQuote,
    #[error("`\"` found inside an unquoted literal")]
    StrayQuote,
    #[error("expected `:` after key but found {found:?}")]
    MissingColon { found: char },
}

impl Frontmatter {
    /// Splits a document into its frontmatter block and its body.
    ///
    /// A block is opened only by a first line made entirely of `-` characters and closed by the
    /// next such line. Every line outside the block is kept in the body with its original
    /// newlines. A document without an opening line is returned as body text unchanged.
    ///
    /// # Errors
    /// This function returns an error if any non-blank line inside the block is not a valid
    /// `key: value` entry.
    pub fn from_text(input: &str) -> Result<Self, FrontmatterError> {
        let mut lines = input.split('\n').enumerate();

        if !lines.next().is_some_and(|(_, first)| is_delimiter(first)) {
            return Ok(Self {
                body: input.to_owned(),
                meta: None,
            });
        }

        let mut meta = Meta::default();
        let mut body = Vec::new();
        let mut in_block = true;

        for (idx, line) in lines {
            if !in_block {
                body.push(line);
                continue;
            }

            if is_delimiter(line) {
                in_block = false;
                continue;
            }

            let entry = line.strip_suffix('\r').unwrap_or(line);
            if entry.trim().is_empty() {
                continue;
            }

            let (key, value) = parse_entry(entry).map_err(|reason| FrontmatterError {
                line: idx + 1,
                entry: entry.to_owned(),
                reason,
            })?;

            meta.entries.insert(key, value);
        }

        Ok(Self {
            body: body.join("\n"),
            meta: Some(meta),
        })
    }
}

impl Meta {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Page title override. Empty values count as unset.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("title").filter(|title| !title.is_empty())
    }

    /// Output basename override. Empty values count as unset.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.get("slug").filter(|slug| !slug.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

fn is_delimiter(line: &str) -> bool {
    let line = line.strip_suffix('\r').unwrap_or(line);
    !line.is_empty() && line.chars().all(|c| c == '-')
}

/// Parses a single `key: value` line from a frontmatter block.
///
/// Keys and values are either bare literals, which end at a space or a colon, or `"`-quoted
/// literals, which keep their contents verbatim. Text after the value is ignored.
///
/// # Errors
/// This function returns an error if:
/// - a quoted literal is never closed
/// - a bare literal contains `"`
/// - anything other than spaces separates the key from the `:`
pub fn parse_entry(line: &str) -> Result<(String, String), EntryError> {
    let mut scanner = EntryScanner {
        chars: line.chars().peekable(),
    };

    let key = scanner.literal()?;
    scanner.colon()?;
    let value = scanner.literal()?;

    Ok((key, value))
}

#[derive(Clone, Copy)]
enum LiteralState {
    Skip,
    Bare,
    Quoted,
}

struct EntryScanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl EntryScanner<'_> {
    fn literal(&mut self) -> Result<String, EntryError> {
        let mut state = LiteralState::Skip;
        let mut literal = String::new();

        while let Some(&c) = self.chars.peek() {
            match (state, c) {
                (LiteralState::Skip, ' ') => {}
                (LiteralState::Skip, '"') => state = LiteralState::Quoted,
                (LiteralState::Skip, _) => {
                    state = LiteralState::Bare;
                    literal.push(c);
                }
                (LiteralState::Bare, ' ') => {
                    self.chars.next();
                    return Ok(literal);
                }
                // the colon belongs to the caller
                (LiteralState::Bare, ':') => return Ok(literal),
                (LiteralState::Bare, '"') => return Err(EntryError::StrayQuote),
                (LiteralState::Quoted, '"') => {
                    self.chars.next();
                    return Ok(literal);
                }
                (LiteralState::Bare | LiteralState::Quoted, _) => literal.push(c),
            }
            self.chars.next();
        }

        match state {
            LiteralState::Quoted => Err(EntryError::UnterminatedQuote),
            LiteralState::Skip | LiteralState::Bare => Ok(literal),
        }
    }

    fn colon(&mut self) -> Result<(), EntryError> {
        for c in self.chars.by_ref() {
            match c {
                ':' => return Ok(()),
                ' ' => {}
                found => return Err(EntryError::MissingColon { found }),
            }
        }
        Ok(())
    }
}
