use crate::error::{Result, StypeError};
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

static TEXTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/texts");

pub const DEFAULT_PASSAGE: &str = "default";

/// The text being typed. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceText {
    text: String,
    chars: Vec<char>,
}

impl ReferenceText {
    /// Surrounding whitespace is trimmed; inner whitespace is kept verbatim.
    pub fn new(text: &str) -> Self {
        let text = text.trim().to_string();
        let chars = text.chars().collect();
        Self { text, chars }
    }

    /// Like [`ReferenceText::new`] but rejects text that trims to nothing.
    pub fn non_empty(text: &str) -> Result<Self> {
        let reference = Self::new(text);
        if reference.is_empty() {
            return Err(StypeError::EmptyText);
        }
        Ok(reference)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::non_empty(&contents)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn get(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Index of the last character, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }
}

impl fmt::Display for ReferenceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A passage bundled into the binary.
#[derive(Deserialize, Clone, Debug)]
pub struct Passage {
    pub name: String,
    pub source: String,
    pub text: String,
}

impl Passage {
    pub fn bundled(name: &str) -> Result<Self> {
        let file = TEXTS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| StypeError::UnknownText(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| StypeError::UnknownText(name.to_string()))?;

        Ok(serde_json::from_str(contents)?)
    }

    /// Sorted names of every bundled passage.
    pub fn names() -> Vec<String> {
        let mut names: Vec<String> = TEXTS_DIR
            .files()
            .filter_map(|f| {
                let path = f.path();
                match path.extension().and_then(|e| e.to_str()) {
                    Some("json") => path.file_stem()?.to_str().map(str::to_string),
                    _ => None,
                }
            })
            .collect();
        names.sort();
        names
    }

    pub fn random() -> Result<Self> {
        let names = Self::names();
        let name = names
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| StypeError::UnknownText("<none bundled>".to_string()))?;
        Self::bundled(name)
    }

    pub fn reference(&self) -> Result<ReferenceText> {
        ReferenceText::non_empty(&self.text)
    }
}
