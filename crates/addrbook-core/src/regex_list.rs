//! Ordered lists of compiled patterns.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Pattern that clears a whole list when removed.
pub const REMOVE_ALL: &str = "*";

/// A compiled pattern together with the text it was built from.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regular expression.
    pub fn new(source: &str, case_insensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns the text the pattern was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern matches anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered list of patterns without duplicates.
#[derive(Debug, Clone, Default)]
pub struct RegexList {
    patterns: Vec<Pattern>,
}

impl RegexList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Compiles and appends a pattern. Adding a pattern that is already
    /// present is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile; the list is left
    /// unchanged.
    pub fn add(&mut self, source: &str, case_insensitive: bool) -> Result<()> {
        if self.contains(source) {
            return Ok(());
        }
        self.patterns.push(Pattern::new(source, case_insensitive)?);
        Ok(())
    }

    /// Removes a pattern by its source text. `"*"` removes everything.
    ///
    /// Returns true if anything was removed.
    pub fn remove(&mut self, source: &str) -> bool {
        let before = self.patterns.len();
        if source == REMOVE_ALL {
            self.patterns.clear();
        } else {
            self.patterns.retain(|p| p.source != source);
        }
        self.patterns.len() != before
    }

    /// Returns true if a pattern with this source text is present.
    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.patterns.iter().any(|p| p.source == source)
    }

    /// Returns true if any pattern matches `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the patterns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}
