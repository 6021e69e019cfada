//! Alternate addresses of the user.

use tracing::trace;

use crate::error::Result;
use crate::regex_list::{REMOVE_ALL, RegexList};

/// Patterns for the user's other addresses, with exceptions.
#[derive(Debug, Clone, Default)]
pub struct Alternates {
    alternates: RegexList,
    unalternates: RegexList,
}

impl Alternates {
    /// Creates empty lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern and drops it from the exceptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        self.unalternates.remove(pattern);
        self.alternates.add(pattern, true)
    }

    /// Removes a pattern and records it as an exception. `"*"` clears the
    /// patterns without adding an exception.
    ///
    /// # Errors
    ///
    /// Returns an error if the exception pattern does not compile.
    pub fn remove(&mut self, pattern: &str) -> Result<()> {
        self.alternates.remove(pattern);
        if pattern != REMOVE_ALL {
            self.unalternates.add(pattern, true)?;
        }
        Ok(())
    }

    /// Returns true if `mailbox` matches an alternate and no exception.
    #[must_use]
    pub fn matches(&self, mailbox: &str) -> bool {
        if !self.alternates.is_match(mailbox) {
            return false;
        }
        trace!("{mailbox} matched by alternates");
        if self.unalternates.is_match(mailbox) {
            trace!("but {mailbox} matched by unalternates");
            return false;
        }
        true
    }

    /// Returns the alternate patterns.
    #[must_use]
    pub const fn patterns(&self) -> &RegexList {
        &self.alternates
    }

    /// Returns the exception patterns.
    #[must_use]
    pub const fn exceptions(&self) -> &RegexList {
        &self.unalternates
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let mut alt = Alternates::new();
        alt.add("^me@(home|work)\\.org$").unwrap();
        assert!(alt.matches("ME@work.org"));
        assert!(!alt.matches("you@work.org"));
    }

    #[test]
    fn test_exception() {
        let mut alt = Alternates::new();
        alt.add("@work\\.org$").unwrap();
        alt.remove("^boss@").unwrap();
        assert!(alt.matches("me@work.org"));
        assert!(!alt.matches("boss@work.org"));
    }

    #[test]
    fn test_add_clears_exception() {
        let mut alt = Alternates::new();
        alt.add("me@x").unwrap();
        alt.remove("me@x").unwrap();
        assert!(!alt.matches("me@x"));
        alt.add("me@x").unwrap();
        assert!(alt.matches("me@x"));
        assert!(alt.exceptions().is_empty());
    }

    #[test]
    fn test_remove_all() {
        let mut alt = Alternates::new();
        alt.add("a").unwrap();
        alt.add("b").unwrap();
        alt.remove("*").unwrap();
        assert!(alt.patterns().is_empty());
        assert!(alt.exceptions().is_empty());
    }
}
