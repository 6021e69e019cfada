//! Alias model.

use addrbook_address::AddressList;

/// Marker introducing the tag field of an alias comment.
const TAGS_PREFIX: &str = "tags:";

/// A short name standing for a list of addresses.
#[derive(Debug, Clone)]
pub struct Alias {
    name: String,
    addresses: AddressList,
    comment: Option<String>,
    tags: Vec<String>,
}

impl Alias {
    /// Creates an alias without comment or tags.
    #[must_use]
    pub fn new(name: impl Into<String>, addresses: AddressList) -> Self {
        Self {
            name: name.into(),
            addresses,
            comment: None,
            tags: Vec::new(),
        }
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the alias name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Returns the addresses the alias expands to.
    #[must_use]
    pub const fn addresses(&self) -> &AddressList {
        &self.addresses
    }

    /// Returns the addresses for editing before the alias is registered.
    pub const fn addresses_mut(&mut self) -> &mut AddressList {
        &mut self.addresses
    }

    /// Returns the free-text comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Sets or clears the comment.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the tags joined with commas.
    #[must_use]
    pub fn tags_string(&self) -> String {
        self.tags.join(",")
    }

    /// Returns true if `name` names this alias (ASCII case-insensitive).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Splits the text after `#` on an alias line into comment and tags.
    ///
    /// A word starting with `tags:` carries a comma-separated tag list;
    /// everything else is the comment.
    pub fn parse_comments(&mut self, text: &str) {
        let mut words = Vec::new();
        for word in text.split_whitespace() {
            match word.strip_prefix(TAGS_PREFIX) {
                Some(tags) => self.tags.extend(parse_tags(tags)),
                None => words.push(word),
            }
        }

        let comment = words.join(" ");
        self.comment = (!comment.is_empty()).then_some(comment);
    }
}

/// Splits a comma-separated tag list, dropping empty entries.
#[must_use]
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comments_plain() {
        let mut alias = Alias::new("a", AddressList::new());
        alias.parse_comments("my best friend");
        assert_eq!(alias.comment(), Some("my best friend"));
        assert!(alias.tags().is_empty());
    }

    #[test]
    fn test_parse_comments_with_tags() {
        let mut alias = Alias::new("a", AddressList::new());
        alias.parse_comments("colleague tags:work,lunch from Berlin");
        assert_eq!(alias.comment(), Some("colleague from Berlin"));
        assert_eq!(alias.tags(), ["work", "lunch"]);
        assert_eq!(alias.tags_string(), "work,lunch");
    }

    #[test]
    fn test_parse_comments_only_tags() {
        let mut alias = Alias::new("a", AddressList::new());
        alias.parse_comments("tags:x");
        assert_eq!(alias.comment(), None);
        assert_eq!(alias.tags(), ["x"]);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("a, b,,c "), ["a", "b", "c"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_is_named() {
        let alias = Alias::new("Work", AddressList::new());
        assert!(alias.is_named("work"));
        assert!(alias.is_named("WORK"));
        assert!(!alias.is_named("home"));
    }
}
