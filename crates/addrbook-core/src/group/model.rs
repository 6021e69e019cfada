//! Address group model.

use addrbook_address::{Address, AddressList};

use crate::error::Result;
use crate::regex_list::RegexList;

/// A named set of addresses and patterns used to classify mailboxes.
///
/// This is unrelated to RFC 5322 group syntax inside a header.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    addresses: AddressList,
    patterns: RegexList,
}

impl Group {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addresses: AddressList::new(),
            patterns: RegexList::new(),
        }
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exact addresses in the group.
    #[must_use]
    pub const fn addresses(&self) -> &AddressList {
        &self.addresses
    }

    /// Returns the patterns in the group.
    #[must_use]
    pub const fn patterns(&self) -> &RegexList {
        &self.patterns
    }

    /// Returns true if the group has neither addresses nor patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.patterns.is_empty()
    }

    /// Returns true if `mailbox` matches one of the patterns, or equals
    /// (case-insensitively) one of the addresses.
    #[must_use]
    pub fn matches(&self, mailbox: &str) -> bool {
        if self.patterns.is_match(mailbox) {
            return true;
        }
        self.addresses
            .iter()
            .filter_map(Address::mailbox)
            .any(|m| m.eq_ignore_ascii_case(mailbox))
    }

    /// Adds copies of the addresses in `list` that are not already members.
    pub fn add_addresses(&mut self, list: &AddressList) {
        let mut fresh = AddressList::new();
        fresh.copy_from(list, false);
        fresh.remove_xrefs(&self.addresses);
        self.addresses.extend(fresh);
    }

    /// Removes every member whose mailbox appears in `list`.
    pub fn remove_addresses(&mut self, list: &AddressList) {
        for mailbox in list.iter().filter_map(Address::mailbox) {
            self.addresses.remove(mailbox);
        }
    }

    /// Adds a case-insensitive pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        self.patterns.add(pattern, true)
    }

    /// Removes a pattern, returning true if it was present.
    pub fn remove_pattern(&mut self, pattern: &str) -> bool {
        self.patterns.remove(pattern)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn list(text: &str) -> AddressList {
        text.parse().unwrap()
    }

    #[test]
    fn test_matches_address_case_insensitive() {
        let mut group = Group::new("friends");
        group.add_addresses(&list("Alice@Example.com"));
        assert!(group.matches("alice@example.com"));
        assert!(!group.matches("bob@example.com"));
    }

    #[test]
    fn test_matches_pattern() {
        let mut group = Group::new("work");
        group.add_pattern("@corp\\.example$").unwrap();
        assert!(group.matches("anyone@CORP.example"));
        assert!(!group.matches("anyone@home.example"));
    }

    #[test]
    fn test_add_addresses_skips_members() {
        let mut group = Group::new("g");
        group.add_addresses(&list("a@x.com, b@x.com"));
        group.add_addresses(&list("B@X.COM, c@x.com"));
        let mailboxes: Vec<_> = group.addresses().iter().filter_map(Address::mailbox).collect();
        assert_eq!(mailboxes, ["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn test_remove_addresses() {
        let mut group = Group::new("g");
        group.add_addresses(&list("a@x.com, b@x.com"));
        group.remove_addresses(&list("A@x.com"));
        assert_eq!(group.addresses().len(), 1);
        group.remove_addresses(&list("b@x.com"));
        assert!(group.is_empty());
    }
}
