//! Ordered lists of addresses.

use crate::address::{Address, uses_unicode};

/// An ordered sequence of [`Address`]es.
///
/// Order is significant: it carries header field order and RFC 5322 group
/// boundaries. Duplicates are allowed unless a method explicitly removes
/// them.
#[derive(Debug, Clone, Default)]
pub struct AddressList {
    addresses: Vec<Address>,
}

impl AddressList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            addresses: Vec::new(),
        }
    }

    /// Returns the number of entries, including group markers and
    /// terminators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Returns true if the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Address> {
        self.addresses.get(index)
    }

    /// Returns the first entry.
    #[must_use]
    pub fn first(&self) -> Option<&Address> {
        self.addresses.first()
    }

    /// Returns a mutable reference to the first entry.
    pub fn first_mut(&mut self) -> Option<&mut Address> {
        self.addresses.first_mut()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Address> {
        self.addresses.iter()
    }

    /// Iterates mutably over the entries.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Address> {
        self.addresses.iter_mut()
    }

    /// Adds an address at the end.
    pub fn append(&mut self, address: Address) {
        self.addresses.push(address);
    }

    /// Adds an address at the front.
    pub fn prepend(&mut self, address: Address) {
        self.addresses.insert(0, address);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.addresses.clear();
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.addresses.truncate(len);
    }

    /// Appends a deep copy of every entry of `src`.
    ///
    /// With `prune`, entries that have neither a personal name nor a
    /// mailbox (group terminators) are skipped.
    pub fn copy_from(&mut self, src: &Self, prune: bool) {
        self.addresses.extend(
            src.iter()
                .filter(|a| !(prune && a.is_empty()))
                .cloned(),
        );
    }

    /// Removes entries whose mailbox case-insensitively repeats an earlier
    /// mailbox. The first occurrence wins and the order of the survivors is
    /// kept. Entries without a mailbox are never removed.
    pub fn dedupe(&mut self) {
        let mut kept: Vec<Address> = Vec::with_capacity(self.addresses.len());
        for address in self.addresses.drain(..) {
            let duplicate = address.mailbox().is_some()
                && kept.iter().any(|seen| seen.mailbox_eq(&address));
            if !duplicate {
                kept.push(address);
            }
        }
        self.addresses = kept;
    }

    /// Compares two lists position by position.
    ///
    /// Lists are equal only if they have the same length and every
    /// position holds the same mailbox (compared exactly, including case)
    /// and the same personal name. The same addresses in a different order
    /// are *not* equal.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.mailbox() == b.mailbox() && a.personal() == b.personal())
    }

    /// Returns true if any entry has the same mailbox as `needle`
    /// (case-insensitively), ignoring personal names.
    #[must_use]
    pub fn search(&self, needle: &Address) -> bool {
        self.iter().any(|a| a.mailbox_eq(needle))
    }

    /// Removes every entry whose mailbox case-insensitively equals
    /// `mailbox`, returning how many were removed.
    pub fn remove(&mut self, mailbox: &str) -> usize {
        let before = self.addresses.len();
        self.addresses.retain(|a| {
            !a.mailbox()
                .is_some_and(|m| m.eq_ignore_ascii_case(mailbox))
        });
        before - self.addresses.len()
    }

    /// Removes from `self` every entry whose mailbox already appears in
    /// `other`.
    pub fn remove_xrefs(&mut self, other: &Self) {
        self.addresses.retain(|a| !other.search(a));
    }

    /// Appends `@host` to every mailbox that has no domain part.
    ///
    /// Group markers and qualified mailboxes are left alone.
    pub fn qualify(&mut self, host: &str) {
        if host.is_empty() {
            return;
        }
        for address in &mut self.addresses {
            if address.is_group() {
                continue;
            }
            if let Some(mailbox) = address.mailbox().filter(|m| !m.contains('@')) {
                let qualified = format!("{mailbox}@{host}");
                address.set_mailbox(Some(qualified));
            }
        }
    }

    /// Counts the entries that are actual recipients (have a mailbox).
    #[must_use]
    pub fn count_recips(&self) -> usize {
        self.iter().filter(|a| a.mailbox().is_some()).count()
    }

    /// Returns true if any mailbox contains non-ASCII characters.
    #[must_use]
    pub fn uses_unicode(&self) -> bool {
        self.iter()
            .filter_map(Address::mailbox)
            .any(|m| uses_unicode(m.as_bytes()))
    }
}

impl From<Vec<Address>> for AddressList {
    fn from(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }
}

impl FromIterator<Address> for AddressList {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self {
            addresses: iter.into_iter().collect(),
        }
    }
}

impl Extend<Address> for AddressList {
    fn extend<I: IntoIterator<Item = Address>>(&mut self, iter: I) {
        self.addresses.extend(iter);
    }
}

impl IntoIterator for AddressList {
    type Item = Address;
    type IntoIter = std::vec::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.into_iter()
    }
}

impl<'a> IntoIterator for &'a AddressList {
    type Item = &'a Address;
    type IntoIter = std::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn list(mailboxes: &[&str]) -> AddressList {
        mailboxes.iter().map(|m| Address::mailbox_only(m)).collect()
    }

    fn mailboxes(list: &AddressList) -> Vec<&str> {
        list.iter().filter_map(Address::mailbox).collect()
    }

    #[test]
    fn test_copy_from() {
        let src = list(&["test@example.com", "john@doe.org", "the-who@stage.co.uk"]);
        let mut dst = AddressList::new();
        dst.copy_from(&src, false);
        assert_eq!(
            mailboxes(&dst),
            ["test@example.com", "john@doe.org", "the-who@stage.co.uk"]
        );
        assert_eq!(src.len(), 3);
    }

    #[test]
    fn test_copy_from_empty() {
        let mut dst = AddressList::new();
        dst.copy_from(&AddressList::new(), false);
        assert!(dst.is_empty());
    }

    #[test]
    fn test_copy_prune_skips_terminators() {
        let mut src = AddressList::new();
        src.append(Address::group_marker("team"));
        src.append(Address::mailbox_only("a@x.com"));
        src.append(Address::group_end());

        let mut pruned = AddressList::new();
        pruned.copy_from(&src, true);
        assert_eq!(pruned.len(), 2);
        assert!(pruned.first().unwrap().is_group_marker());

        let mut full = AddressList::new();
        full.copy_from(&src, false);
        assert_eq!(full.len(), 3);
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let mut al = AddressList::new();
        al.append(Address::new(Some("First"), "foo@bar.com"));
        al.append(Address::mailbox_only("x@y.z"));
        al.append(Address::new(Some("Second"), "FOO@bar.com"));
        al.dedupe();
        assert_eq!(mailboxes(&al), ["foo@bar.com", "x@y.z"]);
        assert_eq!(al.first().unwrap().personal(), Some("First"));
    }

    #[test]
    fn test_dedupe_keeps_group_structure() {
        let mut al = AddressList::new();
        al.append(Address::group_marker("a"));
        al.append(Address::group_end());
        al.append(Address::group_marker("b"));
        al.append(Address::group_end());
        al.dedupe();
        assert_eq!(al.len(), 4);
    }

    #[test]
    fn test_equal_is_order_sensitive() {
        let a = list(&["test@example.com", "foo@bar.baz"]);
        let b = list(&["foo@bar.baz", "test@example.com"]);
        assert!(!a.equal(&b));
        assert!(a.equal(&a.clone()));
    }

    #[test]
    fn test_equal_compares_personal() {
        let mut a = AddressList::new();
        a.append(Address::new(Some("Name 1"), "test@example.com"));
        let mut b = AddressList::new();
        b.append(Address::new(Some("Name 2"), "test@example.com"));
        assert!(!a.equal(&b));
    }

    #[test]
    fn test_equal_is_case_sensitive() {
        assert!(!list(&["a@x.com"]).equal(&list(&["A@x.com"])));
    }

    #[test]
    fn test_search() {
        let al = list(&["john@doe.org"]);
        assert!(al.search(&Address::new(Some("Other"), "JOHN@doe.org")));
        assert!(!al.search(&Address::mailbox_only("jane@doe.org")));
        assert!(!al.search(&Address::group_end()));
        assert!(!AddressList::new().search(&Address::mailbox_only("a@b")));
    }

    #[test]
    fn test_remove() {
        let mut al = AddressList::new();
        al.append(Address::new(Some("Foo"), "foobar@example.com"));
        assert_eq!(al.remove("foobar@example.co.uk"), 0);
        assert!(!al.is_empty());
        assert_eq!(al.remove("foobar@example.com"), 1);
        assert!(al.is_empty());
    }

    #[test]
    fn test_remove_case_variants() {
        let mut al = AddressList::new();
        al.append(Address::new(Some("Upper"), "UPPER@EXAMPLE.com"));
        al.append(Address::new(Some("lower"), "upper@example.com"));
        assert_eq!(al.remove("uPPeR@ExAmple.com"), 2);
        assert!(al.is_empty());
    }

    #[test]
    fn test_remove_xrefs() {
        let mut a = AddressList::new();
        a.append(Address::new(Some("Name 1"), "foo@example.com"));
        a.append(Address::mailbox_only("john@doe.org"));
        a.append(Address::mailbox_only("foo@bar.baz"));

        let mut b = AddressList::new();
        b.append(Address::new(Some("Name 2"), "foo@example.com"));
        b.append(Address::mailbox_only("foo@bar.baz"));
        b.append(Address::mailbox_only("mr.pink@reservoir.movie"));

        b.remove_xrefs(&a);
        assert_eq!(mailboxes(&a), ["foo@example.com", "john@doe.org", "foo@bar.baz"]);
        assert_eq!(mailboxes(&b), ["mr.pink@reservoir.movie"]);
    }

    #[test]
    fn test_qualify() {
        let mut al = list(&["john@doe.org", "user1", "user2", "test@example.com"]);
        al.qualify("local.domain");
        assert_eq!(
            mailboxes(&al),
            [
                "john@doe.org",
                "user1@local.domain",
                "user2@local.domain",
                "test@example.com"
            ]
        );
    }

    #[test]
    fn test_qualify_empty_host() {
        let mut al = list(&["user1"]);
        al.qualify("");
        assert_eq!(mailboxes(&al), ["user1"]);
    }

    #[test]
    fn test_count_recips() {
        let mut al = AddressList::new();
        al.append(Address::group_marker("team"));
        al.append(Address::mailbox_only("a@x.com"));
        al.append(Address::mailbox_only("b@x.com"));
        al.append(Address::group_end());
        assert_eq!(al.count_recips(), 2);
    }

    #[test]
    fn test_prepend_append() {
        let mut al = list(&["b@x"]);
        al.prepend(Address::mailbox_only("a@x"));
        al.append(Address::mailbox_only("c@x"));
        assert_eq!(mailboxes(&al), ["a@x", "b@x", "c@x"]);
        al.clear();
        assert!(al.is_empty());
    }
}
