//! Mailbox to alias index.

use std::collections::HashMap;

use addrbook_address::Address;

use super::model::Alias;

/// Maps lowercased mailboxes to the names of the aliases containing them,
/// in definition order.
#[derive(Debug, Default)]
pub(crate) struct ReverseIndex {
    by_mailbox: HashMap<String, Vec<String>>,
}

impl ReverseIndex {
    pub(crate) fn add(&mut self, alias: &Alias) {
        for mailbox in alias.addresses().iter().filter_map(Address::mailbox) {
            let names = self.by_mailbox.entry(mailbox.to_ascii_lowercase()).or_default();
            if !names.iter().any(|n| alias.is_named(n)) {
                names.push(alias.name().to_string());
            }
        }
    }

    pub(crate) fn remove(&mut self, alias: &Alias) {
        for mailbox in alias.addresses().iter().filter_map(Address::mailbox) {
            let key = mailbox.to_ascii_lowercase();
            if let Some(names) = self.by_mailbox.get_mut(&key) {
                names.retain(|n| !alias.is_named(n));
                if names.is_empty() {
                    self.by_mailbox.remove(&key);
                }
            }
        }
    }

    pub(crate) fn lookup(&self, mailbox: &str) -> Option<&str> {
        self.by_mailbox
            .get(&mailbox.to_ascii_lowercase())
            .and_then(|names| names.first())
            .map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.by_mailbox.clear();
    }
}
