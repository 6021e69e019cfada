//! Mailing list recognition.

use addrbook_address::Address;

use crate::error::Result;
use crate::regex_list::{REMOVE_ALL, RegexList};

/// Known and subscribed mailing lists, each with exceptions.
#[derive(Debug, Clone, Default)]
pub struct MailingLists {
    lists: RegexList,
    unlists: RegexList,
    subscribed: RegexList,
    unsubscribed: RegexList,
}

impl MailingLists {
    /// Creates empty lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks addresses matching `pattern` as mailing lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn add_list(&mut self, pattern: &str) -> Result<()> {
        self.unlists.remove(pattern);
        self.lists.add(pattern, true)
    }

    /// Forgets a mailing list (and any subscription to it). Unless
    /// `pattern` is `"*"`, it is also recorded as an exception.
    ///
    /// # Errors
    ///
    /// Returns an error if the exception pattern does not compile.
    pub fn remove_list(&mut self, pattern: &str) -> Result<()> {
        self.subscribed.remove(pattern);
        self.lists.remove(pattern);
        if pattern != REMOVE_ALL {
            self.unlists.add(pattern, true)?;
        }
        Ok(())
    }

    /// Marks addresses matching `pattern` as subscribed mailing lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn subscribe(&mut self, pattern: &str) -> Result<()> {
        self.unlists.remove(pattern);
        self.unsubscribed.remove(pattern);
        self.lists.add(pattern, true)?;
        self.subscribed.add(pattern, true)
    }

    /// Drops a subscription. Unless `pattern` is `"*"`, it is also recorded
    /// as an exception.
    ///
    /// # Errors
    ///
    /// Returns an error if the exception pattern does not compile.
    pub fn unsubscribe(&mut self, pattern: &str) -> Result<()> {
        self.subscribed.remove(pattern);
        if pattern != REMOVE_ALL {
            self.unsubscribed.add(pattern, true)?;
        }
        Ok(())
    }

    /// Returns true if `address` is a known mailing list.
    #[must_use]
    pub fn is_mail_list(&self, address: &Address) -> bool {
        address
            .mailbox()
            .is_some_and(|m| !self.unlists.is_match(m) && self.lists.is_match(m))
    }

    /// Returns true if `address` is a subscribed mailing list.
    #[must_use]
    pub fn is_subscribed_list(&self, address: &Address) -> bool {
        address
            .mailbox()
            .is_some_and(|m| !self.unsubscribed.is_match(m) && self.subscribed.is_match(m))
    }
}
