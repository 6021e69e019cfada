//! Alias registry.

use std::sync::mpsc::{self, Receiver, Sender};

use addrbook_address::{Address, AddressList};
use tracing::debug;

use super::model::Alias;
use super::reverse::ReverseIndex;
use crate::error::{Error, Result};

/// A change to the alias registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasEvent {
    /// A new alias was defined.
    Added(String),
    /// An existing alias was redefined.
    Changed(String),
    /// An alias was deleted.
    Deleted(String),
}

impl AliasEvent {
    /// Short description used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Added(_) => "alias add",
            Self::Changed(_) => "alias change",
            Self::Deleted(_) => "alias delete",
        }
    }

    /// Name of the alias concerned.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Added(name) | Self::Changed(name) | Self::Deleted(name) => name,
        }
    }
}

/// All defined aliases, in definition order.
///
/// Names are matched ASCII case-insensitively. Every mutation is sent to
/// the channels returned by [`AliasRegistry::subscribe`].
#[derive(Debug, Default)]
pub struct AliasRegistry {
    aliases: Vec<Alias>,
    reverse: ReverseIndex,
    observers: Vec<Sender<AliasEvent>>,
}

impl AliasRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a channel receiving every later change.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<AliasEvent> {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        rx
    }

    /// Adds a new alias.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AliasExists`] if the name is taken; the registry is
    /// unchanged in that case.
    pub fn create(&mut self, alias: Alias) -> Result<()> {
        if self.position(alias.name()).is_some() {
            return Err(Error::AliasExists(alias.name().to_string()));
        }
        self.push(alias);
        Ok(())
    }

    /// Replaces the definition of an existing alias, keeping its position
    /// and original spelling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AliasNotFound`] if no alias has this name.
    pub fn redefine(&mut self, alias: Alias) -> Result<()> {
        let index = self
            .position(alias.name())
            .ok_or_else(|| Error::AliasNotFound(alias.name().to_string()))?;
        self.replace(index, alias);
        Ok(())
    }

    /// Defines an alias, replacing any existing one with the same name.
    ///
    /// Returns true if an existing alias was replaced.
    pub fn define(&mut self, alias: Alias) -> bool {
        match self.position(alias.name()) {
            Some(index) => {
                self.replace(index, alias);
                true
            }
            None => {
                self.push(alias);
                false
            }
        }
    }

    /// Deletes an alias by name.
    pub fn delete(&mut self, name: &str) -> Option<Alias> {
        let index = self.position(name)?;
        let alias = self.aliases.remove(index);
        self.reverse.remove(&alias);
        self.notify(&AliasEvent::Deleted(alias.name().to_string()));
        Some(alias)
    }

    /// Deletes every alias.
    pub fn delete_all(&mut self) {
        let aliases = std::mem::take(&mut self.aliases);
        self.reverse.clear();
        for alias in aliases {
            self.notify(&AliasEvent::Deleted(alias.name().to_string()));
        }
    }

    /// Returns the alias called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Alias> {
        self.aliases.iter().find(|a| a.is_named(name))
    }

    /// Returns the addresses of the alias called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&AddressList> {
        self.get(name).map(Alias::addresses)
    }

    /// Returns the first alias containing the mailbox of `address`.
    #[must_use]
    pub fn reverse_lookup(&self, address: &Address) -> Option<&Alias> {
        let name = self.reverse.lookup(address.mailbox()?)?;
        self.get(name)
    }

    /// Iterates over the aliases in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.iter()
    }

    /// Returns the number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if no aliases are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.aliases.iter().position(|a| a.is_named(name))
    }

    fn push(&mut self, alias: Alias) {
        self.reverse.add(&alias);
        let event = AliasEvent::Added(alias.name().to_string());
        self.aliases.push(alias);
        self.notify(&event);
    }

    fn replace(&mut self, index: usize, mut alias: Alias) {
        let old = &self.aliases[index];
        alias.set_name(old.name().to_string());
        self.reverse.remove(old);
        self.reverse.add(&alias);
        let event = AliasEvent::Changed(alias.name().to_string());
        self.aliases[index] = alias;
        self.notify(&event);
    }

    fn notify(&mut self, event: &AliasEvent) {
        debug!("{}: {}", event.kind(), event.name());
        self.observers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
