//! Group registry and per-command group lists.

use std::collections::HashMap;

use addrbook_address::AddressList;
use tracing::debug;

use super::model::Group;
use crate::error::Result;

/// All known groups, keyed by name.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: HashMap<String, Group>,
}

impl GroupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group called `name`, creating it if needed.
    pub fn pattern_group(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_string()).or_insert_with(|| {
            debug!("creating group {name}");
            Group::new(name)
        })
    }

    /// Returns the group called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Removes the group called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Group> {
        let removed = self.groups.remove(name);
        if removed.is_some() {
            debug!("removing group {name}");
        }
        removed
    }

    /// Returns true if `mailbox` matches the group called `name`. Unknown
    /// groups match nothing.
    #[must_use]
    pub fn matches(&self, name: &str, mailbox: &str) -> bool {
        self.get(name).is_some_and(|g| g.matches(mailbox))
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over the groups in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    fn remove_if_empty(&mut self, name: &str) {
        if self.get(name).is_some_and(Group::is_empty) {
            self.remove(name);
        }
    }
}

/// The groups named by one configuration command (`-group NAME ...`).
///
/// Holds group names rather than the groups themselves; every operation
/// takes the registry it applies to.
#[derive(Debug, Clone, Default)]
pub struct GroupList {
    names: Vec<String>,
}

impl GroupList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Adds a group, creating it in the registry if needed. Adding the same
    /// group twice is a no-op.
    pub fn add(&mut self, registry: &mut GroupRegistry, name: &str) {
        registry.pattern_group(name);
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    /// Returns the group names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if no groups were named.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Adds `list` to every group.
    pub fn add_addrlist(&self, registry: &mut GroupRegistry, list: &AddressList) {
        for name in &self.names {
            registry.pattern_group(name).add_addresses(list);
        }
    }

    /// Removes the mailboxes in `list` from every group. Groups left empty
    /// are dropped from the registry.
    pub fn remove_addrlist(&self, registry: &mut GroupRegistry, list: &AddressList) {
        for name in &self.names {
            if let Some(group) = registry.groups.get_mut(name) {
                group.remove_addresses(list);
            }
            registry.remove_if_empty(name);
        }
    }

    /// Adds a case-insensitive pattern to every group.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn add_regex(&self, registry: &mut GroupRegistry, pattern: &str) -> Result<()> {
        for name in &self.names {
            registry.pattern_group(name).add_pattern(pattern)?;
        }
        Ok(())
    }

    /// Removes a pattern from every group. Groups left empty are dropped
    /// from the registry.
    ///
    /// Returns false if some group did not contain the pattern.
    pub fn remove_regex(&self, registry: &mut GroupRegistry, pattern: &str) -> bool {
        let mut all_removed = true;
        for name in &self.names {
            let removed = registry
                .groups
                .get_mut(name)
                .is_some_and(|g| g.remove_pattern(pattern));
            registry.remove_if_empty(name);
            all_removed &= removed;
        }
        all_removed
    }

    /// Drops the named groups that are still empty, such as those created
    /// by a command that then failed.
    pub fn remove_empty(&self, registry: &mut GroupRegistry) {
        for name in &self.names {
            registry.remove_if_empty(name);
        }
    }

    /// Removes every named group from the registry.
    pub fn clear(self, registry: &mut GroupRegistry) {
        for name in &self.names {
            registry.remove(name);
        }
    }
}
