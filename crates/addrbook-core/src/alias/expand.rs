//! Recursive alias expansion.

use std::collections::HashSet;

use addrbook_address::{Address, AddressList};
use tracing::{debug, trace};

use super::registry::AliasRegistry;
use crate::identity::Identity;

/// Expands alias names in address lists.
///
/// An entry is an alias candidate when it is not a group marker, has no
/// personal name and its mailbox has no domain. Candidates naming an alias
/// are replaced by the alias's (recursively expanded) addresses; other
/// candidates get a real name from the local user directory when one is
/// known.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    aliases: &'a AliasRegistry,
    identity: Option<&'a Identity>,
    domain: Option<&'a str>,
}

impl<'a> Expander<'a> {
    /// Creates an expander over `aliases`.
    #[must_use]
    pub const fn new(aliases: &'a AliasRegistry) -> Self {
        Self {
            aliases,
            identity: None,
            domain: None,
        }
    }

    /// Fills in real names of local users from `identity`.
    #[must_use]
    pub const fn with_identity(mut self, identity: &'a Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Qualifies remaining bare mailboxes with `domain`.
    #[must_use]
    pub const fn with_domain(mut self, domain: Option<&'a str>) -> Self {
        self.domain = domain;
        self
    }

    /// Expands every alias in `list`, then removes duplicate mailboxes.
    ///
    /// Each alias is expanded at most once per call, so cyclic definitions
    /// terminate: a repeated name is dropped.
    pub fn expand(&self, list: &mut AddressList) {
        let mut seen = HashSet::new();
        *list = self.expand_r(std::mem::take(list), &mut seen);
        list.dedupe();
    }

    fn expand_r(&self, list: AddressList, seen: &mut HashSet<String>) -> AddressList {
        let mut out = AddressList::new();

        for mut address in list {
            let Some(name) = alias_candidate(&address).map(str::to_string) else {
                out.append(address);
                continue;
            };

            if let Some(members) = self.aliases.lookup(&name) {
                if !seen.insert(name.to_ascii_lowercase()) {
                    debug!("loop in alias found for '{name}'");
                    continue;
                }

                trace!("expanding alias '{name}'");
                let mut copy = AddressList::new();
                copy.copy_from(members, false);
                out.extend(self.expand_r(copy, seen));
                continue;
            }

            if let Some(real_name) = self.identity.and_then(|id| id.real_name(&name)) {
                address.set_personal(Some(real_name));
            }
            out.append(address);
        }

        if let Some(domain) = self.domain {
            out.qualify(domain);
        }

        out
    }
}

fn alias_candidate(address: &Address) -> Option<&str> {
    if address.is_group() || address.personal().is_some() {
        return None;
    }
    address.mailbox().filter(|m| !m.contains('@'))
}
