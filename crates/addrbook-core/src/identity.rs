//! Local user identity.
//!
//! Alias expansion fills in real names for bare local mailboxes by asking
//! a [`UserDirectory`], normally backed by `/etc/passwd`.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::Result;

/// Default system password file.
pub const PASSWD_PATH: &str = "/etc/passwd";

/// One account known to a [`UserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    /// Login name.
    pub login: String,
    /// GECOS field (real name and other comma-separated details).
    pub gecos: String,
}

impl UserEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(login: impl Into<String>, gecos: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            gecos: gecos.into(),
        }
    }
}

/// Looks up local accounts by login name.
pub trait UserDirectory: fmt::Debug {
    /// Returns the account called `login`.
    fn lookup(&self, login: &str) -> Option<UserEntry>;
}

/// Accounts parsed from `passwd(5)`-format text.
#[derive(Debug, Clone, Default)]
pub struct PasswdFile {
    entries: Vec<UserEntry>,
}

impl PasswdFile {
    /// Parses `login:password:uid:gid:gecos:home:shell` lines. Blank,
    /// comment and malformed lines are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let fields: Vec<&str> = line.split(':').collect();
                if fields.len() < 5 || fields[0].is_empty() {
                    return None;
                }
                Some(UserEntry::new(fields[0], fields[4]))
            })
            .collect();
        Self { entries }
    }

    /// Reads and parses a password file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file = Self::parse(&text);
        debug!("loaded {} accounts from {}", file.entries.len(), path.display());
        Ok(file)
    }

    /// Reads the system password file.
    ///
    /// # Errors
    ///
    /// Returns an error if `/etc/passwd` cannot be read.
    pub fn system() -> Result<Self> {
        Self::load(PASSWD_PATH)
    }
}

impl UserDirectory for PasswdFile {
    fn lookup(&self, login: &str) -> Option<UserEntry> {
        self.entries.iter().find(|e| e.login == login).cloned()
    }
}

/// An in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, UserEntry>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account.
    #[must_use]
    pub fn with_user(mut self, login: &str, gecos: &str) -> Self {
        self.insert(UserEntry::new(login, gecos));
        self
    }

    /// Adds or replaces an account.
    pub fn insert(&mut self, entry: UserEntry) {
        self.entries.insert(entry.login.clone(), entry);
    }
}

impl UserDirectory for StaticDirectory {
    fn lookup(&self, login: &str) -> Option<UserEntry> {
        self.entries.get(login).cloned()
    }
}

/// Resolves login names to display names.
#[derive(Debug)]
pub struct Identity {
    directory: Box<dyn UserDirectory>,
    gecos_mask: Regex,
}

impl Identity {
    /// Creates an identity oracle.
    ///
    /// `gecos_mask` selects the real-name part of a GECOS field.
    ///
    /// # Errors
    ///
    /// Returns an error if `gecos_mask` does not compile.
    pub fn new(directory: Box<dyn UserDirectory>, gecos_mask: &str) -> Result<Self> {
        Ok(Self {
            directory,
            gecos_mask: Regex::new(gecos_mask)?,
        })
    }

    /// Returns the real name of the account called `login`, if it has one.
    #[must_use]
    pub fn real_name(&self, login: &str) -> Option<String> {
        let entry = self.directory.lookup(login)?;
        let name = gecos_name(&entry, &self.gecos_mask);
        (!name.is_empty()).then_some(name)
    }
}

/// Extracts a display name from a GECOS field.
///
/// The part selected by `mask` is used (or everything up to the first
/// comma if it does not match). `&` stands for the capitalised login.
#[must_use]
pub fn gecos_name(entry: &UserEntry, mask: &Regex) -> String {
    let selected = mask.find(&entry.gecos).map_or_else(
        || entry.gecos.split(',').next().unwrap_or_default(),
        |m| m.as_str(),
    );

    let mut name = String::with_capacity(selected.len());
    for c in selected.chars() {
        if c == '&' {
            name.push_str(&capitalize(&entry.login));
        } else {
            name.push(c);
        }
    }
    name.trim().to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
