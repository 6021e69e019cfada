//! A single email participant.

/// Characters with special meaning in RFC 5322 address syntax.
pub const ADDRESS_SPECIALS: &str = "\"(),.:;<>@[\\]";

/// One email participant: an optional display name plus a mailbox.
///
/// The same type also encodes RFC 5322 group structure inside an
/// [`AddressList`](crate::AddressList):
///
/// - a *group marker* has `group` set, no mailbox and the group name as its
///   personal name;
/// - a *group terminator* has neither a mailbox nor a personal name.
///
/// `Address` deliberately does not implement `PartialEq`. There are several
/// notions of sameness ([`Address::strict_eq`], [`Address::mailbox_eq`],
/// [`AddressList::equal`](crate::AddressList::equal)) and each call site must
/// pick the one it needs.
#[derive(Debug, Clone, Default)]
pub struct Address {
    personal: Option<String>,
    mailbox: Option<String>,
    group: bool,
    is_intl: bool,
    intl_checked: bool,
}

impl Address {
    /// Creates an address from an optional personal name and a mailbox.
    #[must_use]
    pub fn new(personal: Option<&str>, mailbox: &str) -> Self {
        Self {
            personal: personal.map(str::to_string),
            mailbox: Some(mailbox.to_string()),
            ..Self::default()
        }
    }

    /// Creates an address with just a mailbox.
    #[must_use]
    pub fn mailbox_only(mailbox: &str) -> Self {
        Self::new(None, mailbox)
    }

    /// Creates a group marker (`name:`).
    #[must_use]
    pub fn group_marker(name: &str) -> Self {
        Self {
            personal: (!name.is_empty()).then(|| name.to_string()),
            group: true,
            ..Self::default()
        }
    }

    /// Creates a group terminator (`;`).
    #[must_use]
    pub fn group_end() -> Self {
        Self::default()
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn personal(&self) -> Option<&str> {
        self.personal.as_deref()
    }

    /// Returns the mailbox (`local@domain`), if any.
    #[must_use]
    pub fn mailbox(&self) -> Option<&str> {
        self.mailbox.as_deref()
    }

    /// Returns true if this address opens an RFC 5322 group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        self.group
    }

    /// Returns true for a pure group-name marker.
    #[must_use]
    pub const fn is_group_marker(&self) -> bool {
        self.group && self.mailbox.is_none()
    }

    /// Returns true for a group terminator.
    #[must_use]
    pub const fn is_group_end(&self) -> bool {
        !self.group && self.mailbox.is_none() && self.personal.is_none()
    }

    /// Returns true if the address is empty (no name, no mailbox).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.personal.is_none() && self.mailbox.is_none()
    }

    /// Sets or clears the display name.
    pub fn set_personal(&mut self, personal: Option<String>) {
        self.personal = personal;
    }

    /// Replaces the mailbox, forgetting any cached IDN state.
    pub fn set_mailbox(&mut self, mailbox: Option<String>) {
        self.mailbox = mailbox;
        self.is_intl = false;
        self.intl_checked = false;
    }

    /// Returns `Some(true)` if the mailbox is known to be in wire (ASCII)
    /// form, `Some(false)` if it is known to be in local form, `None` if
    /// this has not been determined.
    #[must_use]
    pub const fn intl_state(&self) -> Option<bool> {
        if self.intl_checked {
            Some(self.is_intl)
        } else {
            None
        }
    }

    pub(crate) fn set_intl_state(&mut self, is_intl: bool) {
        self.is_intl = is_intl;
        self.intl_checked = true;
    }

    /// Compares two addresses: mailbox case-insensitively, personal name
    /// exactly.
    ///
    /// Addresses without a mailbox never compare equal.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        self.mailbox_eq(other) && self.personal == other.personal
    }

    /// Compares only the mailboxes, case-insensitively.
    ///
    /// Addresses without a mailbox never compare equal.
    #[must_use]
    pub fn mailbox_eq(&self, other: &Self) -> bool {
        match (self.mailbox(), other.mailbox()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    /// Returns true if the mailbox contains non-ASCII characters.
    #[must_use]
    pub fn uses_unicode(&self) -> bool {
        self.mailbox()
            .is_some_and(|mailbox| uses_unicode(mailbox.as_bytes()))
    }

    /// Returns the most human-friendly text for this address: the personal
    /// name when present, else the mailbox.
    #[must_use]
    pub fn for_display(&self) -> &str {
        self.personal()
            .filter(|personal| !personal.is_empty())
            .or_else(|| self.mailbox())
            .unwrap_or_default()
    }

    /// Returns true if the mailbox lacks a domain part.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.mailbox().is_some_and(|mailbox| !mailbox.contains('@'))
    }
}

/// Scans bytes as UTF-8 and reports whether any non-ASCII character is
/// present.
///
/// Scanning is best-effort: malformed sequences are skipped rather than
/// reported.
#[must_use]
pub fn uses_unicode(bytes: &[u8]) -> bool {
    bytes
        .utf8_chunks()
        .any(|chunk| !chunk.valid().is_ascii())
}

/// Appends `value` to `out`, wrapping it in double quotes if it contains any
/// of `specials`.
///
/// Inside the quotes, `\` and `"` are backslash-escaped.
pub fn addr_cat(out: &mut String, value: &str, specials: &str) {
    if !value.contains(|c| specials.contains(c)) {
        out.push_str(value);
        return;
    }

    out.push('"');
    for c in value.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// Returns true if `c` is an RFC 5322 special.
#[must_use]
pub fn is_special(c: char) -> bool {
    ADDRESS_SPECIALS.contains(c)
}

/// Returns true if `c` is email whitespace.
#[must_use]
pub const fn is_email_wsp(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}
