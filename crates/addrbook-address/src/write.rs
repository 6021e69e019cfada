//! Address serialization.

use std::fmt;
use std::io::{self, Write};

use crate::address::{ADDRESS_SPECIALS, Address, addr_cat};
use crate::idn::{IdnOptions, mailbox_to_local};
use crate::list::AddressList;

/// Default column at which header lines are folded.
pub const DEFAULT_WRAP_COLUMNS: usize = 74;

/// Column reached after a fold (`\t` counts as eight).
const FOLD_INDENT: usize = 8;

impl Address {
    /// Serializes a single address.
    ///
    /// With `display` set, Punycode domains are shown in Unicode form.
    /// Personal names containing RFC 5322 specials are always quoted.
    #[must_use]
    pub fn write(&self, display: bool) -> String {
        let mut out = String::new();
        self.write_into(&mut out, display.then(IdnOptions::default));
        out
    }

    /// Serializes the address for display, decoding Punycode domains only
    /// if `options` allows it.
    #[must_use]
    pub fn write_display(&self, options: IdnOptions) -> String {
        let mut out = String::new();
        self.write_into(&mut out, Some(options));
        out
    }

    fn write_into(&self, out: &mut String, display: Option<IdnOptions>) {
        let personal = self.personal().filter(|p| !p.is_empty());

        if self.is_group_marker() {
            if let Some(name) = personal {
                addr_cat(out, name, ADDRESS_SPECIALS);
            }
            out.push_str(": ");
            return;
        }

        let Some(mailbox) = self.mailbox() else {
            match personal {
                Some(name) => addr_cat(out, name, ADDRESS_SPECIALS),
                None => out.push(';'),
            }
            return;
        };

        if let Some(name) = personal {
            addr_cat(out, name, ADDRESS_SPECIALS);
            out.push(' ');
        }

        let angle = personal.is_some() || mailbox.starts_with('@');
        if angle {
            out.push('<');
        }

        // "@" is the null return path and renders as "<>"
        if mailbox != "@" {
            match display {
                Some(options) => out.push_str(&mailbox_to_local(mailbox, options)),
                None => out.push_str(mailbox),
            }
        }

        if angle {
            out.push('>');
        }
    }

    /// Returns true if a list separator is due between this entry and
    /// `next`.
    fn wants_separator(&self, next: Option<&Self>) -> bool {
        !self.is_group_marker() && next.is_some_and(|n| !n.is_group_end())
    }
}

impl AddressList {
    /// Serializes the whole list on one line.
    ///
    /// Entries are joined with `", "`; group markers are followed directly
    /// by their first member and terminators close the group with `;`.
    #[must_use]
    pub fn write(&self, display: bool) -> String {
        self.write_with(display.then(IdnOptions::default))
    }

    /// Serializes the whole list for display, decoding Punycode domains
    /// only if `options` allows it.
    #[must_use]
    pub fn write_display(&self, options: IdnOptions) -> String {
        self.write_with(Some(options))
    }

    fn write_with(&self, display: Option<IdnOptions>) -> String {
        let mut out = String::new();
        let mut iter = self.iter().peekable();
        while let Some(address) = iter.next() {
            address.write_into(&mut out, display);
            if address.wants_separator(iter.peek().copied()) {
                out.push_str(", ");
            }
        }
        out
    }

    /// Serializes the list as a header line, folding before any entry that
    /// would pass column `cols`.
    ///
    /// Folds only happen at list separators, never inside an address.
    #[must_use]
    pub fn write_wrap(&self, header: &str, cols: usize) -> String {
        let mut out = format!("{header}: ");
        let mut col = out.chars().count();
        let mut pending_separator = false;

        let mut iter = self.iter().peekable();
        while let Some(address) = iter.next() {
            let text = address.write(false);
            let len = text.chars().count();

            if pending_separator {
                if col + 2 + len > cols {
                    out.push_str(",\n\t");
                    col = FOLD_INDENT;
                } else {
                    out.push_str(", ");
                    col += 2;
                }
            }

            out.push_str(&text);
            col += len;
            pending_separator = address.wants_separator(iter.peek().copied());
        }

        out
    }

    /// Serializes each entry separately.
    ///
    /// Group markers are included (as `"name: "`), terminators are not.
    #[must_use]
    pub fn write_list(&self) -> Vec<String> {
        self.iter()
            .filter(|a| !a.is_group_end())
            .map(|a| a.write(false))
            .collect()
    }

    /// Writes the list as a wrapped header line, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_file<W: Write>(&self, writer: &mut W, header: &str, cols: usize) -> io::Result<()> {
        writeln!(writer, "{}", self.write_wrap(header, cols))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write(false))
    }
}

impl fmt::Display for AddressList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write(false))
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
    fn test_write_address() {
        assert_eq!(
            Address::new(Some("John Doe"), "john@doe.org").write(false),
            "John Doe <john@doe.org>"
        );
        assert_eq!(Address::mailbox_only("john@doe.org").write(false), "john@doe.org");
        assert_eq!(
            Address::new(Some("Foo J. Bar"), "foo-j-bar@baz.com").write(false),
            "\"Foo J. Bar\" <foo-j-bar@baz.com>"
        );
    }

    #[test]
    fn test_write_null_mailbox() {
        assert_eq!(Address::mailbox_only("@").write(false), "<>");
    }

    #[test]
    fn test_write_group() {
        let al = list("some-group: a@x.com, b@x.com;, c@y.com");
        assert_eq!(al.write(false), "some-group: a@x.com, b@x.com;, c@y.com");
    }

    #[test]
    fn test_write_empty_group() {
        let mut al = AddressList::new();
        al.append(Address::group_marker("undisclosed-recipients"));
        al.append(Address::group_end());
        assert_eq!(al.write(false), "undisclosed-recipients: ;");
    }

    #[test]
    fn test_write_quoted_group_name() {
        let mut al = AddressList::new();
        al.append(Address::group_marker("Team: Ops"));
        al.append(Address::mailbox_only("ops@x.org"));
        al.append(Address::group_end());
        assert_eq!(al.write(false), "\"Team: Ops\": ops@x.org;");
    }

    #[test]
    fn test_write_display_decodes_punycode() {
        let a = Address::mailbox_only("test@xn--ss-uia6e4a.com");
        assert_eq!(a.write(false), "test@xn--ss-uia6e4a.com");
        assert_eq!(a.write(true), "test@äöüss.com");
    }

    #[test]
    fn test_write_display_respects_decode_switch() {
        let al = list("Test <test@xn--ss-uia6e4a.com>, plain@example.com");
        let no_decode = IdnOptions {
            encode: true,
            decode: false,
        };
        assert_eq!(
            al.write_display(no_decode),
            "Test <test@xn--ss-uia6e4a.com>, plain@example.com"
        );
        assert_eq!(
            al.write_display(IdnOptions::default()),
            "Test <test@äöüss.com>, plain@example.com"
        );
        assert_eq!(
            al.first().unwrap().write_display(no_decode),
            "Test <test@xn--ss-uia6e4a.com>"
        );
    }

    #[test]
    fn test_write_list() {
        let al = list(
            "some-group: first@example.com, second@example.com;, \
             John Doe <john@doe.org>, \"Foo J. Bar\" <foo-j-bar@baz.com>",
        );
        let items = al.write_list();
        assert_eq!(items.len(), 5);
        let joined: String = items.iter().map(|s| format!("|{s}|")).collect();
        assert_eq!(
            joined,
            "|some-group: ||first@example.com||second@example.com||John Doe <john@doe.org>||\"Foo J. Bar\" <foo-j-bar@baz.com>|"
        );
    }

    #[test]
    fn test_write_wrap_short() {
        let al = list("a@b.c, d@e.f");
        assert_eq!(al.write_wrap("To", DEFAULT_WRAP_COLUMNS), "To: a@b.c, d@e.f");
    }

    #[test]
    fn test_write_wrap_folds() {
        let al = list(
            "first.person@example.com, second.person@example.com, third.person@example.com",
        );
        let wrapped = al.write_wrap("To", 40);
        assert_eq!(
            wrapped,
            "To: first.person@example.com,\n\tsecond.person@example.com,\n\tthird.person@example.com"
        );
    }

    #[test]
    fn test_write_wrap_never_splits_address() {
        let al = list("a-very-long-mailbox-name-that-exceeds@example.com");
        assert_eq!(
            al.write_wrap("Cc", 10),
            "Cc: a-very-long-mailbox-name-that-exceeds@example.com"
        );
    }

    #[test]
    fn test_write_file() {
        let al = list("John Doe <john@doe.org>");
        let mut buf = Vec::new();
        al.write_file(&mut buf, "From", DEFAULT_WRAP_COLUMNS).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "From: John Doe <john@doe.org>\n");
    }

    #[test]
    fn test_display() {
        let al = list("John Doe <john@doe.org>, foo@bar.baz");
        assert_eq!(al.to_string(), "John Doe <john@doe.org>, foo@bar.baz");
    }
}
