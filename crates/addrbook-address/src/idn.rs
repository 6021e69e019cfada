//! Internationalized domain name conversion.
//!
//! Mailboxes travel in two forms: the *local* form shown to the user
//! (`jürgen@bücher.example`) and the *international* wire form with the
//! domain in Punycode (`jürgen@xn--bcher-kva.example`). Only the domain is
//! converted; the local part is left as it is.

use crate::address::Address;
use crate::error::{Error, Result};
use crate::list::AddressList;

/// ACE prefix marking a Punycode label.
const ACE_PREFIX: &str = "xn--";

/// Which IDN conversions are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdnOptions {
    /// Allow Unicode domains to be encoded to Punycode.
    pub encode: bool,
    /// Allow Punycode domains to be decoded to Unicode.
    pub decode: bool,
}

impl Default for IdnOptions {
    fn default() -> Self {
        Self {
            encode: true,
            decode: true,
        }
    }
}

/// Converts a mailbox to wire form.
///
/// Mailboxes without a domain, or with an all-ASCII domain, are returned
/// unchanged.
///
/// # Errors
///
/// Returns [`Error::Idn`] if the domain is not ASCII and either encoding is
/// disabled or the domain is not a valid IDN.
pub fn mailbox_to_intl(mailbox: &str, options: IdnOptions) -> Result<String> {
    let Some((local, domain)) = mailbox.rsplit_once('@') else {
        return Ok(mailbox.to_string());
    };

    if domain.is_ascii() {
        return Ok(mailbox.to_string());
    }

    if !options.encode {
        return Err(Error::idn(mailbox, "IDN encoding is disabled"));
    }

    let ascii = idna::domain_to_ascii(domain)
        .map_err(|_| Error::idn(mailbox, "domain cannot be converted to ASCII"))?;

    Ok(format!("{local}@{ascii}"))
}

/// Converts a mailbox to local form.
///
/// Decoding is only accepted if the Unicode domain encodes back to the
/// same ASCII domain; otherwise the wire form is returned.
#[must_use]
pub fn mailbox_to_local(mailbox: &str, options: IdnOptions) -> String {
    let Some((local, domain)) = mailbox.rsplit_once('@') else {
        return mailbox.to_string();
    };

    if !options.decode || !has_ace_label(domain) {
        return mailbox.to_string();
    }

    let (unicode, result) = idna::domain_to_unicode(domain);
    if result.is_err() {
        return mailbox.to_string();
    }

    match idna::domain_to_ascii(&unicode) {
        Ok(reencoded) if reencoded.eq_ignore_ascii_case(domain) => format!("{local}@{unicode}"),
        _ => mailbox.to_string(),
    }
}

fn has_ace_label(domain: &str) -> bool {
    domain.split('.').any(|label| {
        label
            .get(..ACE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ACE_PREFIX))
    })
}

#[allow(clippy::wrong_self_convention)]
impl Address {
    /// Converts the mailbox to wire form.
    ///
    /// Addresses already known to be in wire form, and mailboxes without a
    /// domain, are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Idn`] if the domain cannot be encoded. The address
    /// is unchanged in that case.
    pub fn to_intl(&mut self, options: IdnOptions) -> Result<()> {
        if self.intl_state() == Some(true) {
            return Ok(());
        }
        let Some(mailbox) = self.mailbox().filter(|m| m.contains('@')) else {
            return Ok(());
        };

        let intl = mailbox_to_intl(mailbox, options)?;
        self.set_mailbox(Some(intl));
        self.set_intl_state(true);
        Ok(())
    }

    /// Converts the mailbox to local form.
    ///
    /// Returns true if the mailbox text changed.
    pub fn to_local(&mut self, options: IdnOptions) -> bool {
        if self.intl_state() == Some(false) {
            return false;
        }
        let Some(mailbox) = self.mailbox().filter(|m| m.contains('@')) else {
            return false;
        };

        let local = mailbox_to_local(mailbox, options);
        let changed = local != mailbox;
        self.set_mailbox(Some(local));
        self.set_intl_state(false);
        changed
    }
}

#[allow(clippy::wrong_self_convention)]
impl AddressList {
    /// Converts every mailbox to wire form.
    ///
    /// A failure does not stop the conversion: the remaining addresses are
    /// still processed.
    ///
    /// # Errors
    ///
    /// Returns one [`Error::Idn`] per mailbox that could not be encoded.
    pub fn to_intl(&mut self, options: IdnOptions) -> std::result::Result<(), Vec<Error>> {
        let errors: Vec<Error> = self
            .iter_mut()
            .filter_map(|address| address.to_intl(options).err())
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Converts every mailbox to local form, returning how many changed.
    pub fn to_local(&mut self, options: IdnOptions) -> usize {
        self.iter_mut()
            .map(|address| address.to_local(options))
            .filter(|&changed| changed)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LOCAL: &str = "test@äöüss.com";
    const INTL: &str = "test@xn--ss-uia6e4a.com";

    #[test]
    fn test_mailbox_to_intl() {
        assert_eq!(mailbox_to_intl(LOCAL, IdnOptions::default()).unwrap(), INTL);
        assert_eq!(
            mailbox_to_intl("plain@example.com", IdnOptions::default()).unwrap(),
            "plain@example.com"
        );
        assert_eq!(mailbox_to_intl("user", IdnOptions::default()).unwrap(), "user");
    }

    #[test]
    fn test_mailbox_to_intl_keeps_local_part() {
        assert_eq!(
            mailbox_to_intl("jürgen@äöüss.com", IdnOptions::default()).unwrap(),
            "jürgen@xn--ss-uia6e4a.com"
        );
    }

    #[test]
    fn test_mailbox_to_intl_encoding_disabled() {
        let options = IdnOptions {
            encode: false,
            decode: true,
        };
        let err = mailbox_to_intl(LOCAL, options).unwrap_err();
        assert_eq!(err.mailbox(), Some(LOCAL));
    }

    #[test]
    fn test_mailbox_to_local() {
        assert_eq!(mailbox_to_local(INTL, IdnOptions::default()), LOCAL);
        assert_eq!(mailbox_to_local("TEST@XN--SS-UIA6E4A.COM", IdnOptions::default()), "TEST@äöüss.com");
        let options = IdnOptions {
            encode: true,
            decode: false,
        };
        assert_eq!(mailbox_to_local(INTL, options), INTL);
    }

    #[test]
    fn test_mailbox_to_local_rejects_garbage() {
        // Not valid Punycode: kept in wire form.
        assert_eq!(
            mailbox_to_local("a@xn--a.example", IdnOptions::default()),
            "a@xn--a.example"
        );
    }

    #[test]
    fn test_address_round_trip() {
        let mut a = Address::mailbox_only(LOCAL);
        a.to_intl(IdnOptions::default()).unwrap();
        assert_eq!(a.mailbox(), Some(INTL));
        assert_eq!(a.intl_state(), Some(true));

        assert!(a.to_local(IdnOptions::default()));
        assert_eq!(a.mailbox(), Some(LOCAL));
        assert_eq!(a.intl_state(), Some(false));

        // Already local: nothing to do.
        assert!(!a.to_local(IdnOptions::default()));
    }

    #[test]
    fn test_list_to_intl_reports_each_failure() {
        let options = IdnOptions {
            encode: false,
            decode: true,
        };
        let mut al = AddressList::new();
        al.append(Address::mailbox_only("a@äöü.com"));
        al.append(Address::mailbox_only("ok@example.com"));
        al.append(Address::mailbox_only("b@ñ.org"));

        let errors = al.to_intl(options).unwrap_err();
        let bad: Vec<_> = errors.iter().filter_map(Error::mailbox).collect();
        assert_eq!(bad, ["a@äöü.com", "b@ñ.org"]);
        assert_eq!(al.get(1).unwrap().intl_state(), Some(true));
        assert_eq!(al.get(0).unwrap().intl_state(), None);
    }

    #[test]
    fn test_list_to_local_counts() {
        let mut al = AddressList::new();
        al.append(Address::mailbox_only(INTL));
        al.append(Address::mailbox_only("plain@example.com"));
        al.append(Address::group_end());
        assert_eq!(al.to_local(IdnOptions::default()), 1);
    }
}
