//! RFC 5322 address list parser.
//!
//! The parser is deliberately lenient. It accepts the shapes people type
//! into a composer or an alias file: bare local names, comments used as
//! display names, unquoted names containing dots, and so on. Malformed
//! individual address specs are skipped; only structural errors
//! (unbalanced quotes or parentheses, broken angle addresses) fail the
//! whole parse.

use std::str::FromStr;

use tracing::debug;

use crate::address::{Address, is_email_wsp, is_special};
use crate::error::{Error, ParseError, Result};
use crate::list::AddressList;

/// Characters that end a "simple" whitespace-separated address list.
const STRUCTURAL: &[char] = &['"', '<', '>', '(', ')', ':', ';', ',', '\\'];

impl AddressList {
    /// Parses RFC 5322 address text and appends the result.
    ///
    /// Group syntax (`name: a, b;`) produces a group marker, the member
    /// addresses and a group terminator. Returns the number of addresses
    /// recognised; group markers and terminators are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for unbalanced quotes or parentheses and
    /// malformed angle addresses. Nothing is appended in that case.
    pub fn parse(&mut self, text: &str) -> Result<usize> {
        let before = self.len();
        parse_into(self, text).map_err(|e| {
            self.truncate(before);
            Error::from(e)
        })
    }

    /// Parses free-form text typed by a user.
    ///
    /// If the text contains no address punctuation at all, it is treated as
    /// a whitespace-separated list of mailboxes (so `alice bob` yields two
    /// entries rather than one mailbox `alicebob`). Otherwise this behaves
    /// like [`AddressList::parse`]. Empty text yields `Ok(0)`.
    ///
    /// # Errors
    ///
    /// Same as [`AddressList::parse`].
    pub fn parse2(&mut self, text: &str) -> Result<usize> {
        if text.is_empty() {
            return Ok(0);
        }

        if text.contains(STRUCTURAL) {
            return self.parse(text);
        }

        let before = self.len();
        let mut parsed = 0;
        for word in text.split([' ', '\t']).filter(|w| !w.is_empty()) {
            match parse_into(self, word) {
                Ok(n) => parsed += n,
                Err(e) => {
                    self.truncate(before);
                    return Err(e.into());
                }
            }
        }
        Ok(parsed)
    }
}

impl FromStr for AddressList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut list = Self::new();
        list.parse(s)?;
        Ok(list)
    }
}

fn parse_into(list: &mut AddressList, text: &str) -> std::result::Result<usize, ParseError> {
    let mut p = Parser::new(text);
    let mut phrase = String::new();
    let mut comment = String::new();
    let mut parsed = 0;

    p.skip_wsp();
    let mut ws_pending = false;

    while let Some(c) = p.peek() {
        match c {
            ';' | ',' => {
                if !phrase.is_empty() {
                    if add_addrspec(list, &phrase, &comment) {
                        parsed += 1;
                    }
                } else if !comment.is_empty() {
                    attach_comment(list, &comment);
                }

                if c == ';' {
                    list.append(Address::group_end());
                }

                phrase.clear();
                comment.clear();
                p.advance();
            }
            '(' => {
                if !comment.is_empty() {
                    comment.push(' ');
                }
                p.advance();
                p.parse_comment(&mut comment)?;
            }
            '"' => {
                if !phrase.is_empty() {
                    phrase.push(' ');
                }
                p.advance();
                let mut quoted = String::new();
                p.parse_quote(&mut quoted)?;
                // A quoted local part stays quoted in the mailbox.
                if p.peek() == Some('@') {
                    push_quoted(&mut phrase, &quoted);
                } else {
                    phrase.push_str(&quoted);
                }
            }
            ':' => {
                list.append(Address::group_marker(&phrase));
                phrase.clear();
                comment.clear();
                p.advance();
            }
            '<' => {
                let mut address = Address::default();
                if !phrase.is_empty() {
                    address.set_personal(Some(std::mem::take(&mut phrase)));
                }
                p.advance();
                p.parse_route_addr(&mut comment, &mut address)?;
                list.append(address);
                phrase.clear();
                comment.clear();
                parsed += 1;
            }
            _ => {
                if !phrase.is_empty() && ws_pending {
                    phrase.push(' ');
                }
                if c == '\\' {
                    p.advance();
                    if let Some(escaped) = p.advance() {
                        phrase.push(escaped);
                    }
                }
                p.next_token(&mut phrase)?;
            }
        }

        ws_pending = p.peek().is_some_and(is_email_wsp);
        p.skip_wsp();
    }

    if !phrase.is_empty() {
        if add_addrspec(list, &phrase, &comment) {
            parsed += 1;
        }
    } else if !comment.is_empty() {
        attach_comment(list, &comment);
    }

    Ok(parsed)
}

/// Parses `phrase` as a bare addr-spec and appends it.
fn add_addrspec(list: &mut AddressList, phrase: &str, comment: &str) -> bool {
    let mut p = Parser::new(phrase);
    let mut address = Address::default();
    let mut token = String::new();
    let mut comment = comment.to_string();

    let result = p.parse_address(&mut token, &mut comment, &mut address).and_then(|()| {
        match p.peek() {
            None | Some(',' | ';') => Ok(()),
            Some(_) => Err(ParseError::BadAddrSpec),
        }
    });

    match result {
        Ok(()) => {
            list.append(address);
            true
        }
        Err(e) => {
            debug!("dropping address '{phrase}': {e}");
            false
        }
    }
}

/// Appends `text` as a quoted string, escaping `\` and `"`.
fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// A trailing `(comment)` names the previous address if it has no name yet.
fn attach_comment(list: &mut AddressList, comment: &str) {
    let Some(last) = list.iter_mut().last() else {
        return;
    };
    if last.personal().is_none() && last.mailbox().is_some_and(|m| !m.is_empty()) {
        last.set_personal(Some(comment.to_string()));
    }
}

/// Cursor over address text.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_wsp(&mut self) {
        while self.peek().is_some_and(is_email_wsp) {
            self.advance();
        }
    }

    /// Reads one token: a comment, a quoted string, a single special, or a
    /// run of ordinary characters.
    fn next_token(&mut self, token: &mut String) -> std::result::Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some('(') => {
                self.advance();
                self.parse_comment(token)
            }
            Some('"') => {
                self.advance();
                self.parse_quote(token)
            }
            Some(c) if is_special(c) => {
                token.push(c);
                self.advance();
                Ok(())
            }
            Some(_) => {
                while let Some(c) = self.peek() {
                    if is_email_wsp(c) || is_special(c) {
                        break;
                    }
                    token.push(c);
                    self.advance();
                }
                Ok(())
            }
        }
    }

    /// Reads a comment body; the opening `(` has been consumed.
    fn parse_comment(&mut self, comment: &mut String) -> std::result::Result<(), ParseError> {
        let mut level = 1;
        while let Some(mut c) = self.advance() {
            match c {
                '(' => level += 1,
                ')' => {
                    level -= 1;
                    if level == 0 {
                        return Ok(());
                    }
                }
                '\\' => match self.advance() {
                    Some(escaped) => c = escaped,
                    None => break,
                },
                _ => {}
            }
            comment.push(c);
        }
        Err(ParseError::MismatchedParen)
    }

    /// Reads a quoted string body; the opening `"` has been consumed.
    fn parse_quote(&mut self, token: &mut String) -> std::result::Result<(), ParseError> {
        while let Some(c) = self.advance() {
            match c {
                '"' => return Ok(()),
                '\\' => match self.advance() {
                    Some(escaped) => token.push(escaped),
                    None => break,
                },
                _ => token.push(c),
            }
        }
        Err(ParseError::MismatchedQuote)
    }

    /// Reads a local part or domain, stopping at any special not listed in
    /// `nonspecial`. Comments along the way go to `comment`.
    fn parse_mailboxdomain(
        &mut self,
        nonspecial: &str,
        mailbox: &mut String,
        comment: &mut String,
    ) -> std::result::Result<(), ParseError> {
        loop {
            self.skip_wsp();
            let Some(c) = self.peek() else {
                return Ok(());
            };
            if !nonspecial.contains(c) && is_special(c) {
                return Ok(());
            }

            if c == '(' {
                if !comment.is_empty() {
                    comment.push(' ');
                }
                self.advance();
                self.parse_comment(comment)?;
            } else if c == '"' {
                self.advance();
                let mut quoted = String::new();
                self.parse_quote(&mut quoted)?;
                push_quoted(mailbox, &quoted);
            } else {
                self.next_token(mailbox)?;
            }
        }
    }

    fn parse_address(
        &mut self,
        token: &mut String,
        comment: &mut String,
        address: &mut Address,
    ) -> std::result::Result<(), ParseError> {
        self.parse_mailboxdomain(".\"(\\", token, comment)?;

        if self.peek() == Some('@') {
            token.push('@');
            self.advance();
            self.parse_mailboxdomain(".([]\\", token, comment)?;
        }

        address.set_mailbox(Some(token.clone()));

        if !comment.is_empty() && address.personal().is_none() {
            address.set_personal(Some(comment.clone()));
        }

        Ok(())
    }

    /// Reads `[@route,@route:]local@domain>`; the `<` has been consumed.
    ///
    /// Source routes are obsolete and discarded.
    fn parse_route_addr(
        &mut self,
        comment: &mut String,
        address: &mut Address,
    ) -> std::result::Result<(), ParseError> {
        self.skip_wsp();

        if self.peek() == Some('@') {
            let mut route = String::new();
            while self.peek() == Some('@') {
                route.push('@');
                self.advance();
                self.parse_mailboxdomain(",.\\[](", &mut route, comment)?;
            }
            if self.peek() != Some(':') {
                return Err(ParseError::BadRoute);
            }
            self.advance();
            debug!("ignoring source route '{route}'");
        }

        let mut token = String::new();
        self.parse_address(&mut token, comment, address)?;

        if self.peek() != Some('>') {
            return Err(ParseError::BadRouteAddr);
        }
        self.advance();

        if address.mailbox().is_none_or(str::is_empty) {
            address.set_mailbox(Some("@".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (usize, AddressList) {
        let mut list = AddressList::new();
        let n = list.parse(text).unwrap();
        (n, list)
    }

    #[test]
    fn test_parse_name_and_bare() {
        let (n, al) = parse("John Doe <john@doe.org>, foo@bar.baz");
        assert_eq!(n, 2);
        assert_eq!(al.len(), 2);
        let first = al.get(0).unwrap();
        assert_eq!(first.personal(), Some("John Doe"));
        assert_eq!(first.mailbox(), Some("john@doe.org"));
        let second = al.get(1).unwrap();
        assert_eq!(second.personal(), None);
        assert_eq!(second.mailbox(), Some("foo@bar.baz"));
    }

    #[test]
    fn test_parse_group() {
        let (n, al) = parse("some-group: a@x.com, b@x.com;");
        assert_eq!(n, 2);
        assert_eq!(al.len(), 4);

        let marker = al.get(0).unwrap();
        assert!(marker.is_group());
        assert_eq!(marker.personal(), Some("some-group"));
        assert_eq!(marker.mailbox(), None);

        assert_eq!(al.get(1).unwrap().mailbox(), Some("a@x.com"));
        assert_eq!(al.get(2).unwrap().mailbox(), Some("b@x.com"));

        let end = al.get(3).unwrap();
        assert!(end.is_group_end());
    }

    #[test]
    fn test_parse_quoted_personal() {
        let (_, al) = parse(r#""Doe, John \"JD\"" <john@doe.org>"#);
        assert_eq!(al.first().unwrap().personal(), Some(r#"Doe, John "JD""#));
    }

    #[test]
    fn test_parse_comment_as_personal() {
        let (_, al) = parse("john@doe.org (John Doe), jane@doe.org");
        assert_eq!(al.get(0).unwrap().personal(), Some("John Doe"));
        assert_eq!(al.get(0).unwrap().mailbox(), Some("john@doe.org"));
        assert_eq!(al.get(1).unwrap().personal(), None);
    }

    #[test]
    fn test_parse_trailing_comment() {
        let (_, al) = parse("john@doe.org (Johnny)");
        assert_eq!(al.first().unwrap().personal(), Some("Johnny"));
    }

    #[test]
    fn test_parse_nested_comment() {
        let (_, al) = parse("a@b.c (outer (inner) text)");
        assert_eq!(al.first().unwrap().personal(), Some("outer (inner) text"));
    }

    #[test]
    fn test_parse_unqualified() {
        let (n, al) = parse("user1, user2");
        assert_eq!(n, 2);
        assert_eq!(al.get(0).unwrap().mailbox(), Some("user1"));
        assert_eq!(al.get(1).unwrap().mailbox(), Some("user2"));
    }

    #[test]
    fn test_parse_route_addr() {
        let (_, al) = parse("<@relay.example,@other.example:user@host.example>");
        assert_eq!(al.first().unwrap().mailbox(), Some("user@host.example"));
    }

    #[test]
    fn test_parse_null_route() {
        let (n, al) = parse("<>");
        assert_eq!(n, 1);
        assert_eq!(al.first().unwrap().mailbox(), Some("@"));
    }

    #[test]
    fn test_parse_mismatched_quote() {
        let mut al = AddressList::new();
        al.append(Address::mailbox_only("keep@me"));
        let err = al.parse("\"John <john@doe.org>").unwrap_err();
        assert_eq!(err, Error::Parse(ParseError::MismatchedQuote));
        assert_eq!(al.len(), 1);
    }

    #[test]
    fn test_parse_mismatched_paren() {
        let mut al = AddressList::new();
        let err = al.parse("john@doe.org (John").unwrap_err();
        assert_eq!(err, Error::Parse(ParseError::MismatchedParen));
        assert!(al.is_empty());
    }

    #[test]
    fn test_parse_bad_route_addr() {
        let mut al = AddressList::new();
        assert_eq!(
            al.parse("John <john@doe.org").unwrap_err(),
            Error::Parse(ParseError::BadRouteAddr)
        );
        assert_eq!(
            al.parse("John <@relay john@doe.org>").unwrap_err(),
            Error::Parse(ParseError::BadRoute)
        );
    }

    #[test]
    fn test_parse_empty() {
        let (n, al) = parse("");
        assert_eq!(n, 0);
        assert!(al.is_empty());
        let (n, al) = parse("   ");
        assert_eq!(n, 0);
        assert!(al.is_empty());
    }

    #[test]
    fn test_parse2_empty() {
        let mut al = AddressList::new();
        assert_eq!(al.parse2("").unwrap(), 0);
        assert!(al.is_empty());
    }

    #[test]
    fn test_parse2_bare_word() {
        let mut al = AddressList::new();
        assert_eq!(al.parse2("apple").unwrap(), 1);
        assert_eq!(al.first().unwrap().mailbox(), Some("apple"));
    }

    #[test]
    fn test_parse2_whitespace_list() {
        let mut al = AddressList::new();
        assert_eq!(
            al.parse2("test@example.com john@doe.org foo@bar.baz").unwrap(),
            3
        );
        let mailboxes: Vec<_> = al.iter().filter_map(Address::mailbox).collect();
        assert_eq!(mailboxes, ["test@example.com", "john@doe.org", "foo@bar.baz"]);
        assert!(al.iter().all(|a| a.personal().is_none()));
    }

    #[test]
    fn test_parse2_falls_back_to_full_parse() {
        let mut al = AddressList::new();
        assert_eq!(
            al.parse2("test@example.com John Doe <john@doe.org>").unwrap(),
            1
        );
        let a = al.first().unwrap();
        assert_eq!(a.personal(), Some("test@example.com John Doe"));
        assert_eq!(a.mailbox(), Some("john@doe.org"));
    }

    #[test]
    fn test_from_str() {
        let al: AddressList = "a@b.c, d@e.f".parse().unwrap();
        assert_eq!(al.len(), 2);
        assert!("\"unterminated".parse::<AddressList>().is_err());
    }

    #[test]
    fn test_parse_quoted_local_part() {
        let (n, al) = parse("\"john doe\"@x.com, Jo <\"j \\\"q\\\"\"@y.org>");
        assert_eq!(n, 2);
        assert_eq!(al.get(0).unwrap().mailbox(), Some("\"john doe\"@x.com"));
        assert_eq!(al.get(1).unwrap().mailbox(), Some("\"j \\\"q\\\"\"@y.org"));
        assert_eq!(al.write(false), "\"john doe\"@x.com, Jo <\"j \\\"q\\\"\"@y.org>");
    }

    #[test]
    fn test_parse_unicode_personal() {
        let (_, al) = parse("Jürgen Müller <jm@example.de>");
        assert_eq!(al.first().unwrap().personal(), Some("Jürgen Müller"));
    }

    #[test]
    fn test_parse_multiple_groups() {
        let (n, al) = parse("a: x@y.z;, b: ;, c@d.e");
        assert_eq!(n, 2);
        assert!(al.get(0).unwrap().is_group_marker());
        assert!(al.get(2).unwrap().is_group_end());
        assert!(al.get(3).unwrap().is_group_marker());
        assert!(al.get(4).unwrap().is_group_end());
        assert_eq!(al.get(5).unwrap().mailbox(), Some("c@d.e"));
    }
}
