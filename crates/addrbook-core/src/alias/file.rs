//! Alias file persistence.
//!
//! New aliases are appended to a file of configuration commands, one line
//! each:
//!
//! ```text
//! alias NAME ADDRESSES[ # COMMENT][ tags:A,B]
//! ```

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use addrbook_address::Charset;
use tracing::info;

use super::model::Alias;
use crate::error::Result;

/// Characters allowed in alias names besides alphanumerics.
const NAME_PUNCTUATION: &str = "-_+=.";

/// Characters escaped when writing addresses to an alias file.
const SHELL_SPECIALS: &str = "\\`'\"$#";

/// Checks that an alias name only uses characters that are safe both in
/// address text and in configuration files.
///
/// # Errors
///
/// Returns a corrected name, with each offending character replaced by
/// `_`, if the name is not safe.
pub fn check_alias_name(name: &str) -> std::result::Result<(), String> {
    let is_ok = |c: char| c.is_alphanumeric() || NAME_PUNCTUATION.contains(c);
    if name.chars().all(is_ok) {
        return Ok(());
    }
    Err(name.chars().map(|c| if is_ok(c) { c } else { '_' }).collect())
}

/// Wraps text in single quotes for a configuration file.
#[must_use]
pub fn quote_filename(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Backslash-escapes characters that the configuration parser or a shell
/// would interpret, including the `#` that starts a comment.
#[must_use]
pub fn write_safe_address(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if SHELL_SPECIALS.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Formats the file line for `alias`, without the trailing newline.
#[must_use]
pub fn alias_line(alias: &Alias) -> String {
    let name = match check_alias_name(alias.name()) {
        Ok(()) => alias.name().to_string(),
        Err(_) => quote_filename(alias.name()),
    };

    let mut line = format!(
        "alias {name} {}",
        write_safe_address(&alias.addresses().write(false))
    );

    let has_tags = !alias.tags().is_empty();
    if alias.comment().is_some() || has_tags {
        line.push_str(" #");
    }
    if let Some(comment) = alias.comment() {
        line.push(' ');
        line.push_str(comment);
    }
    if has_tags {
        line.push_str(" tags:");
        line.push_str(&alias.tags_string());
    }
    line
}

/// A file of alias commands in a given charset.
#[derive(Debug, Clone)]
pub struct AliasFile {
    path: PathBuf,
    charset: Charset,
}

impl AliasFile {
    /// Creates a handle for the file at `path`, stored as UTF-8.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            charset: Charset::UTF_8,
        }
    }

    /// Stores the file in `charset` instead of UTF-8.
    #[must_use]
    pub const fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid in the
    /// file's charset.
    pub fn read(&self) -> Result<String> {
        let bytes = std::fs::read(&self.path)?;
        Ok(self.charset.decode(&bytes)?)
    }

    /// Appends `alias` as a new line.
    ///
    /// A newline is added first if the file does not already end with one.
    /// The file is synced to disk before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be represented in the file's
    /// charset, or on I/O failure.
    pub fn append(&self, alias: &Alias) -> Result<()> {
        let mut line = alias_line(alias);
        line.push('\n');
        let bytes = self.charset.encode(&line)?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let len = file.seek(SeekFrom::End(0))?;
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }

        file.write_all(&bytes)?;
        file.sync_all()?;

        info!("alias '{}' added to {}", alias.name(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn alias(name: &str, addresses: &str) -> Alias {
        Alias::new(name, addresses.parse().unwrap())
    }

    #[test]
    fn test_check_alias_name() {
        assert!(check_alias_name("john.doe-2+x=y_z").is_ok());
        assert!(check_alias_name("jürgen").is_ok());
        assert_eq!(check_alias_name("john doe").unwrap_err(), "john_doe");
        assert_eq!(check_alias_name("a@b:c").unwrap_err(), "a_b_c");
    }

    #[test]
    fn test_quote_filename() {
        assert_eq!(quote_filename("plain"), "'plain'");
        assert_eq!(quote_filename("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_write_safe_address() {
        assert_eq!(
            write_safe_address(r#""Bob $HOME" <b`o'b@x.com>"#),
            r#"\"Bob \$HOME\" <b\`o\'b@x.com>"#
        );
    }

    #[test]
    fn test_write_safe_address_hash() {
        assert_eq!(write_safe_address("Bob #1 <bob@x.org>"), r"Bob \#1 <bob@x.org>");
    }

    #[test]
    fn test_alias_line_plain() {
        assert_eq!(
            alias_line(&alias("work", "alice@co.com, bob@co.com")),
            "alias work alice@co.com, bob@co.com"
        );
    }

    #[test]
    fn test_alias_line_comment_and_tags() {
        let a = alias("jd", "John Doe <john@doe.org>")
            .with_comment("old friend")
            .with_tags(["school", "pals"]);
        assert_eq!(
            alias_line(&a),
            "alias jd John Doe <john@doe.org> # old friend tags:school,pals"
        );

        let tags_only = alias("jd", "john@doe.org").with_tags(["x"]);
        assert_eq!(alias_line(&tags_only), "alias jd john@doe.org # tags:x");
    }

    #[test]
    fn test_alias_line_quotes_bad_name() {
        let a = alias("john doe", "\"Doe, John\" <john@doe.org>");
        assert_eq!(
            alias_line(&a),
            r#"alias 'john doe' \"Doe, John\" <john@doe.org>"#
        );
    }

    #[test]
    fn test_append_adds_missing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases");
        std::fs::write(&path, "alias a a@b.c").unwrap();

        let file = AliasFile::new(&path);
        file.append(&alias("work", "alice@co.com")).unwrap();
        file.append(&alias("home", "me@home.org")).unwrap();

        assert_eq!(
            file.read().unwrap(),
            "alias a a@b.c\nalias work alice@co.com\nalias home me@home.org\n"
        );
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = AliasFile::new(dir.path().join("new-aliases"));
        file.append(&alias("x", "x@y.com")).unwrap();
        assert_eq!(file.read().unwrap(), "alias x x@y.com\n");
    }

    #[test]
    fn test_append_in_charset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases");
        let latin1 = Charset::from_label("iso-8859-1").unwrap();
        let file = AliasFile::new(&path).with_charset(latin1);

        file.append(&alias("jm", "Jürgen Müller <jm@example.de>")).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert!(raw.contains(&0xfc));
        assert_eq!(file.read().unwrap(), "alias jm Jürgen Müller <jm@example.de>\n");
    }

    #[test]
    fn test_append_unrepresentable() {
        let dir = tempfile::tempdir().unwrap();
        let latin1 = Charset::from_label("iso-8859-1").unwrap();
        let file = AliasFile::new(dir.path().join("aliases")).with_charset(latin1);
        assert!(file.append(&alias("jp", "日本 <jp@example.jp>")).is_err());
    }
}
