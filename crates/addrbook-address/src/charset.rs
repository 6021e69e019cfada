//! Strict charset conversion.
//!
//! Address text is handled as UTF-8 internally. Files written in another
//! charset are converted at the edges with [`Charset`].

use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// A character encoding, resolved from a WHATWG label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    /// UTF-8.
    pub const UTF_8: Self = Self {
        encoding: encoding_rs::UTF_8,
    };

    /// Resolves a charset label such as `"utf-8"` or `"iso-8859-1"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCharset`] if the label is not recognised.
    pub fn from_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| Error::UnknownCharset(label.to_string()))
    }

    /// Returns the canonical name of the charset.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Returns true for UTF-8.
    #[must_use]
    pub fn is_utf8(&self) -> bool {
        self.encoding == encoding_rs::UTF_8
    }

    /// Encodes text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Charset`] if any character cannot be represented.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(Error::Charset(format!(
                "text cannot be represented in {}",
                self.name()
            )));
        }
        Ok(bytes.into_owned())
    }

    /// Decodes bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Charset`] if the bytes are malformed.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
            .ok_or_else(|| Error::Charset(format!("malformed {} input", self.name())))
    }

    /// Converts bytes from one charset to another.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Charset`] if the input is malformed or cannot be
    /// represented in `to`.
    pub fn recode(bytes: &[u8], from: Self, to: Self) -> Result<Vec<u8>> {
        if from == to {
            return Ok(bytes.to_vec());
        }
        to.encode(&from.decode(bytes)?)
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::UTF_8
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert!(Charset::from_label("UTF-8").unwrap().is_utf8());
        assert_eq!(Charset::from_label(" latin1 ").unwrap().name(), "windows-1252");
        assert_eq!(
            Charset::from_label("klingon").unwrap_err(),
            Error::UnknownCharset("klingon".into())
        );
    }

    #[test]
    fn test_encode_decode() {
        let latin1 = Charset::from_label("iso-8859-1").unwrap();
        let bytes = latin1.encode("Müller").unwrap();
        assert_eq!(bytes, b"M\xfcller");
        assert_eq!(latin1.decode(&bytes).unwrap(), "Müller");
    }

    #[test]
    fn test_encode_unmappable() {
        let latin1 = Charset::from_label("iso-8859-1").unwrap();
        assert!(matches!(latin1.encode("日本"), Err(Error::Charset(_))));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(Charset::UTF_8.decode(b"\xff\xfe"), Err(Error::Charset(_))));
    }

    #[test]
    fn test_recode() {
        let latin1 = Charset::from_label("iso-8859-1").unwrap();
        let utf8 = Charset::recode(b"M\xfcller", latin1, Charset::UTF_8).unwrap();
        assert_eq!(utf8, "Müller".as_bytes());
        let same = Charset::recode(b"abc", latin1, latin1).unwrap();
        assert_eq!(same, b"abc");
    }
}
