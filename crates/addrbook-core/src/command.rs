//! Configuration command lines.
//!
//! A line holds one or more commands separated by `;`. Words are split on
//! whitespace, may be quoted with `'` or `"`, and may contain backslash
//! escapes. An unquoted `#` starts a comment.

use thiserror::Error;

/// Failure of one configuration command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command was ignored, but the rest of the file is fine.
    #[error("{0}")]
    Warning(String),

    /// The command failed.
    #[error("{0}")]
    Error(String),
}

impl CommandError {
    /// Creates a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    /// Creates an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Warning(m) | Self::Error(m) => m,
        }
    }

    /// Returns true for warnings.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }
}

impl From<crate::Error> for CommandError {
    fn from(e: crate::Error) -> Self {
        Self::Error(e.to_string())
    }
}

/// How a token ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenFlags {
    spaces: bool,
    quotes: bool,
    semicolons: bool,
}

impl TokenFlags {
    /// A plain word: ends at whitespace or `;`, quotes are removed.
    pub const WORD: Self = Self {
        spaces: false,
        quotes: false,
        semicolons: false,
    };

    /// An address list: runs to the end of the command, keeping
    /// whitespace, quotes and semicolons for the address parser.
    pub const ADDRESS: Self = Self {
        spaces: true,
        quotes: true,
        semicolons: true,
    };
}

/// Splits a configuration line into words.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned at the start of `line`.
    #[must_use]
    pub fn new(line: &'a str) -> Self {
        let mut tok = Self { line, pos: 0 };
        tok.skip_wsp();
        tok
    }

    /// Returns the unread part of the line.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Returns true if the current command has another argument.
    #[must_use]
    pub fn more_args(&self) -> bool {
        self.peek().is_some_and(|c| c != ';' && c != '#')
    }

    /// Returns true at the end of the line or at a comment.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.peek().is_none_or(|c| c == '#')
    }

    /// Consumes a `;` separating two commands. Returns false if there
    /// is none.
    pub fn next_command(&mut self) -> bool {
        if self.peek() != Some(';') {
            return false;
        }
        self.pos += 1;
        self.skip_wsp();
        true
    }

    /// Consumes a trailing comment, returning its text without the `#`
    /// and one following space.
    pub fn comment(&mut self) -> Option<&'a str> {
        if self.peek() != Some('#') {
            return None;
        }
        let mut text = &self.line[self.pos + 1..];
        if let Some(stripped) = text.strip_prefix(' ') {
            text = stripped;
        }
        self.pos = self.line.len();
        Some(text)
    }

    /// Reads the next token.
    pub fn next_token(&mut self, flags: TokenFlags) -> String {
        let mut out = String::new();
        let mut quote: Option<char> = None;
        let mut chars = self.rest().char_indices();

        let mut consumed = self.line.len() - self.pos;
        while let Some((i, c)) = chars.next() {
            let ends = (c.is_whitespace() && !flags.spaces)
                || (c == ';' && !flags.semicolons)
                || c == '#';
            if quote.is_none() && ends {
                consumed = i;
                break;
            }

            if Some(c) == quote {
                quote = None;
                if flags.quotes {
                    out.push(c);
                }
            } else if quote.is_none() && (c == '\'' || c == '"') {
                quote = Some(c);
                if flags.quotes {
                    out.push(c);
                }
            } else if c == '\\' && quote != Some('\'') {
                match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, 'e' | 'E')) => out.push('\x1b'),
                    Some((_, escaped)) => out.push(escaped),
                    None => out.push('\\'),
                }
            } else {
                out.push(c);
            }
        }

        self.pos += consumed;
        self.skip_wsp();
        out
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_wsp(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }
}

/// Joins lines ending in a backslash with the line that follows.
///
/// Returns each logical line with the number of its first physical line.
pub fn logical_lines<I, S>(lines: I) -> Vec<(usize, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let (start, mut text) = pending.take().unwrap_or((index + 1, String::new()));
        match line.strip_suffix('\\') {
            Some(head) if !head.ends_with('\\') => {
                text.push_str(head);
                pending = Some((start, text));
            }
            _ => {
                text.push_str(line);
                out.push((start, text));
            }
        }
    }

    out.extend(pending);
    out
}
