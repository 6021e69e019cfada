//! # addrbook-address
//!
//! Email address handling for a mail client: parsing header text into
//! address lists, writing them back, list algebra and IDN conversion.
//!
//! ## Features
//!
//! - **Parsing**: lenient RFC 5322 parser with quoted names, comments,
//!   route addresses and group syntax
//! - **Writing**: single-line, folded header and per-entry output
//! - **List algebra**: copy, dedupe, equality, search, removal, qualification
//! - **IDN**: Punycode conversion of domains, with a reversibility check
//! - **Charsets**: strict conversion through `encoding_rs`
//!
//! ## Quick Start
//!
//! ```ignore
//! use addrbook_address::{AddressList, IdnOptions};
//!
//! let mut list: AddressList = "John Doe <john@doe.org>, team: a@x.com, b@x.com;".parse()?;
//! assert_eq!(list.count_recips(), 3);
//!
//! list.qualify("example.com");
//! list.to_intl(IdnOptions::default()).ok();
//! println!("{}", list.write_wrap("To", 74));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod error;
mod list;
mod parse;
mod write;

pub mod charset;
pub mod idn;

pub use address::{ADDRESS_SPECIALS, Address, addr_cat, is_email_wsp, is_special, uses_unicode};
pub use charset::Charset;
pub use error::{Error, ParseError, Result};
pub use idn::IdnOptions;
pub use list::AddressList;
pub use write::DEFAULT_WRAP_COLUMNS;
