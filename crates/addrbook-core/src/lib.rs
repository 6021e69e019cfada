//! # addrbook-core
//!
//! Alias resolution and address classification for the `addrbook` mail
//! tools.
//!
//! This crate provides:
//! - **Aliases** - Named address lists with recursive, cycle-safe expansion
//! - **Groups** - Named sets of addresses and patterns for classification
//! - **Alternates & Mailing Lists** - Recognising the user's own addresses
//!   and list addresses
//! - **Configuration Commands** - `alias`, `group`, `lists` and friends,
//!   read from configuration files
//! - **Identity** - Real names of local users from the password database
//!
//! ## Quick Start
//!
//! ```ignore
//! use addrbook_core::{AddressBook, Config, PasswdFile};
//!
//! let mut book = AddressBook::new(Config::default(), Box::new(PasswdFile::system()?))?;
//! book.execute("alias work alice@co.com, bob@co.com")?;
//!
//! let mut to = "work, carol@else.org".parse()?;
//! book.expand(&mut to);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod alias;
pub mod alternates;
mod book;
pub mod command;
pub mod config;
mod envelope;
mod error;
pub mod group;
pub mod identity;
pub mod maillist;
pub mod regex_list;

pub use alias::{Alias, AliasEvent, AliasFile, AliasRegistry, Expander};
pub use alternates::Alternates;
pub use book::AddressBook;
pub use command::CommandError;
pub use config::Config;
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use group::{Group, GroupList, GroupRegistry};
pub use identity::{Identity, PasswdFile, StaticDirectory, UserDirectory, UserEntry};
pub use maillist::MailingLists;
pub use regex_list::{Pattern, RegexList};
