//! Aliases: short names for address lists.
//!
//! This module provides:
//! - **Registry**: defined aliases with change notifications and a
//!   mailbox to alias index
//! - **Expansion**: recursive, cycle-safe substitution of alias names in
//!   address lists
//! - **Persistence**: the alias file line format and appending new aliases
//!
//! # Example
//!
//! ```ignore
//! use addrbook_core::alias::{Alias, AliasRegistry, Expander};
//!
//! let mut aliases = AliasRegistry::new();
//! aliases.create(Alias::new("work", "alice@co.com, bob@co.com".parse()?))?;
//!
//! let mut to = "work, carol@else.org".parse()?;
//! Expander::new(&aliases).expand(&mut to);
//! assert_eq!(to.count_recips(), 3);
//! ```

mod expand;
mod file;
mod model;
mod registry;
mod reverse;

pub use expand::Expander;
pub use file::{AliasFile, alias_line, check_alias_name, quote_filename, write_safe_address};
pub use model::{Alias, parse_tags};
pub use registry::{AliasEvent, AliasRegistry};
