//! Address groups used for classification.
//!
//! A group combines exact addresses and patterns. Groups are created on
//! first use and disappear once both parts are empty.

mod model;
mod registry;

pub use model::Group;
pub use registry::{GroupList, GroupRegistry};
