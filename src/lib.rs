//! A small text-file store.
//!
//! [`FileStore`] owns one path and offers create, read, update and delete on
//! it. Updates rewrite the file line by line into a temporary sibling and
//! rename it into place, so a failed update never damages the original.

pub mod builders;
pub mod core;
pub mod utils;


pub use crate::core::error::{Result, StoreError};
pub use crate::core::store::{FileStore, Lines, UpdateSummary};
