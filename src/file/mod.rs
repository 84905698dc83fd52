//! # File Objects
//!
//! A [`FileObject`] exposes a [`FileAccess`] resource through the property
//! store. Derived properties are recomputed from the resource on each read.
//! Writes to `fileSize` and `recordCount` are validated by the resource and
//! pushed back to it.
//!
//! | Property | Source | Writable |
//! |----------|--------|----------|
//! | `fileType` | construction | yes |
//! | `fileAccessMethod` | [`FileAccess::access_method`] | no |
//! | `fileSize` | [`FileAccess::length`] | yes, via [`FileAccess::write_file_size`] |
//! | `modificationDate` | [`FileAccess::last_modified`] | no |
//! | `readOnly` | `!`[`FileAccess::can_write`] | no |
//! | `recordCount` | [`FileAccess::record_count`], record access only | yes, record access only |
//! | `archive` | stored | yes |
//!
//! Multi-step services run in an [`AtomicSession`], which holds the object's
//! lock until dropped.

mod access;
mod atomic;
mod object;

pub use access::FileAccess;
pub use atomic::{APPEND, AtomicSession, RecordReadResult, StreamReadResult};
pub use object::FileObject;
