//! Account storage.
//!
//! - `entry`: entry record and wire format
//! - `account`: account record, encrypted layout, entry ordering
//! - `store`: account directory, filenames, create/load/save/delete

pub mod account;
pub mod entry;
pub mod store;

pub use account::{Account, MAX_ENTRIES, MAX_USERNAME_BYTES};
pub use entry::{Entry, MAX_ENTRY_BYTES, MAX_TITLE_BYTES};
pub use store::{sanitize_filename, AccountStore};
