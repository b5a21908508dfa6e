//! Promptforge Storage Library
//!
//! Object-storage abstraction for submission file blobs. The pipeline only
//! depends on the `Storage` trait; the local filesystem backend serves
//! development and tests, and production deployments can plug in a remote
//! backend behind the same trait.
//!
//! # Storage key format
//!
//! All backends use `prompt-files/{unix_millis}-{filename}`. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the `keys`
//! module so all backends stay consistent.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::generate_storage_key;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
