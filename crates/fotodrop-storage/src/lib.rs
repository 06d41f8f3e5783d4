//! Fotodrop Storage Library
//!
//! Remote storage abstraction for delivery folders: the `Storage` trait and
//! its Google Drive and local-filesystem implementations.
//!
//! A delivery folder is a provider container named after the model id. The
//! uploader creates it, makes it world-readable, and drops every local asset
//! into it as an individual object. Nothing here ever deletes a folder.

pub mod factory;
#[cfg(feature = "storage-drive")]
pub mod drive;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-drive")]
pub use drive::DriveStorage;
pub use factory::create_storage;
pub use fotodrop_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{content_type_for, RemoteFolder, Storage, StorageError, StorageResult};
