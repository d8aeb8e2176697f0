//! Archive storage for the update server.
//!
//! A flat directory of extension archives behind the [`Storage`] trait, plus the scan
//! that turns it into a [`crxup_core::Catalog`].

pub mod catalog;
pub mod factory;
pub mod local;
pub mod traits;

pub use catalog::{list_artifacts, load_catalog};
pub use factory::create_storage;
pub use local::{read_filenames, LocalStorage};
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
