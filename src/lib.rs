//! Flash-FileMap: a persistent key-value map backed by a single flat file.
//!
//! The whole dataset is written once as a snapshot and then served through
//! an in-memory offset index. Replacing the dataset builds a brand new file
//! next to the live one and atomically renames it into place, so concurrent
//! readers always see either the old snapshot or the new one, never a mix.
//!
//! # File Layout
//!
//! ```text
//! [header: version | data_offset | index_offset] (24 bytes, big-endian)
//! [record_0] ... [record_n-1]                    (codec-encoded values)
//! [index block]                                  (codec-encoded (key, offset) pairs)
//! ```
//!
//! # Basic Usage
//!
//! ```
//! use std::collections::HashMap;
//!
//! use flash_filemap::{errors::Errors, FileMap};
//!
//! let dir = std::env::temp_dir().join("flash-filemap-doc");
//! std::fs::create_dir_all(&dir).expect("failed to create dir");
//! let path = dir.join("fruits");
//!
//! let mut data = HashMap::new();
//! data.insert("apple".to_string(), 1u32);
//! data.insert("banana".to_string(), 2u32);
//!
//! let fm = FileMap::create(&path, Some(&data)).expect("failed to create file map");
//! assert_eq!(fm.lookup("banana").expect("failed to lookup"), 2);
//! assert!(matches!(fm.lookup("cherry"), Err(Errors::KeyNotFound)));
//!
//! // swap the whole dataset
//! let mut next = HashMap::new();
//! next.insert("cherry".to_string(), 3u32);
//! fm.update(Some(&next)).expect("failed to update");
//! assert!(matches!(fm.lookup("apple"), Err(Errors::KeyNotFound)));
//!
//! fm.close().expect("failed to close");
//! std::fs::remove_dir_all(&dir).expect("failed to remove dir");
//! ```

mod filemap;
mod index;
mod lookup;
mod update;

pub mod codec;
pub mod data;
pub mod errors;
pub mod option;
pub mod util;

pub use filemap::FileMap;
