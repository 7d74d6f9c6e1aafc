#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// The djb2 digest used to place keys into buckets.
pub mod digest;

/// A typed key-value map over the byte-keyed hash table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and accepts
/// any key type that can expose its raw bytes via the `Key` trait.
pub mod hash_map;

/// The core open-addressing hash table keyed by raw bytes.
pub mod hash_table;

pub use hash_map::HashMap;
pub use hash_map::Key;
pub use hash_table::HashTable;
