//! Storage layer for FinBook
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. The whole entity store persists as one JSON document; this
//! module only knows how to move JSON safely to and from disk.

pub mod file_io;

pub use file_io::{read_json, read_json_required, write_json_atomic};
