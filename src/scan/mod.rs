//! Entry filtering for the recursive walk.

pub mod filter;

pub use filter::{relative_path, EntryFilter, DEFAULT_SOURCE_EXTENSIONS, SKIPPED_DIRS};
