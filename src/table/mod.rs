//! # Buffered Record Tables
//!
//! A [`RecordTable`] turns single-record writes into batched backend calls.
//!
//! ```text
//! scratch ──write()──► batch [capacity × record_size] ──flush()──► StorageBackend
//!                                                    first flush: create_table
//!                                                    later:       append_rows
//! ```
//!
//! Batching is a pure performance knob: for any write sequence the backend ends
//! up with the same rows whatever the capacity. The final [`RecordTable::flush`]
//! (or [`RecordTable::close`]) is mandatory; buffered rows are not written on drop.

mod config;
mod error;
mod stats;
mod table_impl;

#[cfg(test)]
mod tests;

pub use config::{TableConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_PARTICLE_CAPACITY};
pub use error::TableError;
pub use stats::TableStats;
pub use table_impl::RecordTable;
