//! # Event and Particle Ledgers
//!
//! Typed record values and the tables they are written to.
//!
//! | Ledger | Value | Table |
//! |--------|-------|-------|
//! | [`EventLedger`] | [`EventRecord`] | `events` |
//! | [`ParticleLedger`] | [`ParticleRecord`] | `particles` |
//! | [`RunLedger`] | [`RunRecord`] | `runs` (merged bundles only) |
//!
//! Values are plain owned structs. A [`RecordLayout`] resolves every field
//! binding once at construction and serializes values into the table's
//! little-endian row layout at write time.

mod layout;
mod ledger_impl;
mod records;

#[cfg(test)]
mod tests;

pub use layout::{EventFields, KinematicsFields, ParticleFields, RecordLayout, RunFields};
pub use ledger_impl::{EventLedger, Ledger, ParticleLedger, RunLedger};
pub use records::{EventRecord, Kinematics, ParticleName, ParticleRecord, RunRecord};
