//! In-memory collaborators
//!
//! Reference implementations of every collaborator trait. Each is a cheap
//! `Clone` handle over shared state, so a host (or a test) can keep one
//! handle while the engine owns another.

mod collaborators;
mod world;
mod zones;

pub use collaborators::{
    DomeRecord, MemoryBots, MemoryDomes, MemoryExclusion, MemoryListeners, MemoryMapping, RecordingObserver,
};
pub use world::MemoryWorld;
pub use zones::{MemoryZoneProvider, ZoneTransition};
