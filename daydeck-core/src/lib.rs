//! Core types and persistence for the daydeck dashboard.
//!
//! This crate provides everything the CLI shares across commands:
//! - `Task` and `Layout` types with their JSON wire shapes
//! - `SyncEnvelope`, the payload exchanged with the remote store
//! - `LocalStore` for durable on-disk state and the unlock marker
//! - `Dashboard`, the single owner of mutable dashboard state
//! - `Deck` / `DeckConfig` for the global configuration file

pub mod deck;
pub mod deck_config;
pub mod envelope;
pub mod error;
pub mod layout;
pub mod state;
pub mod store;
pub mod task;

pub use envelope::SyncEnvelope;
pub use layout::{Layout, SectionId, Slot};
pub use task::{Task, TaskKind};
