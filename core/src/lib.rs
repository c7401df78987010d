//! Two-ring wheel engine: weighted draws, landing geometry and settlement.

pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod resolver;
pub mod reveal;
pub mod ring;
pub mod rng;
pub mod selector;
pub mod settlement;
pub mod stats;
pub mod store;
pub mod table;
pub mod types;
pub mod wallet;
