//! # oceanwatch
//!
//! Deterministic ocean sensor simulation with anomaly and critical-level
//! alerting.
//!
//! Three readings (temperature, dissolved oxygen, salinity) follow a bounded
//! random walk with occasional spikes; pH only changes by manual override.
//! After every tick two independent rules run:
//! - Anomaly: the reading moved more than its threshold since the last tick
//! - Critical: the reading is outside its safe range
//!
//! Everything is reproducible: the random walk is driven by an explicitly
//! seeded PCG generator and time is injected, never read from a global.
//!
//! ## Example
//!
//! ```rust
//! use oceanwatch::prelude::*;
//!
//! let config = MonitorConfig::builder().seed(42).build();
//! let mut engine = MonitorEngine::new(config).expect("valid config");
//!
//! let updates = engine.run(10);
//! assert_eq!(engine.tick_count(), 10);
//! for alert in updates.iter().flat_map(|u| &u.alerts) {
//!     println!("{alert}");
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::must_use_candidate,
)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod journal;
pub mod logging;
pub mod monitor;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{MonitorConfig, MonitorConfigBuilder};
    pub use crate::dashboard::{DashboardState, OverrideForm};
    pub use crate::engine::rng::SimRng;
    pub use crate::engine::{
        advance_tick, EngineUpdate, MonitorEngine, SensorField, SensorReadings, SensorState,
        SimTime, UpdateOrigin,
    };
    pub use crate::error::{MonitorError, MonitorResult};
    pub use crate::journal::{JournalBoard, JournalEntry, JournalError};
    pub use crate::monitor::{Alert, AlertKind, AlertRules, RandomWalk};
}

/// Re-export for public API
pub use error::{MonitorError, MonitorResult};
