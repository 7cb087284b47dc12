//! High-level model wrappers.
//!
//! - [`FMModel`]: Posterior-mean prediction over sampled factorization machines
//! - [`FMConfig`]: Construction and initialization settings
//! - [`ModelMeta`] / [`TaskKind`]: Model metadata

mod config;
mod fm;
mod meta;

pub use config::{ConfigError, FMConfig, FMConfigBuilder};
pub use fm::FMModel;
pub use meta::{ModelMeta, TaskKind};
