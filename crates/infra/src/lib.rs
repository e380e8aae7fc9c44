//! Infrastructure layer: config, storage, background workers.

pub mod config;
pub mod store;
pub mod workers;


pub use config::{AppConfig, ConfigError};
pub use store::Stores;
pub use workers::{ListenerWorker, WorkerHandle};
