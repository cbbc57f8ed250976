pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod logging;
pub mod sql;

pub use config::{AppConfig, LoaderConfig, LoggingConfig};
pub use context::AppContext;
pub use error::{LoaderError, StatementError};
pub use sql::{FsStore, MemoryStore, QueryLoader, ResourceStore, Verb};
