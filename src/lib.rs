pub mod cli;
pub mod config;
pub mod executor;
pub mod fetch;
pub mod lookup;
pub mod model;
pub mod traits;

// Re-export common types for convenience
pub use config::{ConfigError, LookupConfig};
pub use executor::*;
pub use fetch::HttpFetcher;
pub use lookup::{Backend, LookupPipeline, LookupResult};
pub use model::*;
pub use traits::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
