pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{resolve_config, ConfigSource, ResolvedConfig};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{wire, AppServices, WiringError};
