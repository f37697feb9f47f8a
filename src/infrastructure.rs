// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod summary_client;

// Re-exports
pub use config::{ConfigError, EnvSecretSource, SecretSource, Secrets};
pub use logging::init_logging;
pub use summary_client::{FlowSummaryClient, PrepareError, SummaryPreparer};
