// Infrastructure layer modules
pub mod entity_validator;
pub mod http_client;
pub mod logging;
pub mod sample_ops;
pub mod validator_config;

// Re-exports
pub use entity_validator::{EntityValidator, EntityValidatorError, HealthLakeEntityValidator};
pub use http_client::{
    FUNCTION_TIMEOUT_SECS, HttpClient, HttpClientError, new_http_client, new_http_client_with_retries,
};
pub use logging::init_logging;
pub use sample_ops::{SampleOps, TracingSampleOps};
pub use validator_config::{
    DEFAULT_REGION, ValidatorConfig, ValidatorConfigError, default_credentials_provider,
};
