pub mod config;
pub mod env;
pub mod error;
pub mod names;
pub mod secret;
pub mod template;

pub use config::StackConfig;
pub use env::Env;
pub use error::ConfigError;
pub use names::StackNames;
pub use secret::SecretRef;
pub use template::Template;
