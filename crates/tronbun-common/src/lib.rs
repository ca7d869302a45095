pub mod errors;

pub use errors::{ConfigError, PlatformError, TronbunError};

pub type Result<T> = std::result::Result<T, TronbunError>;
