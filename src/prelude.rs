//! Convenience re-exports for common use.

pub use crate::auth::Credential;
pub use crate::config::ConsumerConfig;
pub use crate::error::{CredentialError, Result};
