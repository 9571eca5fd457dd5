//! OAuth credential state.

pub mod credential;

pub use credential::Credential;
