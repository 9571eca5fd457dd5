//! oauth-credential — OAuth consumer and session token state.
//!
//! Holds the consumer key/secret issued to a client application together
//! with the request, access and refresh tokens an authorization flow hands
//! back, and answers whether the access token has expired. Flows, signing
//! and token storage are left to the surrounding client.
//!
//! # Quick Start
//!
//! ```
//! use oauth_credential::prelude::{Credential, CredentialError};
//!
//! let mut credential = Credential::new("key123", "secret456");
//! credential.set_request_token("rtok", "rtoksecret");
//! credential.access_token = Some("access".to_string());
//! credential.set_expires_in(3600)?;
//! assert!(!credential.is_expired());
//! # Ok::<(), CredentialError>(())
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod prelude;
