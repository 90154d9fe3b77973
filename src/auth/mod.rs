//! Authentication module for session tokens and credentials.
//!
//! This module provides:
//! - `TokenManager`: the persisted session token store (access + refresh
//!   tokens with millisecond expiry timestamps)
//! - `SessionBootstrapper`: the one-shot startup check that decides between
//!   a valid session, a silent refresh, a forced re-login, or offline
//! - `CredentialStore`: secure OS-level credential storage via keyring
//!
//! Access tokens expire 5 hours after save, refresh tokens after 30 days.

pub mod bootstrap;
pub mod credentials;
pub mod store;

pub use bootstrap::{
    BootstrapOutcome, ConnectivityProbe, RefreshTokens, SessionBootstrapper, TcpProbe, TokenPair,
};
pub use credentials::CredentialStore;
pub use store::{SessionData, TokenManager};
