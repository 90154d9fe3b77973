//! Divvy core - the offline-capable heart of a bill-splitting client.
//!
//! This crate contains everything below the UI: session and token
//! management, the authenticated REST API client, local JSON caching of
//! remote entities, and the domain models for groups, transactions,
//! categories and debt summaries.
//!
//! The backend origin is discovered out-of-band and persisted in [`Config`];
//! it is resolved once at startup and injected into [`ApiClient`] as a
//! value. Tokens live in a single shared [`TokenManager`] which every
//! component borrows - nothing re-reads the underlying store through its
//! own private handle.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod repo;

pub use api::{ApiClient, ApiError, NetworkResult};
pub use auth::{
    BootstrapOutcome, ConnectivityProbe, CredentialStore, RefreshTokens, SessionBootstrapper,
    TcpProbe, TokenManager,
};
pub use cache::{CacheManager, CachedData};
pub use config::Config;
pub use repo::Repository;
