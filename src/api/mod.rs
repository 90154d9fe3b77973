//! REST API client module for the divvy backend.
//!
//! This module provides the `ApiClient` for talking to the bill-splitting
//! API (auth, groups, transactions, categories, debt summaries), the
//! normalized `ApiError` type, and the `NetworkResult` call-state wrapper
//! that presentation layers observe.
//!
//! The API uses JWT bearer token authentication; tokens are minted by
//! `/auth/login` and renewed through `/auth/refreshToken`.

pub mod client;
pub mod error;
pub mod result;

pub use client::ApiClient;
pub use error::ApiError;
pub use result::NetworkResult;
