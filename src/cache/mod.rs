//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! divvy data locally. Data is cached as JSON with a written-at timestamp;
//! read paths apply a per-entity staleness threshold (user profiles 24h,
//! the category catalog 7d, groups and transactions 60m) to decide whether
//! to trust the cache or refetch.

pub mod manager;

pub use manager::{CachedData, CacheManager};
