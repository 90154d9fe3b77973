//! Observable state of one remote call.
//!
//! Screens hold a `NetworkResult<T>` per call they observe. Exactly one
//! variant is active at a time; the legal transitions are
//! Idle -> Loading -> Success | Error, with any terminal state moving
//! back to Loading when the user retries.

use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum NetworkResult<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> NetworkResult<T> {
    /// Move to Loading. Valid from every state; a retry re-triggers
    /// a terminal state back into Loading.
    pub fn begin(&mut self) {
        *self = NetworkResult::Loading;
    }

    /// Land a finished call: Success with the data, or Error carrying the
    /// failure's user-facing message.
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => NetworkResult::Success(data),
            Err(e) => NetworkResult::Error(e.user_message()),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, NetworkResult::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, NetworkResult::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NetworkResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, NetworkResult::Error(_))
    }

    /// The data if the call succeeded
    pub fn data(&self) -> Option<&T> {
        match self {
            NetworkResult::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The error message if the call failed
    pub fn error(&self) -> Option<&str> {
        match self {
            NetworkResult::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NetworkResult<U> {
        match self {
            NetworkResult::Idle => NetworkResult::Idle,
            NetworkResult::Loading => NetworkResult::Loading,
            NetworkResult::Success(data) => NetworkResult::Success(f(data)),
            NetworkResult::Error(msg) => NetworkResult::Error(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let result: NetworkResult<i32> = NetworkResult::default();
        assert!(result.is_idle());
    }

    #[test]
    fn test_transitions_idle_loading_success() {
        let mut result: NetworkResult<i32> = NetworkResult::default();
        result.begin();
        assert!(result.is_loading());
        result = NetworkResult::from_result(Ok(42));
        assert!(result.is_success());
        assert_eq!(result.data(), Some(&42));
    }

    #[test]
    fn test_error_carries_user_message() {
        let result: NetworkResult<i32> =
            NetworkResult::from_result(Err(ApiError::ConnectionFailed));
        assert!(result.is_error());
        assert_eq!(
            result.error(),
            Some("Could not reach the server. Check your connection and try again.")
        );
    }

    #[test]
    fn test_retry_moves_error_back_to_loading() {
        let mut result: NetworkResult<i32> = NetworkResult::Error("boom".into());
        result.begin();
        assert!(result.is_loading());
    }

    #[test]
    fn test_map_preserves_state() {
        let success = NetworkResult::Success(2).map(|n| n * 2);
        assert_eq!(success.data(), Some(&4));

        let err: NetworkResult<i32> = NetworkResult::Error("boom".into());
        let mapped: NetworkResult<String> = err.map(|n| n.to_string());
        assert_eq!(mapped.error(), Some("boom"));
    }
}
