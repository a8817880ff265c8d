//! Testing helpers and mock utilities.
//!
//! Convenient constructors for mocked generative backends used by unit
//! tests across the crate.

use crate::llm::{BackendError, MockGenerativeBackend};
use mockall::predicate::*;

/// Create a mock backend that returns `response_text` for every call.
#[must_use]
pub fn mock_backend_simple(response_text: &'static str) -> MockGenerativeBackend {
    let mut mock = MockGenerativeBackend::new();
    mock.expect_complete()
        .with(always(), always(), always(), always())
        .returning(move |_, _, _, _| Ok(response_text.to_string()));
    mock
}

/// Create a mock backend that fails every call with an API error.
#[must_use]
pub fn mock_backend_failing() -> MockGenerativeBackend {
    let mut mock = MockGenerativeBackend::new();
    mock.expect_complete()
        .returning(|_, _, _, _| Err(BackendError::Api("injected failure".to_string())));
    mock
}

/// Create a mock backend that panics if invoked at all. Used to assert
/// that FAQ hits never reach the backend.
#[must_use]
pub fn mock_backend_unreachable() -> MockGenerativeBackend {
    let mut mock = MockGenerativeBackend::new();
    mock.expect_complete().never();
    mock
}
