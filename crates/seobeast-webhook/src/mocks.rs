//! Test doubles for running the receiver without NATS.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! seobeast-webhook = { path = "...", features = ["test-support"] }
//! ```

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

use crate::revalidate::{Revalidate, RevalidationRequest};

#[derive(Debug, Clone, Error)]
#[error("mock revalidation failure: {0}")]
pub struct MockRevalidateError(pub String);

/// Records every revalidation; can be switched to fail.
#[derive(Clone, Default)]
pub struct MockRevalidator {
    requests: Arc<Mutex<Vec<RevalidationRequest>>>,
    failing: Arc<AtomicBool>,
}

impl MockRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RevalidationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Revalidate for MockRevalidator {
    type Error = MockRevalidateError;

    async fn revalidate(&self, request: &RevalidationRequest) -> Result<(), MockRevalidateError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MockRevalidateError(format!("cannot revalidate {}", request.path)));
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}
