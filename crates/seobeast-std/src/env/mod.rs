//! Environment variable access.
//!
//! ```
//! use seobeast_std::env::{ReadEnv, SystemEnv};
//!
//! fn api_url<E: ReadEnv>(env: &E) -> String {
//!     env.var("SEOBEAST_API_URL")
//!         .unwrap_or_else(|_| "http://localhost:8080".to_string())
//! }
//!
//! let url = api_url(&SystemEnv);
//! # let _ = url;
//! ```

mod in_memory;
mod read_env;
mod system;

#[cfg(any(test, feature = "test-support"))]
pub use in_memory::InMemoryEnv;
pub use read_env::ReadEnv;
pub use system::SystemEnv;
