//! Thin, injectable abstractions over `std` for the SEOBeast services.
//!
//! | Concern | Trait | Production | Test |
//! |---------|-------|------------|------|
//! | Env vars | [`ReadEnv`] | [`SystemEnv`] | [`InMemoryEnv`]* |
//!
//! *Available with `#[cfg(test)]` or the `"test-support"` feature.
//!
//! Configuration types take `&impl ReadEnv` instead of calling
//! `std::env::var` directly, so several configurations can coexist in one
//! test process without touching the global environment.
//!
//! [`InMemoryEnv`] is backed by a `RefCell` and is therefore not `Sync`.
//! Build the config from it first, then move the config into the server.

pub mod env;

#[cfg(any(test, feature = "test-support"))]
pub use env::InMemoryEnv;
pub use env::{ReadEnv, SystemEnv};
