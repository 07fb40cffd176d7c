use std::env;
use std::str::FromStr;

/// Source of environment variables.
///
/// No `Send + Sync` bound; add it at the call site when the reader itself
/// has to cross threads.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Result<String, env::VarError>;

    /// The value of `key`, treating an empty string as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).ok().filter(|v| !v.is_empty())
    }

    /// `key` parsed as `T`; unset and unparseable values both yield `None`.
    fn parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.var(key).ok().and_then(|v| v.trim().parse().ok())
    }
}
