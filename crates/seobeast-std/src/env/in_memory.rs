use std::cell::RefCell;
use std::collections::HashMap;
use std::env;

use super::ReadEnv;

/// Environment backed by a map; never touches the process environment.
///
/// `set` takes `&self`, so a test can build one, populate it and pass
/// `&env` straight into a `from_env` constructor.
#[derive(Debug, Default)]
pub struct InMemoryEnv {
    vars: RefCell<HashMap<String, String>>,
}

impl InMemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.borrow_mut().insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InMemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let env = Self::new();
        for (key, value) in iter {
            env.set(key, value);
        }
        env
    }
}

impl ReadEnv for InMemoryEnv {
    fn var(&self, key: &str) -> Result<String, env::VarError> {
        self.vars
            .borrow()
            .get(key)
            .cloned()
            .ok_or(env::VarError::NotPresent)
    }
}
