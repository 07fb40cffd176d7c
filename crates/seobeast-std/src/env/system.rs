use std::env;

use super::ReadEnv;

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    #[inline]
    fn var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agrees_with_std_for_path() {
        assert_eq!(SystemEnv.var("PATH").is_ok(), env::var("PATH").is_ok());
    }

    #[test]
    fn unset_var_is_not_present() {
        assert!(matches!(
            SystemEnv.var("SEOBEAST_SURELY_UNSET_VAR_4821"),
            Err(env::VarError::NotPresent)
        ));
        assert_eq!(SystemEnv.parsed::<u16>("SEOBEAST_SURELY_UNSET_VAR_4821"), None);
    }
}
