//! Environment variable interpolation for configuration

use super::error::ConfigError;
use regex::Regex;
use std::env;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
});

/// Replace every `${VAR}` reference with the variable's value.
///
/// Fails on the first reference whose variable is not set.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(content.len());
    let mut last = 0;

    for cap in ENV_VAR_PATTERN.captures_iter(content) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let var_name = &cap[1];
        let value = env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound {
            var: var_name.to_string(),
        })?;

        result.push_str(&content[last..full_match.start()]);
        result.push_str(&value);
        last = full_match.end();
    }

    result.push_str(&content[last..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_env_vars() {
        env::set_var("CHATWIRE_TEST_MODEL", "gpt-4");

        let content = "model: ${CHATWIRE_TEST_MODEL}";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "model: gpt-4");

        env::remove_var("CHATWIRE_TEST_MODEL");
    }

    #[test]
    fn test_missing_env_var() {
        let content = "model: ${CHATWIRE_MISSING_VAR}";
        let result = interpolate_env_vars(content);

        assert!(result.is_err());
        if let Err(ConfigError::EnvVarNotFound { var }) = result {
            assert_eq!(var, "CHATWIRE_MISSING_VAR");
        } else {
            panic!("Expected EnvVarNotFound error");
        }
    }

    #[test]
    fn test_multiple_env_vars() {
        env::set_var("CHATWIRE_VAR1", "value1");
        env::set_var("CHATWIRE_VAR2", "value2");

        let content = "key1: ${CHATWIRE_VAR1}, key2: ${CHATWIRE_VAR2}, again: ${CHATWIRE_VAR1}";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "key1: value1, key2: value2, again: value1");

        env::remove_var("CHATWIRE_VAR1");
        env::remove_var("CHATWIRE_VAR2");
    }

    #[test]
    fn test_lowercase_references_are_left_alone() {
        let content = "user: ${not_a_var}";
        assert_eq!(interpolate_env_vars(content).unwrap(), content);
    }
}
