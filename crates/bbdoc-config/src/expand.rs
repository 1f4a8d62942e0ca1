//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Strings without `${` are returned unchanged, so a bare `$` in a path or
/// URL is kept as is.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand an optional string field.
pub(crate) fn expand_opt(value: Option<&str>, field: &str) -> Result<Option<String>, ConfigError> {
    value.map(|v| expand_env(v, field)).transpose()
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("BBDOC_TEST_SIMPLE", "doc/classes");
        }
        let result = expand_env("${BBDOC_TEST_SIMPLE}", "classes.source_dir").unwrap();
        assert_eq!(result, "doc/classes");
        unsafe {
            std::env::remove_var("BBDOC_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("BBDOC_TEST_UNSET");
        }
        let result = expand_env("${BBDOC_TEST_UNSET:-out}/api", "classes.output_dir").unwrap();
        assert_eq!(result, "out/api");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("BBDOC_TEST_MISSING");
        }
        let err = expand_env("${BBDOC_TEST_MISSING}", "links.external_base_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("BBDOC_TEST_MISSING"));
        assert!(err.to_string().contains("links.external_base_url"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("docs/$version", "classes.output_dir").unwrap();
        assert_eq!(result, "docs/$version");
    }

    #[test]
    fn test_expand_opt() {
        assert_eq!(expand_opt(None, "graph_nodes.cpp_output").unwrap(), None);
        assert_eq!(
            expand_opt(Some("a.h"), "graph_nodes.cpp_output").unwrap(),
            Some("a.h".to_owned())
        );
    }
}
