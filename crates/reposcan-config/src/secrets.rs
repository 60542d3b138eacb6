// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret fetch contract.
//!
//! Secrets are addressed by their full environment name. How they got into
//! the environment (dotenv, orchestrator injection, vault sidecar) is the
//! deployment's concern, not this service's.

use reposcan_core::ScanError;

/// Environment name of the GitHub App private key (PEM).
pub const SECRET_GITHUB_PRIVATE_KEY: &str = "APP_GITHUB_PRIVATE_KEY";

/// Environment name of the GitHub App client ID.
pub const SECRET_GITHUB_CLIENT_ID: &str = "APP_GITHUB_CLIENT_ID";

/// Environment name of the OpenAI API key.
pub const SECRET_OPENAI_API_KEY: &str = "APP_OPENAI_API_KEY";

/// Fetch a secret by its full environment name.
///
/// An unset or empty variable is [`ScanError::SecretMissing`].
pub fn fetch_secret_by_name(name: &str) -> Result<String, ScanError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ScanError::SecretMissing {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_reports_its_name() {
        let err = fetch_secret_by_name("APP_REPOSCAN_TEST_UNSET").unwrap_err();
        assert_eq!(err.to_string(), "secret not set: APP_REPOSCAN_TEST_UNSET");
    }

    #[test]
    fn present_secret_is_returned() {
        std::env::set_var("APP_REPOSCAN_TEST_SET", "value");
        assert_eq!(
            fetch_secret_by_name("APP_REPOSCAN_TEST_SET").unwrap(),
            "value"
        );
        std::env::remove_var("APP_REPOSCAN_TEST_SET");
    }
}
