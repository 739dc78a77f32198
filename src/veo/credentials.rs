//! API key discovery.
//!
//! The workflow never reads the environment directly; it asks a
//! `CredentialSource` so tests can swap in a canned implementation and the
//! CLI can report key state before any network call is made.

/// The environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Result of probing a credential source.
///
/// Three states on purpose: `Unknown` means the source could not tell
/// (distinct from a confirmed `Absent`), and only `Present` authorizes a
/// generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    /// The source could not determine whether a key exists.
    Unknown,
    /// Confirmed: no usable key is available.
    Absent,
    /// A usable key is available.
    Present,
}

/// Where the API key comes from.
pub trait CredentialSource: Send + Sync {
    /// Probe for a usable key.
    fn status(&self) -> CredentialStatus;

    /// The key itself, when present.
    fn api_key(&self) -> Option<String>;

    /// Walk the user through making a key available.
    fn select(&self);
}

/// Credential source backed by the `GEMINI_API_KEY` environment variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn status(&self) -> CredentialStatus {
        match std::env::var(GEMINI_API_KEY_ENV) {
            Ok(value) if !value.trim().is_empty() => CredentialStatus::Present,
            Ok(_) => CredentialStatus::Absent,
            Err(std::env::VarError::NotPresent) => CredentialStatus::Absent,
            Err(std::env::VarError::NotUnicode(_)) => CredentialStatus::Unknown,
        }
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn select(&self) {
        eprintln!("{} environment variable is not set.", GEMINI_API_KEY_ENV);
        eprintln!();
        eprintln!("To generate videos, add your API key to a .env file:");
        eprintln!("    echo '{}=your-api-key-here' >> .env", GEMINI_API_KEY_ENV);
        eprintln!();
        eprintln!("Or set it as an environment variable:");
        eprintln!("    export {}=\"your-api-key-here\"", GEMINI_API_KEY_ENV);
        eprintln!();
        eprintln!("Get an API key at: https://aistudio.google.com/");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_credentials_present_when_set() {
        let original = std::env::var(GEMINI_API_KEY_ENV).ok();

        std::env::set_var(GEMINI_API_KEY_ENV, "test-key-from-env");
        let source = EnvCredentials;
        assert_eq!(source.status(), CredentialStatus::Present);
        assert_eq!(source.api_key(), Some("test-key-from-env".to_string()));

        std::env::remove_var(GEMINI_API_KEY_ENV);
        assert_eq!(source.status(), CredentialStatus::Absent);
        assert_eq!(source.api_key(), None);

        if let Some(val) = original {
            std::env::set_var(GEMINI_API_KEY_ENV, val);
        }
    }

    #[test]
    fn test_env_credentials_blank_value_is_absent() {
        let original = std::env::var(GEMINI_API_KEY_ENV).ok();

        std::env::set_var(GEMINI_API_KEY_ENV, "   ");
        let source = EnvCredentials;
        assert_eq!(source.status(), CredentialStatus::Absent);
        assert_eq!(source.api_key(), None);

        match original {
            Some(val) => std::env::set_var(GEMINI_API_KEY_ENV, val),
            None => std::env::remove_var(GEMINI_API_KEY_ENV),
        }
    }

    #[test]
    fn test_status_states_are_distinct() {
        assert_ne!(CredentialStatus::Unknown, CredentialStatus::Absent);
        assert_ne!(CredentialStatus::Unknown, CredentialStatus::Present);
        assert_ne!(CredentialStatus::Absent, CredentialStatus::Present);
    }
}
