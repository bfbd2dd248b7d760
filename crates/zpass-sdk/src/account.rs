use crate::config::PRIVATE_KEY_PREFIX;
use crate::error::{Result, SdkError};

/// Key material held by the SDK for the configured account.
///
/// Both keys are optional at the type level so callers that only verify or
/// only compute Merkle math never have to fabricate them. Accessors return
/// a typed error when the operation at hand genuinely needs the key.
#[derive(Clone, Debug)]
pub struct Account {
    private_key: Option<String>,
    view_key: Option<String>,
}

impl Account {
    pub fn new(private_key: Option<String>, view_key: Option<String>) -> Self {
        Self { private_key, view_key }
    }

    pub fn private_key(&self) -> Result<&str> {
        self.private_key
            .as_deref()
            .ok_or(SdkError::ResourceUnavailable("private key"))
    }

    pub fn view_key(&self) -> Result<&str> {
        self.view_key
            .as_deref()
            .ok_or(SdkError::ResourceUnavailable("view key"))
    }
}

/// Check the bech32 prefix of a private key before any expensive work runs.
pub fn validate_private_key(private_key: &str) -> Result<()> {
    if !private_key.starts_with(PRIVATE_KEY_PREFIX) {
        return Err(SdkError::Configuration(format!(
            "invalid private key format, expected a key starting with {PRIVATE_KEY_PREFIX}"
        )));
    }
    Ok(())
}
