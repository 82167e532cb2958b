//! Account credentials.
//!
//! Keys are wrapped in [`SecretString`] so they never end up in logs or
//! error messages by accident.

use std::fmt;

/// String wrapper that masks its content when formatted.
///
/// `Debug` prints `SecretString(***)`, `Display` prints `abcd...wxyz`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value. Only use this to build a request.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Masked form for logging: first four and last four characters.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "***".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString(***)")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Merchant id plus the public/private key pair used for basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub merchant_id: String,
    pub public_key: SecretString,
    pub private_key: SecretString,
}

impl Credentials {
    pub fn new(
        merchant_id: impl Into<String>,
        public_key: impl Into<SecretString>,
        private_key: impl Into<SecretString>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Wipe all three fields.
    pub fn clear(&mut self) {
        self.merchant_id.clear();
        self.public_key.clear();
        self.private_key.clear();
    }

    /// True once [`clear`](Self::clear) has run (or all fields were empty).
    pub fn is_cleared(&self) -> bool {
        self.merchant_id.is_empty() && self.public_key.is_empty() && self.private_key.is_empty()
    }
}
