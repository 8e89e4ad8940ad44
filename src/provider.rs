//! The closed set of supported identity providers.
//!
//! Adding a provider means adding a variant here and a strategy under
//! [`providers`](crate::providers); there is no runtime registration.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An external identity service whose tokens this crate can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Kakao,
    Naver,
    Google,
    Apple,
}

impl Provider {
    /// Every supported provider, in a stable order.
    pub const ALL: [Provider; 4] = [
        Provider::Kakao,
        Provider::Naver,
        Provider::Google,
        Provider::Apple,
    ];

    /// Returns the lowercase identifier (`"kakao"`, `"naver"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Kakao => "kakao",
            Provider::Naver => "naver",
            Provider::Google => "google",
            Provider::Apple => "apple",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a provider identifier.
/// Surrounding whitespace is ignored and matching is ASCII case-insensitive.
impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| Error::UnknownProvider(s.to_string()))
    }
}
