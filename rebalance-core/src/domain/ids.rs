use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a tradeable instrument.
///
/// Nothing is assumed about its structure beyond equality, hashing and a
/// total order (used only to make serialized maps deterministic).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Security(pub String);

impl Security {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Security {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Security {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_display_is_raw_id() {
        assert_eq!(Security::new("AAPL").to_string(), "AAPL");
    }

    #[test]
    fn test_security_serializes_as_plain_string() {
        let json = serde_json::to_string(&Security::from("MSFT")).unwrap();
        assert_eq!(json, "\"MSFT\"");
    }
}
