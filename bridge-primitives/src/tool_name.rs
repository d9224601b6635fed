//! Validated tool names.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 64;

/// Name under which a tool is registered and invoked.
///
/// Names are process-unique registry keys and appear verbatim in the MCP
/// capability listing, so the accepted alphabet is deliberately narrow.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a tool name after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToolName`] if the supplied name is empty, too
    /// long, or contains characters outside lowercase alphanumerics, dash,
    /// underscore, and dot.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidToolName {
                name,
                reason: "name cannot be empty".into(),
            });
        }

        if name.len() > MAX_NAME_LEN {
            return Err(Error::InvalidToolName {
                name,
                reason: format!("name length must be <= {MAX_NAME_LEN}"),
            });
        }

        if !name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-' | '_' | '.'))
        {
            return Err(Error::InvalidToolName {
                name,
                reason: "name must contain lowercase alphanumeric, dash, underscore, or dot"
                    .into(),
            });
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ToolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ToolName> for String {
    fn from(value: ToolName) -> Self {
        value.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        for name in ["echo", "update_resource", "posts.list", "v2-sync"] {
            assert_eq!(ToolName::new(name).expect("valid").as_str(), name);
        }
    }

    #[test]
    fn rejects_empty_and_bad_characters() {
        assert!(ToolName::new("").is_err());
        assert!(ToolName::new("  ").is_err());
        assert!(ToolName::new("Echo").is_err());
        assert!(ToolName::new("has space").is_err());
        assert!(ToolName::new("x".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
