use std::{fmt, str::FromStr};

use convert_case::{Case, Casing};

use crate::error::{Error, Result};

/// Return true if the character may appear in a node name.
pub fn valid_nodename_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Return true if the full name is valid.
pub fn valid_nodename(name: &str) -> bool {
    !name.is_empty() && name.chars().all(valid_nodename_char)
}

/// A node name: lowercase ASCII alphanumerics plus underscores. Widgets are
/// named after their type by default, and hub locations are addressed by
/// node name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeName {
    /// Stored name.
    name: String,
}

impl NodeName {
    /// Munge an arbitrary string into a valid name: snake case first, then
    /// invalid characters are dropped.
    pub fn convert(name: &str) -> Self {
        let raw = name.to_case(Case::Snake);
        let filtered: String = raw.chars().filter(|c| valid_nodename_char(*c)).collect();
        let name = if filtered.is_empty() {
            "node".to_string()
        } else {
            filtered
        };
        Self { name }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl FromStr for NodeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl TryFrom<&str> for NodeName {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        if !valid_nodename(name) {
            return Err(Error::Parse(format!("invalid node name: {name:?}")));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}
