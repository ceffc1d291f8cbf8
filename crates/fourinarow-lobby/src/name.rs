//! Player identity

use fourinarow_core::{FourError, Result};
use std::fmt;
use std::path::Path;

/// Bytes that would change the meaning of a topic
const RESERVED: &[u8] = b"/+#";

/// A player's name, usable as a single topic level
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerName(Vec<u8>);

impl PlayerName {
    /// Validate raw name bytes
    ///
    /// Trailing whitespace is trimmed. Empty names and names containing
    /// `/`, `+` or `#` are rejected.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let end = raw
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(0, |i| i + 1);
        let name = &raw[..end];
        if name.is_empty() {
            return Err(FourError::InvalidName("name is empty".into()));
        }
        if let Some(bad) = name.iter().find(|&&b| RESERVED.contains(&b)) {
            return Err(FourError::InvalidName(format!(
                "{:?} contains reserved character {:?}",
                String::from_utf8_lossy(name),
                *bad as char
            )));
        }
        Ok(Self(name.to_vec()))
    }

    /// Read the name from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| {
            FourError::ConfigError(format!("cannot read name file {}: {}", path.display(), e))
        })?;
        Self::parse(&raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
