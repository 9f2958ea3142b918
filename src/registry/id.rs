//! Globally unique layer addressing.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Separator used in the rendered form of a global layer id
pub const GLOBAL_ID_DELIMITER: &str = "::";

/// Composite key addressing a layer across providers.
///
/// The structured form avoids the ambiguity of delimiter-joined strings; the
/// `provider::layer` string exists only at the Display/FromStr boundary.
/// Provider ids containing the delimiter are rejected at registration, and
/// generated layer ids never contain it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalLayerId {
    provider: String,
    layer: String,
}

impl GlobalLayerId {
    pub fn new(provider: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            layer: layer.into(),
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider
    }

    pub fn layer_id(&self) -> &str {
        &self.layer
    }
}

impl fmt::Display for GlobalLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.provider, GLOBAL_ID_DELIMITER, self.layer)
    }
}

impl FromStr for GlobalLayerId {
    type Err = Error;

    /// Splits on the first delimiter only
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(GLOBAL_ID_DELIMITER) {
            Some((provider, layer)) if !provider.is_empty() && !layer.is_empty() => {
                Ok(Self::new(provider, layer))
            }
            _ => Err(Error::InvalidId(s.to_string())),
        }
    }
}

/// Checks that an id component is usable inside a global id
pub fn validate_id_component(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidId("empty id".to_string()));
    }
    if id.contains(GLOBAL_ID_DELIMITER) {
        return Err(Error::InvalidId(format!(
            "id must not contain {:?}: {}",
            GLOBAL_ID_DELIMITER, id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let id = GlobalLayerId::new("file-provider", "abc-123");
        let rendered = id.to_string();
        assert_eq!(rendered, "file-provider::abc-123");
        assert_eq!(rendered.parse::<GlobalLayerId>().unwrap(), id);
    }

    #[test]
    fn test_parse_splits_on_first_delimiter() {
        let id: GlobalLayerId = "a::b::c".parse().unwrap();
        assert_eq!(id.provider_id(), "a");
        assert_eq!(id.layer_id(), "b::c");
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert!("no-delimiter".parse::<GlobalLayerId>().is_err());
        assert!("::layer".parse::<GlobalLayerId>().is_err());
        assert!("provider::".parse::<GlobalLayerId>().is_err());
    }

    #[test]
    fn test_validate_id_component() {
        assert!(validate_id_component("file-provider").is_ok());
        assert!(validate_id_component("").is_err());
        assert!(validate_id_component("a::b").is_err());
    }
}
