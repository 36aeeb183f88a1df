use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// Identifiers are stored in a 64-character column, two hex chars per byte.
pub const MAX_IDENTIFIER_BYTES: usize = 32;

/// Configuration for the guests module (`modules.guests` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuestsConfig {
    /// Random bytes per identifier; the identifier is their lowercase hex.
    #[serde(
        default = "default_identifier_bytes",
        deserialize_with = "deserialize_identifier_bytes"
    )]
    pub identifier_bytes: usize,
    #[serde(default = "default_max_allocation_attempts")]
    pub max_allocation_attempts: u32,
}

impl Default for GuestsConfig {
    fn default() -> Self {
        Self {
            identifier_bytes: default_identifier_bytes(),
            max_allocation_attempts: default_max_allocation_attempts(),
        }
    }
}

fn default_identifier_bytes() -> usize {
    4
}

fn deserialize_identifier_bytes<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = usize::deserialize(deserializer)?;
    if !(1..=MAX_IDENTIFIER_BYTES).contains(&bytes) {
        return Err(D::Error::custom(format!(
            "identifier_bytes must be between 1 and {MAX_IDENTIFIER_BYTES}, got {bytes}"
        )));
    }
    Ok(bytes)
}

fn default_max_allocation_attempts() -> u32 {
    5
}
