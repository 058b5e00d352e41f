//! # Settings
//!
//! Live Push is configured with a single TOML file
//! which must contain exactly one [`Settings`](struct.Settings.html) object.
//!
//! ## Example
//!
//! ```toml
//! url = "https://example.supabase.co/rest/v1/rpc/insert_live_data"
//! api_key = "qk_live_0123456789abcdef"
//! header_key = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! interval_secs = 5
//! unit = "kW"
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::prelude::*;

const URL_PLACEHOLDER: &str = "XXXXX";
const KEY_PLACEHOLDER: &str = "YOUR_";

/// Read the settings file.
///
/// A missing file is not an error: the defaults apply and [`Settings::check`] rejects them.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Settings file `{}` is not found, using the defaults.", path.display());
        return Ok(Settings::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("Failed to read `{}`", path.display()))?;
    let settings = parse(&contents).with_context(|| format!("Failed to parse `{}`", path.display()))?;
    Ok(settings)
}

/// Parse the settings from a TOML string.
pub fn parse(contents: &str) -> Result<Settings> {
    let mut settings: Settings = toml::from_str(contents)?;
    if settings.interval_secs == 0 {
        warn!("`interval_secs` must be positive, using 1 second.");
        settings.interval_secs = 1;
    }
    Ok(settings)
}

/// Represents a root settings object.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Endpoint the measurements are posted to.
    pub url: String,

    /// Primary API key, sent in the request body as `p_api_key`.
    pub api_key: String,

    /// Secondary key, sent in the `apikey` header.
    pub header_key: String,

    /// Seconds to wait between the end of a cycle and the start of the next one.
    pub interval_secs: u64,

    /// Unit label sent along with every value.
    pub unit: String,

    /// Value reported by the built-in fixed source.
    pub value: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: format!("https://{}.supabase.co/rest/v1/rpc/insert_live_data", URL_PLACEHOLDER),
            api_key: format!("{}API_KEY", KEY_PLACEHOLDER),
            header_key: format!("{}HEADER_KEY", KEY_PLACEHOLDER),
            interval_secs: 5,
            unit: "kW".into(),
            value: 42.5,
        }
    }
}

impl Settings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    /// Checks that the endpoint and both keys have been filled in.
    pub fn check(&self) -> Result<(), ConfigError> {
        let fields: Vec<&'static str> = [
            ("url", is_placeholder(&self.url, URL_PLACEHOLDER)),
            ("api_key", is_placeholder(&self.api_key, KEY_PLACEHOLDER)),
            ("header_key", is_placeholder(&self.header_key, KEY_PLACEHOLDER)),
        ]
        .iter()
        .filter(|(_, is_placeholder)| *is_placeholder)
        .map(|(name, _)| *name)
        .collect();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Placeholders(fields))
        }
    }

    /// API key safe to print: the first 15 characters only.
    pub fn masked_api_key(&self) -> String {
        format!("{}...", self.api_key.chars().take(15).collect::<String>())
    }
}

fn is_placeholder(value: &str, marker: &str) -> bool {
    value.trim().is_empty() || value.contains(marker)
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("configuration is incomplete, replace the placeholder values of: {}", .0.join(", "))]
    Placeholders(Vec<&'static str>),
}
