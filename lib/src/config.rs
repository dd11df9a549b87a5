use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, Chainable};

/// Renderer and controller settings.
///
/// Every key is optional:
///
/// ```toml
/// copyright-year = 2024
/// styling-runtime = "https://cdn.tailwindcss.com"
/// generation-delay-ms = 3000
/// preview-delay-ms = 1000
/// export-delay-ms = 1500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Settings {
    /// The year printed in every footer.
    pub copyright_year: u16,
    /// URL of the styling runtime the standalone document loads.
    pub styling_runtime: String,
    pub generation_delay_ms: u64,
    pub preview_delay_ms: u64,
    pub export_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            copyright_year: 2024,
            styling_runtime: "https://cdn.tailwindcss.com".into(),
            generation_delay_ms: 3000,
            preview_delay_ms: 1000,
            export_delay_ms: 1500,
        }
    }
}

impl Settings {
    /// Settings with every simulated delay set to zero.
    pub fn immediate() -> Self {
        Settings {
            generation_delay_ms: 0,
            preview_delay_ms: 0,
            export_delay_ms: 0,
            ..Settings::default()
        }
    }

    pub fn parse(string: &str) -> Result<Self> {
        toml::from_str(string).chain_with(|| error! {
            kind = Config,
            "invalid settings",
        })
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let string = std::fs::read_to_string(path).chain_with(|| error! {
            kind = Config,
            "failed to read settings",
            "path" => path.display(),
        })?;

        Settings::parse(&string).chain_with(|| error! {
            "failed to load settings",
            "path" => path.display(),
        })
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    pub fn preview_delay(&self) -> Duration {
        Duration::from_millis(self.preview_delay_ms)
    }

    pub fn export_delay(&self) -> Duration {
        Duration::from_millis(self.export_delay_ms)
    }
}
