use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, Chainable};
use crate::input::Goal;
use crate::render::{Manifest, Renderer};
use crate::site::SiteDescription;

/// The version of the bundle document's schema.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// The exported project: a site description with every rendered artifact
/// needed to rebuild it.
///
/// Two bundles of equal descriptions differ only in
/// [`Metadata::generated_at`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub name: String,
    pub goal: Goal,
    pub metadata: Metadata,
    pub structure: Structure,
    pub source_code: String,
    pub styles: String,
    pub package_json: Manifest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(with = "rfc3339")]
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub sections: Vec<String>,
    pub tech_stack: Vec<String>,
    pub insights: Vec<String>,
    pub target_audience: String,
}

impl Bundle {
    /// Bundles `site`, stamped with the current time.
    pub fn new(renderer: &Renderer, site: &SiteDescription) -> Result<Self> {
        Bundle::at(renderer, site, Utc::now())
    }

    /// Bundles `site`, stamped with `generated_at`.
    pub fn at(
        renderer: &Renderer,
        site: &SiteDescription,
        generated_at: DateTime<Utc>,
    ) -> Result<Self> {
        let (source_code, styles) = rayon::join(
            || renderer.source_text(site),
            || renderer.style_config(site),
        );

        Ok(Bundle {
            name: site.business_name().to_string(),
            goal: site.goal().clone(),
            metadata: Metadata { generated_at, version: SCHEMA_VERSION.into() },
            structure: Structure {
                sections: site.sections().to_vec(),
                tech_stack: site.tech_stack().to_vec(),
                insights: site.insights().to_vec(),
                target_audience: site.target_audience().to_string(),
            },
            source_code: source_code?,
            styles: styles?,
            package_json: renderer.manifest(site),
        })
    }

    /// `<slug>-prototype-complete.json`.
    pub fn file_name(&self) -> String {
        format!("{}-prototype-complete.json", self.package_json.name)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).chain_with(|| "failed to serialize bundle")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).chain_with(|| "failed to parse bundle")
    }
}

mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let string = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&string)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

impl Metadata {
    /// `generated_at` as an ISO-8601 string with millisecond precision.
    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
