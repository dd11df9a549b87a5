use std::fmt;
use std::str::FromStr;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The kind of site a prototype is generated for.
///
/// Unknown goals are preserved verbatim as [`Goal::Other`] and derive the same
/// sections as [`Goal::Portfolio`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goal {
    LandingPage,
    FullWebsite,
    Portfolio,
    ECommerce,
    Other(String),
}

impl Goal {
    pub fn as_str(&self) -> &str {
        match self {
            Goal::LandingPage => "landing-page",
            Goal::FullWebsite => "full-website",
            Goal::Portfolio => "portfolio",
            Goal::ECommerce => "e-commerce",
            Goal::Other(other) => other,
        }
    }
}

impl FromStr for Goal {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Goal::from(s.to_string()))
    }
}

impl From<String> for Goal {
    fn from(string: String) -> Self {
        match string.as_str() {
            "landing-page" => Goal::LandingPage,
            "full-website" => Goal::FullWebsite,
            "portfolio" => Goal::Portfolio,
            "e-commerce" => Goal::ECommerce,
            _ => Goal::Other(string),
        }
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        match goal {
            Goal::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// The business description as submitted by the input form.
///
/// Only `goal`, `business_name`, `nature_of_work`, and `target_audience` feed
/// derivation. The remaining fields are advisory: accepted and carried, but
/// unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    pub goal: Goal,
    pub business_name: String,
    pub nature_of_work: String,
    pub target_audience: String,
    #[serde(default)]
    pub geographic_relevance: String,
    #[serde(default)]
    pub products_services: String,
    #[serde(default)]
    pub brand_colors_style: String,
    #[serde(default)]
    pub special_notes: String,
}

impl RawInput {
    pub fn new<N, W, A>(goal: Goal, business_name: N, nature_of_work: W, target_audience: A) -> Self
        where N: Into<String>, W: Into<String>, A: Into<String>
    {
        RawInput {
            goal,
            business_name: business_name.into(),
            nature_of_work: nature_of_work.into(),
            target_audience: target_audience.into(),
            geographic_relevance: String::new(),
            products_services: String::new(),
            brand_colors_style: String::new(),
            special_notes: String::new(),
        }
    }

    /// Checks that every required field has non-whitespace content.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("businessName", &self.business_name),
            ("natureOfWork", &self.nature_of_work),
            ("targetAudience", &self.target_audience),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return err! {
                    kind = InvalidInput,
                    "required input field is empty",
                    "field" => field,
                };
            }
        }

        Ok(())
    }
}
