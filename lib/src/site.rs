use serde::Serialize;

use crate::error::{Result, Chainable};
use crate::input::{Goal, RawInput};
use crate::rules;
use crate::util::{self, Identifier, Slug};

/// The derived description of a prototype site.
///
/// A `SiteDescription` is immutable: it is derived in one step from a
/// [`RawInput`] and never modified afterwards. Free-text fields are kept
/// exactly as entered; escaping happens when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDescription {
    business_name: String,
    goal: Goal,
    nature_of_work: String,
    target_audience: String,
    sections: Vec<String>,
    insights: Vec<String>,
    tech_stack: Vec<String>,
}

impl SiteDescription {
    /// Derives a description from `input`, failing if a required field is
    /// empty.
    pub fn derive(input: &RawInput) -> Result<Self> {
        input.validate().chain_with(|| "cannot derive a site from invalid input")?;

        Ok(SiteDescription {
            business_name: input.business_name.clone(),
            goal: input.goal.clone(),
            nature_of_work: input.nature_of_work.clone(),
            target_audience: input.target_audience.clone(),
            sections: rules::sections(&input.goal),
            insights: rules::insights(&input.nature_of_work),
            tech_stack: rules::tech_stack(),
        })
    }

    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn nature_of_work(&self) -> &str {
        &self.nature_of_work
    }

    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }

    /// Page sections in top-to-bottom order. Never empty.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn insights(&self) -> &[String] {
        &self.insights
    }

    pub fn tech_stack(&self) -> &[String] {
        &self.tech_stack
    }

    /// The name of the generated page component.
    pub fn component_name(&self) -> Identifier {
        util::identifier(&self.business_name)
    }

    /// The project's package and file-name slug.
    pub fn slug(&self) -> Slug {
        util::slugify(&self.business_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    static_assertions::assert_impl_all!(SiteDescription: Send, Sync, Clone);

    fn acme() -> RawInput {
        RawInput::new(Goal::ECommerce, "Acme Co", "furniture retail", "homeowners")
    }

    #[test]
    fn derives_from_input() {
        let site = SiteDescription::derive(&acme()).unwrap();
        assert_eq!(site.business_name(), "Acme Co");
        assert_eq!(site.goal(), &Goal::ECommerce);
        assert_eq!(site.nature_of_work(), "furniture retail");
        assert_eq!(site.target_audience(), "homeowners");
        assert_eq!(site.sections(), [
            "Hero Section", "About", "Contact", "Products", "Categories", "Cart", "Checkout", "Reviews"
        ]);

        assert_eq!(site.insights().len(), rules::INSIGHT_COUNT);
        assert!(site.insights().iter().any(|i| i.contains("furniture retail")));
        assert_eq!(site.tech_stack(), rules::TECH_STACK);
        assert_eq!(&*site.component_name(), "AcmeCo");
        assert_eq!(&*site.slug(), "acme-co");
    }

    #[test]
    fn advisory_fields_do_not_affect_derivation() {
        let mut noisy = acme();
        noisy.geographic_relevance = "Global".into();
        noisy.products_services = "Sofas, tables".into();
        noisy.brand_colors_style = "Corporate blue".into();
        noisy.special_notes = "</script>".into();

        let plain = SiteDescription::derive(&acme()).unwrap();
        assert_eq!(SiteDescription::derive(&noisy).unwrap(), plain);
    }

    #[test]
    fn tech_stack_is_identical_across_descriptions() {
        let a = SiteDescription::derive(&acme()).unwrap();
        let b = SiteDescription::derive(&RawInput::new(Goal::LandingPage, "B", "c", "d")).unwrap();
        assert_eq!(a.tech_stack(), b.tech_stack());
    }

    #[test]
    fn invalid_input_fails_fast() {
        let mut input = acme();
        input.nature_of_work = "\t".into();
        let error = SiteDescription::derive(&input).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(error.to_string().contains("natureOfWork"));
    }
}
