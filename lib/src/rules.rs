//! Fixed derivation rules mapping raw input to generated content.

use crate::input::Goal;

/// Sections every site begins with, in order.
pub const BASE_SECTIONS: [&str; 3] = ["Hero Section", "About", "Contact"];

/// The technology labels every prototype is built on.
pub const TECH_STACK: [&str; 5] = ["React", "TypeScript", "Tailwind CSS", "Framer Motion", "Vite"];

/// Number of sentences returned by [`insights()`].
pub const INSIGHT_COUNT: usize = 4;

/// The goal-specific sections appended after [`BASE_SECTIONS`].
pub fn goal_sections(goal: &Goal) -> &'static [&'static str] {
    match goal {
        Goal::LandingPage => &["Features", "Testimonials", "CTA"],
        Goal::FullWebsite => &["Services", "Portfolio", "Team", "Blog", "FAQ"],
        Goal::ECommerce => &["Products", "Categories", "Cart", "Checkout", "Reviews"],
        Goal::Portfolio | Goal::Other(_) => &["Portfolio", "Skills", "Experience"],
    }
}

/// The ordered page sections for `goal`: the base sections followed by the
/// goal's own.
pub fn sections(goal: &Goal) -> Vec<String> {
    BASE_SECTIONS.iter()
        .chain(goal_sections(goal))
        .map(|s| s.to_string())
        .collect()
}

/// Audience insights for a business doing `nature_of_work`. Only the first
/// sentence depends on the input.
pub fn insights(nature_of_work: &str) -> Vec<String> {
    vec![
        format!("{nature_of_work} businesses benefit from clear value propositions"),
        "Mobile-first design is crucial for your target audience".into(),
        "Trust signals and testimonials increase conversion rates".into(),
        "Fast loading times improve user experience significantly".into(),
    ]
}

pub fn tech_stack() -> Vec<String> {
    TECH_STACK.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_goals() -> Vec<Goal> {
        vec![
            Goal::LandingPage,
            Goal::FullWebsite,
            Goal::Portfolio,
            Goal::ECommerce,
            Goal::Other("newsletter".into()),
            Goal::Other(String::new()),
        ]
    }

    #[test]
    fn sections_start_with_base_and_append_goal_suffix() {
        for goal in all_goals() {
            let sections = sections(&goal);
            assert!(!sections.is_empty());
            assert_eq!(&sections[..3], &BASE_SECTIONS);
            assert_eq!(&sections[3..], goal_sections(&goal));
        }
    }

    #[test]
    fn documented_suffixes() {
        assert_eq!(sections(&Goal::LandingPage)[3..], ["Features", "Testimonials", "CTA"]);
        assert_eq!(sections(&Goal::FullWebsite)[3..], ["Services", "Portfolio", "Team", "Blog", "FAQ"]);
        assert_eq!(sections(&Goal::ECommerce), [
            "Hero Section", "About", "Contact", "Products", "Categories", "Cart", "Checkout", "Reviews"
        ]);

        let portfolio = sections(&Goal::Portfolio);
        assert_eq!(portfolio[3..], ["Portfolio", "Skills", "Experience"]);
        assert_eq!(sections(&Goal::Other("anything".into())), portfolio);
    }

    #[test]
    fn insights_reference_nature_of_work_first() {
        for work in ["furniture retail", "", "Tax consulting & <audit>"] {
            let insights = insights(work);
            assert_eq!(insights.len(), INSIGHT_COUNT);
            assert!(insights[0].contains(work));
            assert_eq!(insights[1..], super::insights("something else")[1..]);
        }

        assert_eq!(insights("x"), insights("x"));
    }

    #[test]
    fn tech_stack_is_constant() {
        assert_eq!(tech_stack(), tech_stack());
        assert_eq!(tech_stack(), ["React", "TypeScript", "Tailwind CSS", "Framer Motion", "Vite"]);
    }
}
