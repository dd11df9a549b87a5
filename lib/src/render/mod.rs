mod manifest;

pub use manifest::*;

use std::sync::Arc;

use minijinja::Environment;
use serde::Serialize;

use crate::config::Settings;
use crate::error::{Result, Chainable};
use crate::site::SiteDescription;

const PAGE: &str = "page.html";
const COMPONENT: &str = "page.tsx";
const STYLE_CONFIG: &str = "tailwind.config.js";

/// How the page fragment is wrapped.
///
/// Every wrapper renders the same fragment: a header, three feature blocks per
/// section, and a footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Wrapper {
    /// The bare fragment, for embedding inline.
    None,
    /// A standalone HTML document loading the styling runtime.
    Document,
    /// The source of a TSX page component.
    Component,
}

impl Wrapper {
    /// The template the fragment renders through. Its extension selects the
    /// auto-escaping applied to every interpolated value.
    fn template(self) -> &'static str {
        match self {
            Wrapper::None | Wrapper::Document => PAGE,
            Wrapper::Component => COMPONENT,
        }
    }

    fn class_attr(self) -> &'static str {
        match self {
            Wrapper::None | Wrapper::Document => "class",
            Wrapper::Component => "className",
        }
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    wrapper: Wrapper,
    class_attr: &'static str,
    business_name: &'a str,
    nature_of_work: &'a str,
    target_audience: &'a str,
    sections: &'a [String],
    year: u16,
    styling_runtime: &'a str,
    component: &'a str,
}

/// Every artifact rendered from one [`SiteDescription`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// The inline preview fragment.
    pub markup: String,
    /// The standalone preview document.
    pub document: String,
    /// The page component's source text.
    pub source: String,
    /// The style configuration text.
    pub styles: String,
    pub manifest: Manifest,
}

/// Renders site descriptions into their textual artifacts.
///
/// A `Renderer` holds no per-site state: any number of descriptions may be
/// rendered through one renderer, concurrently.
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
    settings: Arc<Settings>,
}

impl Renderer {
    pub fn new(settings: impl Into<Arc<Settings>>) -> Result<Self> {
        let page = include_str!("../../templates/page.jinja");

        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(ext::auto_escape);
        env.set_formatter(ext::formatter);
        env.add_filter("comment", ext::comment);
        env.add_template(PAGE, page)?;
        env.add_template(COMPONENT, page)?;
        env.add_template(STYLE_CONFIG, include_str!("../../templates/tailwind.config.js.jinja"))?;

        Ok(Renderer { env, settings: settings.into() })
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Renders the page fragment of `site` inside `wrapper`.
    pub fn page(&self, site: &SiteDescription, wrapper: Wrapper) -> Result<String> {
        let component = site.component_name();
        let context = PageContext {
            wrapper,
            class_attr: wrapper.class_attr(),
            business_name: site.business_name(),
            nature_of_work: site.nature_of_work(),
            target_audience: site.target_audience(),
            sections: site.sections(),
            year: self.settings.copyright_year,
            styling_runtime: &self.settings.styling_runtime,
            component: &component,
        };

        tracing::debug!(?wrapper, site = site.business_name(), "rendering page");
        self.env.get_template(wrapper.template())?
            .render(context)
            .chain_with(|| error! {
                "failed to render page",
                "wrapper" => format!("{wrapper:?}"),
            })
    }

    /// The inline preview fragment.
    pub fn markup(&self, site: &SiteDescription) -> Result<String> {
        self.page(site, Wrapper::None)
    }

    /// The preview fragment wrapped in a standalone document.
    pub fn document(&self, site: &SiteDescription) -> Result<String> {
        self.page(site, Wrapper::Document)
    }

    /// The page component's source text.
    pub fn source_text(&self, site: &SiteDescription) -> Result<String> {
        self.page(site, Wrapper::Component)
    }

    pub fn style_config(&self, site: &SiteDescription) -> Result<String> {
        self.env.get_template(STYLE_CONFIG)?
            .render(minijinja::context! { business_name => site.business_name() })
            .chain_with(|| "failed to render style configuration")
    }

    pub fn manifest(&self, site: &SiteDescription) -> Manifest {
        Manifest::for_site(site)
    }

    /// Renders every artifact of `site`, in parallel.
    pub fn artifacts(&self, site: &SiteDescription) -> Result<Artifacts> {
        let ((markup, document), (source, styles)) = rayon::join(
            || rayon::join(|| self.markup(site), || self.document(site)),
            || rayon::join(|| self.source_text(site), || self.style_config(site)),
        );

        Ok(Artifacts {
            markup: markup?,
            document: document?,
            source: source?,
            styles: styles?,
            manifest: self.manifest(site),
        })
    }
}

mod ext {
    use std::fmt::Write;

    use minijinja::{AutoEscape, Error, HtmlEscape, Output, State, Value};

    /// JSX text: HTML escaping, plus braces, which open expressions.
    const JSX: AutoEscape = AutoEscape::Custom("jsx");

    pub fn auto_escape(name: &str) -> AutoEscape {
        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("html") => AutoEscape::Html,
            Some("tsx") => JSX,
            _ => AutoEscape::None,
        }
    }

    pub fn formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), Error> {
        if state.auto_escape() != JSX || value.is_safe() {
            return minijinja::escape_formatter(out, state, value);
        }

        let html = HtmlEscape(&value.to_string()).to_string();
        out.write_str(&html.replace('{', "&#123;").replace('}', "&#125;"))?;
        Ok(())
    }

    /// Folds line breaks into spaces so `value` stays inside a `//` comment.
    pub fn comment(value: &str) -> String {
        value.replace(['\n', '\r', '\u{2028}', '\u{2029}'], " ")
    }
}
