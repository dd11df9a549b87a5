//! The prototype controller.
//!
//! A [`Studio`] owns the single current prototype and moves it through three
//! states:
//!
//! ```text
//!            generate()            (latency elapses)
//!   Idle ----------------> Generating ----------------> Ready
//!    ^                        |                           |
//!    +------- reset() --------+---------- reset() --------+
//! ```
//!
//! Only one generation may be in flight: a second request made while
//! generating fails with [`ErrorKind::GenerationConflict`]. Resetting during a
//! generation cancels it, and a cancelled generation never publishes its
//! description.
//!
//! [`ErrorKind::GenerationConflict`]: crate::error::ErrorKind::GenerationConflict

use std::sync::Arc;

use derive_more::Debug;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bundle::Bundle;
use crate::config::Settings;
use crate::error::Result;
use crate::input::RawInput;
use crate::render::{Artifacts, Renderer};
use crate::site::SiteDescription;

/// A snapshot of a [`Studio`]'s state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Generating,
    Ready,
}

#[derive(Debug)]
enum State {
    Idle,
    Generating { id: u64, token: CancellationToken },
    Ready(Arc<SiteDescription>),
}

#[derive(Debug)]
struct Inner {
    state: State,
    generations: u64,
}

/// The live preview of the current prototype.
#[derive(Debug, Clone)]
pub struct Preview {
    /// `<business name> - Live Preview`.
    pub title: String,
    /// The fragment to embed inline.
    pub markup: String,
    /// The same fragment as a standalone document.
    pub document: String,
}

/// The current prototype, ready to be saved.
#[derive(Debug, Clone)]
pub struct Export {
    pub file_name: String,
    /// The bundle as pretty-printed JSON.
    pub contents: String,
    pub bundle: Bundle,
}

#[derive(Debug)]
pub struct Studio {
    renderer: Arc<Renderer>,
    #[debug(ignore)]
    inner: Mutex<Inner>,
}

/// Returns the studio to `Idle` if generation `id` is abandoned before it
/// publishes or is cancelled.
struct Pending<'a> {
    studio: &'a Studio,
    id: u64,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let mut inner = self.studio.inner.lock();
        if matches!(inner.state, State::Generating { id, .. } if id == self.id) {
            debug!(generation = self.id, "generation abandoned");
            inner.state = State::Idle;
        }
    }
}

impl Studio {
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Studio::with_renderer(Arc::new(Renderer::new(settings)?)))
    }

    pub fn with_renderer(renderer: Arc<Renderer>) -> Self {
        Studio {
            renderer,
            inner: Mutex::new(Inner { state: State::Idle, generations: 0 }),
        }
    }

    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }

    fn settings(&self) -> &Settings {
        self.renderer.settings()
    }

    pub fn status(&self) -> Status {
        match self.inner.lock().state {
            State::Idle => Status::Idle,
            State::Generating { .. } => Status::Generating,
            State::Ready(_) => Status::Ready,
        }
    }

    /// The ready prototype, if any.
    pub fn current(&self) -> Option<Arc<SiteDescription>> {
        match &self.inner.lock().state {
            State::Ready(site) => Some(site.clone()),
            _ => None,
        }
    }

    fn ready(&self) -> Result<Arc<SiteDescription>> {
        match self.current() {
            Some(site) => Ok(site),
            None => err!(kind = NotReady, "no prototype has been generated"),
        }
    }

    /// Generates a prototype from `input` and makes it the current one,
    /// discarding any previous prototype.
    ///
    /// Fails if `input` is invalid, if another generation is in flight, or if
    /// the studio is reset before this generation completes.
    pub async fn generate(&self, input: RawInput) -> Result<Arc<SiteDescription>> {
        let site = Arc::new(SiteDescription::derive(&input)?);
        let (id, token) = {
            let mut inner = self.inner.lock();
            if let State::Generating { id, .. } = inner.state {
                warn!(generation = id, "rejected generation request: already generating");
                return err! {
                    kind = GenerationConflict,
                    "a prototype is already being generated",
                    "in-flight generation" => id,
                };
            }

            inner.generations += 1;
            let (id, token) = (inner.generations, CancellationToken::new());
            inner.state = State::Generating { id, token: token.clone() };
            (id, token)
        };

        let _pending = Pending { studio: self, id };
        info!(generation = id, business = site.business_name(), goal = %site.goal(), "generating prototype");
        tokio::select! {
            biased;
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(self.settings().generation_delay()) => {}
        }

        let mut inner = self.inner.lock();
        let live = matches!(inner.state, State::Generating { id: current, .. } if current == id);
        if !live || token.is_cancelled() {
            info!(generation = id, "generation cancelled");
            return err! {
                kind = Cancelled,
                "prototype generation was cancelled",
                "generation" => id,
            };
        }

        inner.state = State::Ready(site.clone());
        info!(generation = id, sections = site.sections().len(), "prototype ready");
        Ok(site)
    }

    /// Discards the current prototype, cancelling an in-flight generation.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        match std::mem::replace(&mut inner.state, State::Idle) {
            State::Generating { id, token } => {
                token.cancel();
                info!(generation = id, "reset cancelled generation");
            }
            State::Ready(site) => debug!(business = site.business_name(), "discarded prototype"),
            State::Idle => {}
        }
    }

    /// Renders every artifact of the current prototype.
    pub fn artifacts(&self) -> Result<Artifacts> {
        let site = self.ready()?;
        self.renderer.artifacts(&site)
    }

    /// The current prototype's component source text.
    pub fn view_source(&self) -> Result<String> {
        let site = self.ready()?;
        self.renderer.source_text(&site)
    }

    /// Prepares a live preview of the current prototype. Once started, the
    /// preview completes even if the studio is reset meanwhile.
    pub async fn open_preview(&self) -> Result<Preview> {
        let site = self.ready()?;
        tokio::time::sleep(self.settings().preview_delay()).await;

        debug!(business = site.business_name(), "opening preview");
        Ok(Preview {
            title: format!("{} - Live Preview", site.business_name()),
            markup: self.renderer.markup(&site)?,
            document: self.renderer.document(&site)?,
        })
    }

    /// Bundles the current prototype for download. Once started, the export
    /// completes even if the studio is reset meanwhile.
    pub async fn export(&self) -> Result<Export> {
        let site = self.ready()?;
        tokio::time::sleep(self.settings().export_delay()).await;

        let bundle = Bundle::new(&self.renderer, &site)?;
        let export = Export {
            file_name: bundle.file_name(),
            contents: bundle.to_json()?,
            bundle,
        };

        info!(file = %export.file_name, bytes = export.contents.len(), "export ready");
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ErrorKind;
    use crate::input::Goal;

    static_assertions::assert_impl_all!(Studio: Send, Sync);

    fn studio() -> Studio {
        Studio::new(Settings::default()).unwrap()
    }

    fn acme() -> RawInput {
        RawInput::new(Goal::ECommerce, "Acme Co", "furniture retail", "homeowners")
    }

    #[tokio::test(start_paused = true)]
    async fn generation_moves_idle_to_ready() {
        let studio = studio();
        assert_eq!(studio.status(), Status::Idle);
        assert!(studio.current().is_none());

        let start = tokio::time::Instant::now();
        let site = studio.generate(acme()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(3000));
        assert_eq!(studio.status(), Status::Ready);
        assert_eq!(studio.current().unwrap(), site);
        assert_eq!(site.sections()[3], "Products");

        studio.reset();
        assert_eq!(studio.status(), Status::Idle);
        assert!(studio.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn status_is_generating_while_in_flight() {
        let studio = studio();
        let (site, status) = tokio::join!(
            studio.generate(acme()),
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                studio.status()
            },
        );

        assert!(site.is_ok());
        assert_eq!(status, Status::Generating);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_generation_is_rejected() {
        let studio = studio();
        let (first, second) = tokio::join!(
            studio.generate(acme()),
            async {
                tokio::task::yield_now().await;
                studio.generate(RawInput::new(Goal::Portfolio, "Other", "art", "collectors")).await
            },
        );

        assert_eq!(first.unwrap().business_name(), "Acme Co");
        assert_eq!(second.unwrap_err().kind(), ErrorKind::GenerationConflict);
        assert_eq!(studio.current().unwrap().business_name(), "Acme Co");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_generation_without_publishing() {
        let studio = studio();
        let (result, ()) = tokio::join!(
            studio.generate(acme()),
            async {
                tokio::time::sleep(Duration::from_millis(1000)).await;
                studio.reset();
            },
        );

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
        assert_eq!(studio.status(), Status::Idle);
        assert!(studio.current().is_none());

        // A cancelled generation doesn't block the next one.
        assert!(studio.generate(acme()).await.is_ok());
        assert_eq!(studio.status(), Status::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_generation_returns_to_idle() {
        let studio = studio();
        let timed_out = tokio::time::timeout(Duration::from_millis(10), studio.generate(acme())).await;
        assert!(timed_out.is_err());
        assert_eq!(studio.status(), Status::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn new_generation_replaces_ready_prototype() {
        let studio = studio();
        studio.generate(acme()).await.unwrap();
        let next = RawInput::new(Goal::LandingPage, "Bright Dental", "dentistry", "families");
        studio.generate(next).await.unwrap();
        assert_eq!(studio.current().unwrap().business_name(), "Bright Dental");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_input_never_leaves_idle() {
        let studio = studio();
        let error = studio.generate(RawInput::new(Goal::Portfolio, "", "x", "y")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(studio.status(), Status::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn preview_and_export_require_a_prototype() {
        let studio = studio();
        assert_eq!(studio.open_preview().await.unwrap_err().kind(), ErrorKind::NotReady);
        assert_eq!(studio.export().await.unwrap_err().kind(), ErrorKind::NotReady);
        assert_eq!(studio.view_source().unwrap_err().kind(), ErrorKind::NotReady);
        assert_eq!(studio.artifacts().unwrap_err().kind(), ErrorKind::NotReady);
    }

    #[tokio::test(start_paused = true)]
    async fn preview_renders_current_prototype() {
        let studio = studio();
        studio.generate(acme()).await.unwrap();

        let start = tokio::time::Instant::now();
        let preview = studio.open_preview().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(preview.title, "Acme Co - Live Preview");
        assert_eq!(preview.markup.matches("Acme Co").count(), 2);
        assert!(preview.document.contains(preview.markup.trim()));
        assert!(studio.view_source().unwrap().contains("export default AcmeCo;"));
    }

    #[tokio::test(start_paused = true)]
    async fn export_completes_after_reset() {
        let studio = studio();
        studio.generate(acme()).await.unwrap();

        let (export, ()) = tokio::join!(studio.export(), async { studio.reset() });
        let export = export.unwrap();
        assert_eq!(export.file_name, "acme-co-prototype-complete.json");
        assert_eq!(Bundle::from_json(&export.contents).unwrap().structure, export.bundle.structure);
        assert_eq!(export.bundle.name, "Acme Co");
        assert_eq!(studio.status(), Status::Idle);
    }

    #[tokio::test]
    async fn immediate_settings_skip_latency() {
        let studio = Studio::new(Settings::immediate()).unwrap();
        studio.generate(acme()).await.unwrap();
        assert!(studio.export().await.is_ok());
        assert!(studio.artifacts().unwrap().source.contains("AcmeCo"));
    }
}
