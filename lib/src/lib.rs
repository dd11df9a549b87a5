#![doc = svgbobdoc::transform!(
//! Derives website prototypes from a short business description and renders
//! them into every artifact a prototype needs.
//!
//! # Overview
//!
//! A prototype starts as a [`RawInput`]: a goal, a business name, the nature
//! of the business's work, and its target audience. Fixed [`rules`] turn that
//! input into an immutable [`SiteDescription`], which every renderer then
//! projects independently:
//!
//! ```svgbob
//!  +----------+     +-------+     +-----------------+
//!  | RawInput |---->| rules |---->| SiteDescription |
//!  +----------+     +-------+     +--------+--------+
//!                                          |
//!        +----------------+----------------+----------------+
//!        |                |                |                |
//!  +-----+-----+   +------+------+   +-----+------+   +-----+----+
//!  |  markup   |   | source text |   | style cfg  |   | manifest |
//!  | document  |   |  (TSX)      |   |            |   |          |
//!  +-----+-----+   +------+------+   +-----+------+   +-----+----+
//!        |                |                |                |
//!        |                +--------+-------+----------------+
//!        v                         v
//!  +-----------+             +-----------+
//!  |  Preview  |             |  Bundle   |
//!  +-----------+             +-----------+
//! ```
//!
//! Every projection is a pure function of the description: rendering the same
//! description twice yields identical text, and the only varying field in an
//! export [`Bundle`] is its generation timestamp.
//!
//! # Escaping
//!
//! Descriptions hold user text verbatim. Renderers escape it for the context
//! it lands in: HTML for markup, JSX for component source, and comment-safe
//! text for configuration files. Component and package names are derived with
//! [`util::identifier()`] and [`util::slugify()`], which transliterate and
//! never yield an empty or invalid name.
//!
//! # Generation
//!
//! A [`Studio`] owns the current prototype and its `Idle -> Generating ->
//! Ready` lifecycle, with simulated latency standing in for content research.
//! At most one generation is in flight at a time; resetting cancels it.
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod input;
pub mod rules;
pub mod site;
pub mod config;
pub mod render;
pub mod bundle;
pub mod studio;

pub use input::{Goal, RawInput};
pub use site::SiteDescription;
pub use config::Settings;
pub use render::{Artifacts, Manifest, Renderer, Wrapper};
pub use bundle::{Bundle, SCHEMA_VERSION};
pub use studio::{Export, Preview, Status, Studio};
