//! Shortcode allocation and click-tracking engine.
//!
//! [`Engine`] is the only component that mutates the record collection. It
//! exposes five operations: [`Engine::shorten`], [`Engine::list_all`],
//! [`Engine::lookup`], [`Engine::track_click`] and [`Engine::purge_expired`].
//! Redirecting and rendering belong to the caller; [`tasks`] holds the
//! async helpers the CLI uses for the redirect delay and the expiry sweep.

pub mod dashboard;
pub mod engine;
pub mod enrich;
pub mod settings;
pub mod tasks;

pub use dashboard::{Dashboard, Summary};
pub use engine::Engine;
pub use enrich::{ClickEnricher, Enrichment, FixedEnricher, RandomEnricher};
pub use settings::EngineSettings;
