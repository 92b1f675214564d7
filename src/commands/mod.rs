//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `publications.rs` — fetch/works/cache command trees.
//! - `site.rs` — preview/render/publish/sync/doctor.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod publications;
pub mod site;

pub use publications::handle_publication_commands;
pub use site::handle_site_commands;
