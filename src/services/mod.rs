//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `orcid.rs` — `WorkSource` trait; ORCID HTTP API and local mirror sources.
//! - `bibtex.rs` — BibTeX reader/writer and citation helpers.
//! - `publications.rs` — per-work entry building, ordering, refresh flow.
//! - `cache.rs` — freshness stamp next to the generated bibliography.
//! - `site.rs` — quarto/uv command plans, execution, prerequisite doctor.
//! - `config.rs` — `orcid-site.toml` loading and flag precedence.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod bibtex;
pub mod cache;
pub mod config;
pub mod orcid;
pub mod output;
pub mod publications;
pub mod site;
