//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — config, cache stamp, report/output structs.
//! - `orcid.rs` — ORCID iD newtype and the read-only ORCID v3.0 wire types.
//! - `constants.rs` — defaults shared by config and commands.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in the report structs change `--json` output.

pub mod constants;
pub mod models;
pub mod orcid;
