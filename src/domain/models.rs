use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// On-disk `orcid-site.toml`. Every key is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub orcid_id: Option<String>,
    #[serde(default)]
    pub outfile: Option<PathBuf>,
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
    #[serde(default)]
    pub max_age_days: Option<i64>,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub site_dir: Option<PathBuf>,
}

/// Config file merged with defaults; CLI flags are applied on top per command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub orcid_id: Option<String>,
    pub outfile: PathBuf,
    pub cache_file: PathBuf,
    pub max_age_days: i64,
    pub api_base: String,
    pub timeout_ms: u64,
    pub site_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheStamp {
    pub last_fetch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// ORCID BibTeX citation, re-formatted.
    Citation,
    /// ORCID BibTeX citation kept verbatim because it did not parse.
    Raw,
    /// Built from the work's metadata; ORCID had no BibTeX citation.
    Synthesized,
}

#[derive(Debug, Serialize, Clone)]
pub struct Publication {
    pub put_code: i64,
    pub year: Option<i32>,
    pub origin: Origin,
    pub bibtex: String,
}

#[derive(Serialize)]
pub struct FetchReport {
    pub status: String,
    pub outfile: String,
    pub count: usize,
    pub changed: bool,
    pub last_fetch: Option<String>,
    pub publications: Vec<Publication>,
}

#[derive(Serialize, Clone)]
pub struct WorkListing {
    pub put_code: i64,
    pub title: String,
}

#[derive(Serialize)]
pub struct CacheStatus {
    pub path: String,
    pub exists: bool,
    pub last_fetch: Option<String>,
    pub fresh: bool,
    pub max_age_days: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: String,
}

#[derive(Serialize)]
pub struct CheckItem {
    pub name: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct DoctorReport {
    pub overall: String,
    pub site_dir: String,
    pub checks: Vec<CheckItem>,
    pub recommendations: Vec<String>,
}
