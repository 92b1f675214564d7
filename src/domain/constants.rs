pub const DEFAULT_API_BASE: &str = "https://pub.orcid.org/v3.0";
pub const DEFAULT_OUTFILE: &str = "publications.bib";
pub const DEFAULT_CACHE_FILE: &str = ".cache/orcid_cache.json";
pub const DEFAULT_MAX_AGE_DAYS: i64 = 1;
pub const MAX_AGE_DAYS_LIMIT: i64 = 3650;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PUBLISH_TARGET: &str = "gh-pages";
