use crate::cli::DEFAULT_CONFIG_FILE;
use crate::domain::constants::{
    DEFAULT_API_BASE, DEFAULT_CACHE_FILE, DEFAULT_MAX_AGE_DAYS, DEFAULT_OUTFILE,
    DEFAULT_TIMEOUT_MS, MAX_AGE_DAYS_LIMIT,
};
use crate::domain::models::{ConfigFile, Settings};
use crate::domain::orcid::OrcidId;
use crate::error::SiteError;
use std::path::{Path, PathBuf};

/// An explicit `--config` must exist; the implicit `./orcid-site.toml` is optional.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let file = match explicit {
        Some(p) => {
            let raw = std::fs::read_to_string(p)
                .map_err(|e| anyhow::anyhow!("config {}: {}", p.display(), e))?;
            toml::from_str(&raw)?
        }
        None => {
            let p = Path::new(DEFAULT_CONFIG_FILE);
            if p.exists() {
                tracing::debug!(path = %p.display(), "loading config");
                toml::from_str(&std::fs::read_to_string(p)?)?
            } else {
                ConfigFile::default()
            }
        }
    };
    Ok(settings_from(file)?)
}

pub fn settings_from(file: ConfigFile) -> Result<Settings, SiteError> {
    let max_age_days = file.max_age_days.unwrap_or(DEFAULT_MAX_AGE_DAYS);
    if !(0..=MAX_AGE_DAYS_LIMIT).contains(&max_age_days) {
        return Err(SiteError::Config(format!(
            "max_age_days must be between 0 and {}, got {}",
            MAX_AGE_DAYS_LIMIT, max_age_days
        )));
    }
    Ok(Settings {
        orcid_id: file.orcid_id,
        outfile: file.outfile.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTFILE)),
        cache_file: file
            .cache_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE)),
        max_age_days,
        api_base: file.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        timeout_ms: file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        site_dir: file.site_dir.unwrap_or_else(|| PathBuf::from(".")),
    })
}

pub fn resolve_orcid(flag: Option<&str>, settings: &Settings) -> anyhow::Result<OrcidId> {
    let raw = flag
        .or(settings.orcid_id.as_deref())
        .ok_or(SiteError::MissingOrcid)?;
    Ok(raw.parse()?)
}
