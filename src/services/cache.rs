use crate::domain::models::{CacheStamp, CacheStatus};
use chrono::{DateTime, Duration, Local, NaiveDateTime};
use sha2::{Digest, Sha256};
use std::path::Path;

const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn now_stamp() -> String {
    Local::now().naive_local().format(STAMP_FORMAT).to_string()
}

/// Accepts naive local ISO-8601 (what we write) and RFC 3339 with an offset.
pub fn parse_stamp(raw: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(t);
    }
    let t = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| anyhow::anyhow!("bad last_fetch timestamp {:?}: {}", raw, e))?;
    Ok(t.with_timezone(&Local).naive_local())
}

pub fn is_fresh(last_fetch: NaiveDateTime, now: NaiveDateTime, max_age_days: i64) -> bool {
    match Duration::try_days(max_age_days) {
        Some(max_age) => now - last_fetch < max_age,
        None => true,
    }
}

pub fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn load_stamp(path: &Path) -> anyhow::Result<Option<CacheStamp>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn save_stamp(path: &Path, stamp: &CacheStamp) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(stamp)?)?;
    Ok(())
}

/// `Ok(Some(stamp))` when the cache says a fetch is not needed yet.
pub fn fresh_stamp(path: &Path, max_age_days: i64) -> anyhow::Result<Option<CacheStamp>> {
    let Some(stamp) = load_stamp(path)? else {
        return Ok(None);
    };
    let last = parse_stamp(&stamp.last_fetch)?;
    if is_fresh(last, Local::now().naive_local(), max_age_days) {
        Ok(Some(stamp))
    } else {
        Ok(None)
    }
}

pub fn status(path: &Path, max_age_days: i64) -> CacheStatus {
    let stamp = match load_stamp(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cache file unreadable");
            None
        }
    };
    let fresh = stamp
        .as_ref()
        .and_then(|s| parse_stamp(&s.last_fetch).ok())
        .map(|t| is_fresh(t, Local::now().naive_local(), max_age_days))
        .unwrap_or(false);
    CacheStatus {
        path: path.to_string_lossy().to_string(),
        exists: path.exists(),
        last_fetch: stamp.map(|s| s.last_fetch),
        fresh,
        max_age_days,
    }
}

pub fn clear(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    Ok(true)
}
