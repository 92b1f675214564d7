use crate::domain::models::{CacheStamp, FetchReport, Origin, Publication, WorkListing};
use crate::domain::orcid::{OrcidId, WorkDetail};
use crate::error::SiteError;
use crate::services::bibtex::{
    citekey_from_title, extract_year, extract_year_from_bibtex, normalize_doi, parse_entries,
    write_entry, BibEntry,
};
use crate::services::cache;
use crate::services::orcid::WorkSource;
use std::cmp::Ordering;
use std::path::Path;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Identifiers {
    pub doi: Option<String>,
    pub url: Option<String>,
}

/// The first DOI wins and ends the scan; a URL seen before it is kept too.
pub fn identifiers(detail: &WorkDetail) -> Identifiers {
    let mut ids = Identifiers::default();
    let Some(ext) = &detail.external_ids else {
        return ids;
    };
    for e in &ext.external_id {
        let ty = e.external_id_type.as_deref().unwrap_or("").to_ascii_lowercase();
        let value = e.external_id_value.clone().unwrap_or_default();
        if ty == "doi" {
            ids.doi = Some(value).filter(|v| !v.is_empty()).map(|v| normalize_doi(&v));
            break;
        } else if ty == "url" {
            ids.url = Some(value).filter(|v| !v.is_empty());
        }
    }
    ids
}

fn bibtex_citation(detail: &WorkDetail) -> Option<&str> {
    let c = detail.citation.as_ref()?;
    let is_bibtex = c
        .citation_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("bibtex"));
    c.citation_value
        .as_deref()
        .filter(|v| is_bibtex && !v.trim().is_empty())
}

pub fn build_publication(put_code: i64, detail: &WorkDetail) -> Publication {
    let ids = identifiers(detail);
    if let Some(doi) = &ids.doi {
        tracing::debug!(put_code, %doi, "doi found");
    } else if let Some(url) = &ids.url {
        tracing::debug!(put_code, %url, "url found");
    }

    match bibtex_citation(detail) {
        Some(text) => from_citation(put_code, text, &ids),
        None => {
            tracing::info!(put_code, "no BibTeX citation, building entry from metadata");
            synthesize(put_code, detail, &ids)
        }
    }
}

fn from_citation(put_code: i64, text: &str, ids: &Identifiers) -> Publication {
    let first = parse_entries(text).and_then(|entries| {
        entries.into_iter().next().ok_or(SiteError::Bibtex {
            offset: 0,
            message: "no entries".to_string(),
        })
    });
    match first {
        Ok(mut entry) => {
            match (&ids.doi, &ids.url) {
                (Some(doi), _) if entry.get("doi").is_none() => entry.set("doi", doi.as_str()),
                (_, Some(url)) if entry.get("url").is_none() => entry.set("url", url.as_str()),
                _ => {}
            }
            Publication {
                put_code,
                year: entry.get("year").and_then(extract_year),
                origin: Origin::Citation,
                bibtex: write_entry(&entry),
            }
        }
        Err(e) => {
            tracing::warn!(put_code, error = %e, "citation did not parse, keeping it verbatim");
            let raw = text.trim().to_string();
            Publication {
                put_code,
                year: extract_year_from_bibtex(&raw),
                origin: Origin::Raw,
                bibtex: raw,
            }
        }
    }
}

fn synthesize(put_code: i64, detail: &WorkDetail, ids: &Identifiers) -> Publication {
    let title = detail.title_text().unwrap_or("untitled");
    let mut entry = BibEntry::new("misc", &citekey_from_title(title, put_code));
    entry.set("title", title);

    let year = detail.year_text().filter(|y| !y.is_empty());
    if let Some(y) = year {
        entry.set("year", y);
    }
    let authors = detail.credit_names();
    if !authors.is_empty() {
        entry.set("author", authors.join(" and "));
    }
    if let Some(journal) = detail.journal_text().filter(|j| !j.is_empty()) {
        entry.set("journal", journal);
    }
    if let Some(doi) = &ids.doi {
        entry.set("doi", doi.as_str());
    } else if let Some(url) = &ids.url {
        entry.set("url", url.as_str());
    }

    Publication {
        put_code,
        year: year.and_then(extract_year),
        origin: Origin::Synthesized,
        bibtex: write_entry(&entry),
    }
}

/// Newest first, unknown years last, then by entry text (case-insensitive).
pub fn sort_publications(pubs: &mut [Publication]) {
    pubs.sort_by(|a, b| {
        a.year
            .is_none()
            .cmp(&b.year.is_none())
            .then_with(|| b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0)))
            .then_with(|| compare_text(&a.bibtex, &b.bibtex))
    });
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn render_bibliography(pubs: &[Publication]) -> String {
    pubs.iter()
        .map(|p| p.bibtex.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn fetch_publications(
    source: &dyn WorkSource,
    id: &OrcidId,
) -> anyhow::Result<Vec<Publication>> {
    let works = source.list_works(id)?;
    let total = works.len();
    tracing::info!(orcid = %id, source = %source.describe(), total, "fetching ORCID works");

    let mut pubs = Vec::with_capacity(total);
    for (i, w) in works.iter().enumerate() {
        tracing::info!(put_code = w.put_code, "fetching citation {}/{}", i + 1, total);
        let detail = source
            .work_detail(id, w.put_code)
            .map_err(|e| SiteError::Work {
                put_code: w.put_code,
                message: format!("{:#}", e),
            })?;
        let p = build_publication(w.put_code, &detail);
        tracing::debug!(put_code = w.put_code, citation = %p.bibtex, "citation");
        pubs.push(p);
    }
    sort_publications(&mut pubs);
    Ok(pubs)
}

pub fn list_works(source: &dyn WorkSource, id: &OrcidId) -> anyhow::Result<Vec<WorkListing>> {
    Ok(source
        .list_works(id)?
        .into_iter()
        .map(|w| WorkListing {
            put_code: w.put_code,
            title: w
                .title
                .as_ref()
                .and_then(|t| t.text())
                .unwrap_or("untitled")
                .to_string(),
        })
        .collect())
}

pub struct RefreshOptions<'a> {
    pub outfile: &'a Path,
    pub cache_file: &'a Path,
    pub max_age_days: i64,
    pub force: bool,
}

pub fn refresh(
    source: &dyn WorkSource,
    id: &OrcidId,
    opts: &RefreshOptions<'_>,
) -> anyhow::Result<FetchReport> {
    let outfile = opts.outfile.to_string_lossy().to_string();
    if !opts.force {
        match cache::fresh_stamp(opts.cache_file, opts.max_age_days) {
            Ok(Some(stamp)) => {
                tracing::info!(last_fetch = %stamp.last_fetch, "ORCID cache is up to date");
                return Ok(FetchReport {
                    status: "cached".to_string(),
                    outfile,
                    count: 0,
                    changed: false,
                    last_fetch: Some(stamp.last_fetch),
                    publications: Vec::new(),
                });
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cache could not be read, fetching fresh"),
        }
    }

    let pubs = fetch_publications(source, id)?;
    let text = render_bibliography(&pubs);
    let digest = cache::digest(&text);

    let previous = std::fs::read_to_string(opts.outfile)
        .ok()
        .map(|t| cache::digest(&t));
    let changed = previous.as_deref() != Some(digest.as_str());
    if changed {
        if let Some(parent) = opts.outfile.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(opts.outfile, &text)?;
    }

    let stamp = CacheStamp {
        last_fetch: cache::now_stamp(),
        digest: Some(digest),
    };
    cache::save_stamp(opts.cache_file, &stamp)?;
    tracing::info!(count = pubs.len(), %outfile, changed, "publications saved");

    Ok(FetchReport {
        status: if changed { "written" } else { "unchanged" }.to_string(),
        outfile,
        count: pubs.len(),
        changed,
        last_fetch: Some(stamp.last_fetch),
        publications: pubs,
    })
}
