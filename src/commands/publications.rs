use crate::services::config::resolve_orcid;
use crate::services::orcid::open_source;
use crate::services::publications::{list_works, refresh, RefreshOptions};
use crate::services::cache;
use crate::*;

pub fn handle_publication_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Fetch {
            orcid,
            out,
            api,
            force,
        } => {
            let id = resolve_orcid(orcid.as_deref(), settings)?;
            let api = api.as_deref().unwrap_or(&settings.api_base);
            let source = open_source(api, settings.timeout_ms)?;
            let outfile = out.as_deref().unwrap_or(&settings.outfile);
            let report = refresh(
                source.as_ref(),
                &id,
                &RefreshOptions {
                    outfile,
                    cache_file: &settings.cache_file,
                    max_age_days: settings.max_age_days,
                    force: *force,
                },
            )?;
            print_one(cli.json, report, |r| match r.status.as_str() {
                "cached" => vec![format!(
                    "ORCID cache is up to date (last fetched {}); no fetch needed",
                    r.last_fetch.as_deref().unwrap_or("unknown")
                )],
                "unchanged" => vec![format!(
                    "{} publications from ORCID; {} already up to date",
                    r.count, r.outfile
                )],
                _ => vec![format!(
                    "{} publications from ORCID saved to {}",
                    r.count, r.outfile
                )],
            })?;
        }
        Commands::Works { orcid, api } => {
            let id = resolve_orcid(orcid.as_deref(), settings)?;
            let api = api.as_deref().unwrap_or(&settings.api_base);
            let source = open_source(api, settings.timeout_ms)?;
            let works = list_works(source.as_ref(), &id)?;
            print_out(cli.json, &works, |w| format!("{}\t{}", w.put_code, w.title))?;
        }
        Commands::Cache { command } => match command {
            CacheCommands::Status => {
                let status = cache::status(&settings.cache_file, settings.max_age_days);
                print_one(cli.json, status, |s| {
                    vec![
                        format!("path: {}", s.path),
                        format!("last_fetch: {}", s.last_fetch.as_deref().unwrap_or("never")),
                        format!("fresh: {}", s.fresh),
                    ]
                })?;
            }
            CacheCommands::Clear => {
                let removed = cache::clear(&settings.cache_file)?;
                print_one(cli.json, removed, |r| {
                    vec![if *r {
                        "cache cleared".to_string()
                    } else {
                        "no cache to clear".to_string()
                    }]
                })?;
            }
        },
        _ => return Ok(false),
    }
    Ok(true)
}
