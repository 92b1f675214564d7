use crate::domain::constants::DEFAULT_PUBLISH_TARGET;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "orcid-site.toml";

#[derive(Parser, Debug)]
#[command(
    name = "orcid-site",
    version,
    about = "ORCID publication sync and Quarto site tooling"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (defaults to ./orcid-site.toml when present)"
    )]
    pub config: Option<PathBuf>,
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch works from ORCID and write the BibTeX publication list
    Fetch {
        #[arg(long, help = "ORCID iD, e.g. 0000-0002-1825-0097")]
        orcid: Option<String>,
        #[arg(long, help = "Output .bib file")]
        out: Option<PathBuf>,
        #[arg(long, help = "ORCID API base url or a local mirror directory")]
        api: Option<String>,
        #[arg(long, default_value_t = false, help = "Ignore the freshness cache")]
        force: bool,
    },
    /// List the works on an ORCID record without writing anything
    Works {
        #[arg(long)]
        orcid: Option<String>,
        #[arg(long)]
        api: Option<String>,
    },
    /// Inspect or clear the fetch freshness cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Preview, render, and publish the Quarto site
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    Status,
    Clear,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SiteArgs {
    #[arg(long, help = "Site directory containing _quarto.yml")]
    pub dir: Option<PathBuf>,
    #[arg(long, default_value_t = false, help = "Print the command instead of running it")]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum SiteCommands {
    /// Run `quarto preview`
    Preview {
        #[command(flatten)]
        args: SiteArgs,
    },
    /// Run `quarto render`
    Render {
        #[command(flatten)]
        args: SiteArgs,
    },
    /// Run `quarto publish <target>`
    Publish {
        #[command(flatten)]
        args: SiteArgs,
        #[arg(long, default_value = DEFAULT_PUBLISH_TARGET)]
        target: String,
        #[arg(long, default_value_t = false)]
        no_prompt: bool,
    },
    /// Run `uv sync`
    Sync {
        #[command(flatten)]
        args: SiteArgs,
    },
    /// Check local prerequisites for building and publishing
    Doctor {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
