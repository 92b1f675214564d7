//! Build/publish delegation to the external `quarto` and `uv` binaries, plus
//! a read-only prerequisite check of the site directory.

use crate::domain::models::{CheckItem, CommandPlan, DoctorReport};
use crate::error::SiteError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteAction {
    Preview,
    Render,
    Publish { target: String, no_prompt: bool },
    Sync,
}

pub fn plan(action: &SiteAction, site_dir: &Path) -> CommandPlan {
    let (program, args): (&str, Vec<String>) = match action {
        SiteAction::Preview => ("quarto", vec!["preview".into()]),
        SiteAction::Render => ("quarto", vec!["render".into()]),
        SiteAction::Publish { target, no_prompt } => {
            let mut args = vec!["publish".to_string(), target.clone()];
            if *no_prompt {
                args.push("--no-prompt".into());
            }
            ("quarto", args)
        }
        SiteAction::Sync => ("uv", vec!["sync".into()]),
    };
    CommandPlan {
        program: program.to_string(),
        args,
        cwd: site_dir.to_string_lossy().to_string(),
    }
}

pub fn render_plan(p: &CommandPlan) -> String {
    let mut parts = vec![p.program.clone()];
    parts.extend(p.args.iter().cloned());
    let cwd = if p.cwd.chars().any(char::is_whitespace) {
        format!("'{}'", p.cwd.replace('\'', "'\\''"))
    } else {
        p.cwd.clone()
    };
    format!("(cd {} && {})", cwd, parts.join(" "))
}

/// Runs the plan with inherited stdio and waits for it.
pub fn execute(p: &CommandPlan) -> anyhow::Result<()> {
    tracing::info!(program = %p.program, args = ?p.args, cwd = %p.cwd, "running");
    let status = std::process::Command::new(&p.program)
        .args(&p.args)
        .current_dir(&p.cwd)
        .status()
        .map_err(|e| anyhow::anyhow!("could not start `{}`: {}", p.program, e))?;
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(SiteError::ChildFailed {
            program: p.program.clone(),
            code,
        }
        .into()),
        None => Err(SiteError::ChildKilled {
            program: p.program.clone(),
        }
        .into()),
    }
}

pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| {
            let candidates = [dir.join(program), dir.join(format!("{}.exe", program))];
            candidates.into_iter()
        })
        .find(|p| p.is_file())
}

fn has_gh_pages_branch(site_dir: &Path) -> bool {
    let git = site_dir.join(".git");
    if git.join("refs/heads/gh-pages").is_file() {
        return true;
    }
    std::fs::read_to_string(git.join("packed-refs"))
        .map(|raw| {
            raw.lines()
                .any(|l| l.trim_end().ends_with(" refs/heads/gh-pages"))
        })
        .unwrap_or(false)
}

fn check(name: &str, ok: bool, missing: &str) -> CheckItem {
    CheckItem {
        name: name.to_string(),
        status: if ok { "ok" } else { missing }.to_string(),
    }
}

pub fn doctor(site_dir: &Path) -> DoctorReport {
    let quarto = find_on_path("quarto").is_some();
    let uv = find_on_path("uv").is_some();
    let project = site_dir.join("_quarto.yml").is_file();
    let freeze = site_dir.join("_freeze").is_dir();
    let workflow = site_dir.join(".github/workflows/deploy.yml").is_file();
    let gh_pages = has_gh_pages_branch(site_dir);

    let checks = vec![
        check("quarto_on_path", quarto, "missing"),
        check("uv_on_path", uv, "missing"),
        check("quarto_project", project, "missing"),
        check("freeze_dir", freeze, "missing"),
        check("deploy_workflow", workflow, "missing"),
        check("gh_pages_branch", gh_pages, "missing"),
    ];

    let mut recommendations = Vec::new();
    if !quarto {
        recommendations.push("Install Quarto from https://quarto.org/docs/get-started/.".to_string());
    }
    if !uv {
        recommendations.push("Install uv, then run `orcid-site site sync`.".to_string());
    }
    if !project {
        recommendations.push("Point --dir at the directory containing _quarto.yml.".to_string());
    }
    if !freeze {
        recommendations.push(
            "Run `orcid-site site render` and commit _freeze so CI can build without recomputing."
                .to_string(),
        );
    }
    if !gh_pages {
        recommendations.push(
            "Run `orcid-site site publish` once locally to create the gh-pages branch before relying on CI."
                .to_string(),
        );
    }
    if !workflow {
        recommendations.push(
            "Add .github/workflows/deploy.yml to publish on push to main.".to_string(),
        );
    }

    let overall = if checks.iter().all(|c| c.status == "ok") {
        "ok"
    } else {
        "needs_attention"
    }
    .to_string();

    DoctorReport {
        overall,
        site_dir: site_dir.to_string_lossy().to_string(),
        checks,
        recommendations,
    }
}
