use crate::services::site::{doctor, execute, plan, render_plan, SiteAction};
use crate::*;

fn run_action(
    cli: &Cli,
    settings: &Settings,
    args: &SiteArgs,
    action: SiteAction,
) -> anyhow::Result<()> {
    let dir = args.dir.as_deref().unwrap_or(&settings.site_dir);
    let p = plan(&action, dir);
    if !args.dry_run {
        execute(&p)?;
    }
    let status = if args.dry_run { "planned" } else { "completed" };
    print_one(
        cli.json,
        serde_json::json!({ "status": status, "command": p }),
        |_| {
            if args.dry_run {
                vec![render_plan(&p)]
            } else {
                Vec::new()
            }
        },
    )
}

pub fn handle_site_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    let Commands::Site { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        SiteCommands::Preview { args } => run_action(cli, settings, args, SiteAction::Preview)?,
        SiteCommands::Render { args } => run_action(cli, settings, args, SiteAction::Render)?,
        SiteCommands::Publish {
            args,
            target,
            no_prompt,
        } => run_action(
            cli,
            settings,
            args,
            SiteAction::Publish {
                target: target.clone(),
                no_prompt: *no_prompt,
            },
        )?,
        SiteCommands::Sync { args } => run_action(cli, settings, args, SiteAction::Sync)?,
        SiteCommands::Doctor { dir } => {
            let dir = dir.as_deref().unwrap_or(&settings.site_dir);
            let report = doctor(dir);
            print_one(cli.json, report, |r| {
                let mut lines = vec![format!("overall: {}", r.overall)];
                lines.extend(r.checks.iter().map(|c| format!("{}\t{}", c.name, c.status)));
                lines.extend(r.recommendations.iter().map(|s| format!("hint: {}", s)));
                lines
            })?;
        }
    }

    Ok(true)
}
