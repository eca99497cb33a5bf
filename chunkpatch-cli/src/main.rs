mod config;

use camino::Utf8PathBuf;
use chunkpatch_core::{
    FsArtifactWriter, FsSnapshotSource, RewriteSettings, banner_line, run_rewrite, write_artifacts,
};
use chunkpatch_types::config::{RewriteConfig, USAGE};
use chunkpatch_types::report::{ToolInfo, VerdictStatus};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "chunkpatch",
    version,
    about = "Swap a bundler's static publicPath for a runtime global after the build."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rewrite the configured chunk's publicPath literal in place.
    Run(RunArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Stats file describing the completed build.
    #[arg(long)]
    stats: Utf8PathBuf,

    /// Expression for the global var you want to use as publicPath,
    /// e.g. `window.__ASSET_BASE__`.
    #[arg(long)]
    global: Option<String>,

    /// Name of the chunk in which to look for publicPath references.
    #[arg(long)]
    chunk: Option<String>,

    /// Override the public path recorded in the stats file.
    #[arg(long)]
    public_path: Option<String>,

    /// Directory for report artifacts (report.json, rewrite.md, patch.diff).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Config file (default: ./chunkpatch.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Run every step except the final write.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Exit non-zero on failures instead of only reporting them. Off by
    /// default so a post-build step never fails the surrounding build.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Run(args) => cmd_run(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("{}", banner_line(&format!("{e:#}")));
            ExitCode::from(1)
        }
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let file_cfg = config::resolve(args.config.as_deref())?;

    let config = RewriteConfig::new(
        args.global
            .or(file_cfg.rewrite.external_global)
            .unwrap_or_default(),
        args.chunk
            .or(file_cfg.rewrite.chunk_name)
            .unwrap_or_default(),
    );

    if !config.is_valid() {
        eprintln!("{}", banner_line("some mandatory option missing"));
        eprintln!("{USAGE}");
        return Ok(no_op_exit(args.strict));
    }

    let mut settings = RewriteSettings::new(args.stats, config);
    settings.public_path_override = args.public_path.or(file_cfg.rewrite.public_path);
    settings.out_dir = args.out_dir.or(file_cfg.output.dir);
    settings.dry_run = args.dry_run;

    let source = FsSnapshotSource::new(settings.stats_path.clone());
    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    let run = run_rewrite(&settings, &source, tool);

    let line = banner_line(&run.outcome.describe());
    match run.report.verdict.status {
        VerdictStatus::Pass => println!("{line}"),
        _ => eprintln!("{line}"),
    }

    if let Some(out_dir) = &settings.out_dir {
        write_artifacts(&run, out_dir, &FsArtifactWriter)?;
    }

    if !args.strict {
        return Ok(ExitCode::from(0));
    }
    Ok(match run.report.verdict.status {
        VerdictStatus::Pass => ExitCode::from(0),
        VerdictStatus::Warn => ExitCode::from(2),
        VerdictStatus::Fail | VerdictStatus::Unknown => ExitCode::from(1),
    })
}

fn no_op_exit(strict: bool) -> ExitCode {
    if strict {
        ExitCode::from(2)
    } else {
        ExitCode::from(0)
    }
}
