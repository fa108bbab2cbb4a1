use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sceneval::{
    DirStore, PublishOutcome, ReportDocument, ReportFormat, ReportKeys, ReportingConfig, Scene,
    ValidationReport, Validator, ValidatorConfig,
};

#[derive(Parser, Debug)]
#[command(name = "sceneval", version, about = "Validate media-pipeline scene documents")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate one or more scene JSON files.
    Check(CheckArgs),
    /// Print the default rule configuration as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Scene JSON files, in narrative order.
    #[arg(required = true)]
    scenes: Vec<PathBuf>,

    /// Rule configuration JSON (defaults when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for exported reports.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Export format; overrides `reporting.format`.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Check continuity across the given scenes.
    #[arg(long, default_value_t = false)]
    batch: bool,

    /// Directory used as report store when `reporting.save_to_cloud` is set.
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Json,
    Html,
}

impl From<FormatArg> for ReportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Html => ReportFormat::Html,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Config => cmd_config(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_config() -> anyhow::Result<ExitCode> {
    let json = serde_json::to_string_pretty(&ValidatorConfig::default())
        .context("serialize default config")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => ValidatorConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => ValidatorConfig::default(),
    };
    if let Some(format) = args.format {
        config.reporting.format = format.into();
    }
    let validator = Validator::new(config)?;

    let mut ok = true;
    let mut scenes = Vec::with_capacity(args.scenes.len());
    let mut stems = Vec::with_capacity(args.scenes.len());
    for path in &args.scenes {
        match Scene::from_path(path) {
            Ok(scene) => {
                scenes.push(scene);
                stems.push(
                    path.file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                );
            }
            Err(e) => {
                ok = false;
                eprintln!("{}: {e}", path.display());
            }
        }
    }

    let reports = if args.batch {
        validator.validate_batch(&scenes)?
    } else {
        scenes.iter().map(|s| validator.validate(s)).collect()
    };

    let mut delivery = Delivery {
        reporting: &validator.config().reporting,
        output: args.output.as_deref(),
        store: args.store_dir.as_ref().map(DirStore::new),
        file_names: ReportKeys::new(),
        store_keys: ReportKeys::new(),
    };
    for ((scene, stem), report) in scenes.iter().zip(&stems).zip(&reports) {
        println!("{}\n", report.summary());
        ok &= report.pass;
        delivery.deliver(scene, stem, report)?;
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Writes and publishes the reports of one run; keys never repeat within the run.
struct Delivery<'a> {
    reporting: &'a ReportingConfig,
    output: Option<&'a Path>,
    store: Option<DirStore>,
    file_names: ReportKeys,
    store_keys: ReportKeys,
}

impl Delivery<'_> {
    fn deliver(&mut self, scene: &Scene, stem: &str, report: &ValidationReport) -> anyhow::Result<()> {
        let doc = ReportDocument::new(report).with_scene(scene);
        let scene_id = report.scene_id.as_deref();

        if let Some(dir) = self.output {
            let local = ReportingConfig {
                cloud_storage_path: None,
                ..self.reporting.clone()
            };
            let path = dir.join(self.file_names.allocate(&local, scene_id, stem));
            let written = sceneval::export_to_path(&doc, &path)?;
            eprintln!("wrote {}", written.display());
        }

        if self.reporting.save_to_cloud {
            let Some(store) = &self.store else {
                tracing::warn!("save_to_cloud is set but no --store-dir was given");
                return Ok(());
            };
            let key = self.store_keys.allocate(self.reporting, scene_id, stem);
            match sceneval::publish_as(&doc, self.reporting, store, &key) {
                PublishOutcome::Stored { location } => eprintln!("stored {location}"),
                PublishOutcome::Failed { reason } => eprintln!("report not stored: {reason}"),
                PublishOutcome::Skipped => {}
            }
        }
        Ok(())
    }
}
