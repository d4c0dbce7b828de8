use std::path::PathBuf;

use alphatune::Operation as _;
use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "alphatune", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the sidecar (or an explicit) settings document to a PNG.
    Apply(ApplyArgs),
    /// Restore a PNG from its `.bak` copy.
    Reset(ResetArgs),
    /// Print the default settings fragment of every registered operation.
    Defaults,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Settings document to apply instead of the `<image>.json` sidecar.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output PNG. Defaults to saving in place (a one-time `.bak` copy of
    /// the input is kept either way).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ResetArgs {
    /// PNG to restore from `<image>.bak`.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Reset(args) => cmd_reset(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let mut session = alphatune::Session::default();

    let report = session
        .open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    if let Some(settings_path) = &args.settings {
        session
            .load_settings_from(settings_path)
            .with_context(|| format!("load settings '{}'", settings_path.display()))?;
    }

    session
        .save(args.out.as_deref())
        .context("save processed image")?;

    let target = args.out.as_deref().unwrap_or(&args.in_path);
    println!(
        "wrote '{}' ({} operation(s) configured)",
        target.display(),
        session.settings().len()
    );
    Ok(())
}

fn cmd_reset(args: ResetArgs) -> anyhow::Result<()> {
    let mut session = alphatune::Session::default();
    session
        .open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?;
    session
        .reset()
        .with_context(|| format!("reset '{}'", args.in_path.display()))?;
    println!("restored '{}' from backup", args.in_path.display());
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    let registry = alphatune::OperationRegistry::with_builtins();
    let mut defaults = alphatune::SettingsMap::new();
    for op in registry.iter() {
        defaults.insert(op.key(), op.default_settings());
    }
    println!("{}", serde_json::to_string_pretty(&defaults)?);
    Ok(())
}
