use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::debug;
use sheetprobe_core::{Inspector, PlanConfig, read_workbook};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "sheetprobe")]
#[command(about = "Print fixed cell ranges of a workbook for manual review", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS workbook to inspect
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Path to an inspection plan (TOML); defaults to the bridging calculator plan
    #[arg(short, long, value_name = "PLAN")]
    plan: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// List the workbook's sheets and exit
    #[arg(long)]
    list_sheets: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Plain text report, printed section by section
    Human,
    /// JSON output of the complete report
    Json,
}

fn load_plan(cli: &Cli) -> Result<PlanConfig> {
    if let Some(plan_path) = &cli.plan {
        return PlanConfig::from_file(plan_path)
            .with_context(|| format!("Failed to load plan from {}", plan_path.display()));
    }

    // Fall back to a plan in the current directory, then the built-in one
    let default_plan_path = PathBuf::from("sheetprobe.toml");
    if default_plan_path.exists() {
        debug!("Using plan {}", default_plan_path.display());
        PlanConfig::from_file(&default_plan_path).with_context(|| {
            format!(
                "Failed to load plan from {}",
                default_plan_path.display()
            )
        })
    } else {
        PlanConfig::bridging()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    // Listing sheets needs no plan
    if cli.list_sheets {
        let workbook = read_workbook(&cli.file)
            .with_context(|| format!("Failed to read file: {}", cli.file.display()))?;
        formatter::print_sheet_names(&workbook);
        return Ok(());
    }

    // Validate the plan before touching the workbook
    let plan = load_plan(cli)?.compile().context("Invalid plan")?;
    debug!("Plan reads sheets: {}", plan.sheet_names().join(", "));
    let inspector = Inspector::with_plan(plan);

    let workbook = read_workbook(&cli.file)
        .with_context(|| format!("Failed to read file: {}", cli.file.display()))?;

    match cli.format {
        OutputFormat::Human => formatter::print_streamed(&inspector, &workbook)
            .with_context(|| format!("Failed to inspect file: {}", cli.file.display()))?,
        OutputFormat::Json => {
            let report = inspector
                .inspect(&workbook)
                .with_context(|| format!("Failed to inspect file: {}", cli.file.display()))?;
            formatter::print_json(&report)?;
        }
    }

    Ok(())
}
