use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::model::REPORT_FILENAME;

#[derive(Parser, Debug)]
#[command(
    name = "queryeval",
    version,
    about = "Compare AI-generated query results against control results and score them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Evaluate(EvaluateArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Defaults to `<results-dir>/summary_output.json`.
    #[arg(long)]
    pub report_path: Option<PathBuf>,

    /// Only evaluate AI results carrying this operation tag (repeatable).
    #[arg(long = "require-operation")]
    pub require_operations: Vec<String>,

    /// Only evaluate AI results whose operation tags are exactly these, in order.
    #[arg(long = "exact-operations", value_delimiter = ',')]
    pub exact_operations: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl EvaluateArgs {
    pub fn report_path(&self) -> PathBuf {
        resolve_report_path(&self.results_dir, self.report_path.as_ref())
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Defaults to `<results-dir>/summary_output.json`.
    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

impl StatusArgs {
    pub fn report_path(&self) -> PathBuf {
        resolve_report_path(&self.results_dir, self.report_path.as_ref())
    }
}

fn resolve_report_path(results_dir: &Path, explicit: Option<&PathBuf>) -> PathBuf {
    explicit
        .cloned()
        .unwrap_or_else(|| results_dir.join(REPORT_FILENAME))
}
