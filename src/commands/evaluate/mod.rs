mod aggregate;
mod classify;
mod filter;
mod loader;
mod numeric;
mod run;
mod scoring;
mod structural;
mod text;
mod types;

pub(crate) use loader::{discover_result_files, parse_result_filename, result_filename_regex};
pub(crate) use run::{log_report, run};
pub(crate) use types::EvaluationManifest;
