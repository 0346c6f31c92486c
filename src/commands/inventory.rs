use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use super::evaluate::{discover_result_files, parse_result_filename, result_filename_regex};
use crate::cli::InventoryArgs;
use crate::model::{ResultFileEntry, ResultInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.results_dir)?;

    if args.dry_run {
        info!(
            file_count = manifest.file_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.results_dir.join("manifests").join("result_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(file_count = manifest.file_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(results_dir: &Path) -> Result<ResultInventoryManifest> {
    let pattern = result_filename_regex()?;
    let paths = discover_result_files(results_dir)?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        let Some((query_id, variant)) = parse_result_filename(&filename, &pattern) else {
            warn!(file = %filename, "skipping file outside naming scheme");
            continue;
        };
        let sha256 = sha256_file(&path)?;

        files.push(ResultFileEntry {
            filename,
            query_id,
            variant,
            sha256,
        });
    }

    if files.is_empty() {
        bail!("no result files found in {}", results_dir.display());
    }

    files.sort_by(|a, b| {
        a.query_id
            .cmp(&b.query_id)
            .then(a.variant.cmp(&b.variant))
            .then(a.filename.cmp(&b.filename))
    });

    Ok(ResultInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: results_dir.display().to_string(),
        file_count: files.len(),
        files,
    })
}
