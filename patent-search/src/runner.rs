//! The command flow: optional provisioning, then the index listing.

use std::io::Write;

use tracing::info;

use crate::config::{Dependencies, Settings};
use crate::errors::AppError;
use patent_search_repository::IndexSummary;

/// Provision the configured index (if any), then print the available indices.
///
/// Steps run strictly one after another; the first failure is returned.
pub async fn run<W: Write>(
    deps: &Dependencies,
    settings: &Settings,
    out: &mut W,
) -> Result<(), AppError> {
    if let (Some(provisioner), Some(index_name)) = (&deps.provisioner, &settings.index_name) {
        let report = provisioner.ensure_index(index_name).await?;
        info!(
            index = %report.index_name,
            dimension = report.dimension,
            deleted_existing = report.deleted_existing,
            "Index provisioned"
        );
    }

    let indices = deps.cluster.list_indices().await?;
    write_index_list(out, &indices)?;
    Ok(())
}

/// Write the index names, one per line, under a heading.
pub fn write_index_list<W: Write>(out: &mut W, indices: &[IndexSummary]) -> std::io::Result<()> {
    writeln!(out, "Available indices:")?;
    for summary in indices {
        writeln!(out, "  - {}", summary.index)?;
    }
    out.flush()
}
