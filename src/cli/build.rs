//! `folio build`: scan content and write the table and search index.

use anyhow::{Context, Result};

use crate::{
    config::FolioConfig,
    log,
    pipeline::{self, BuildOutput},
    utils::{date::DateTimeUtc, plural_count},
};

/// Build both artifacts from the configured content root.
///
/// A missing or empty content root aborts before anything is written, so
/// artifacts from a previous run stay in place.
pub fn build_index(config: &FolioConfig) -> Result<()> {
    let content = config.root_relative(&config.build.content);
    log!("build"; "indexing {}", content.display());

    let now = DateTimeUtc::build_clock();
    let output = pipeline::run(config, now)
        .with_context(|| format!("Failed to index {}", config.build.content.display()))?;

    pipeline::write_artifacts(&output, config).context("Failed to write artifacts")?;
    log_summary(&output, config);
    Ok(())
}

fn log_summary(output: &BuildOutput, config: &FolioConfig) {
    log!(
        "build";
        "wrote {} to {}",
        plural_count(output.table.len(), "record"),
        config.root_relative(&config.build.table).display()
    );
    log!(
        "build";
        "wrote {} to {}",
        plural_count(output.index.inverted_index.len(), "token"),
        config.root_relative(&config.build.index).display()
    );
}
