//! Build orchestration.
//!
//! Build phases:
//! - **Scan** - Walk the content root for index files
//! - **Extract** - Frontmatter, body text and image per document
//! - **Tree** - Assemble and sort the document hierarchy
//! - **Flatten** - Pre-order table of records
//! - **Index** - Inverted index over the table's text fields
//! - **Write** - Serialize both artifacts, then replace them atomically
//!
//! Everything runs on one thread. The caller supplies the build clock so a
//! run is reproducible.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::FolioConfig;
use crate::content::{
    AssetResolver, Extractor, ScanError, Table, TableError, build_tree, scan_tree,
};
use crate::search::{SearchIndex, TextPipeline};
use crate::utils::date::DateTimeUtc;
use crate::utils::path::StagedFile;
use crate::utils::plural_count;
use crate::{debug, log};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("failed to serialize {what}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Both artifacts of one run, in memory.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub table: Table,
    pub index: SearchIndex,
}

/// Run every phase up to (not including) writing.
///
/// `now` stands in for every missing or unparseable document date.
pub fn run(config: &FolioConfig, now: DateTimeUtc) -> Result<BuildOutput, BuildError> {
    let build = &config.build;

    // Scan
    let root = scan_tree(&build.content, &build.index_names)?;
    debug!("scan"; "found {}", plural_count(root.document_count(), "index file"));

    // Extract + Tree
    let extractor = Extractor::new(AssetResolver::new(build.assets.clone()), now);
    let tree = build_tree(&root, now, &mut |path: &Path| {
        debug!("extract"; "{}", config.root_relative(path).display());
        extractor.extract(path)
    });

    // Flatten
    let table = Table::from_tree(&tree)?;
    for (parent, child) in table.dangling_children() {
        log!("warning"; "{} lists missing child {}", parent, child);
    }

    // Index
    let pipeline = TextPipeline::new(config.search.min_token_len);
    let index = SearchIndex::build(table.records(), &pipeline);
    debug!("index"; "{}", plural_count(index.inverted_index.len(), "distinct token"));

    Ok(BuildOutput { table, index })
}

/// Serialize both artifacts, stage both beside their targets, then rename.
///
/// No target changes unless both artifacts serialize and both temp files
/// are written. Only a failure between the two renames can leave a new
/// table next to an old index.
pub fn write_artifacts(output: &BuildOutput, config: &FolioConfig) -> Result<(), BuildError> {
    let pretty = config.build.pretty;
    let table = output
        .table
        .to_json(pretty)
        .map_err(|source| BuildError::Serialize {
            what: "table",
            source,
        })?;
    let index = output
        .index
        .to_json(pretty)
        .map_err(|source| BuildError::Serialize {
            what: "search index",
            source,
        })?;

    let write_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| BuildError::Write { path, source }
    };
    let staged = [(&config.build.table, table), (&config.build.index, index)]
        .into_iter()
        .map(|(path, json)| {
            StagedFile::stage(path, json.as_bytes()).map_err(write_error(path.as_path()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for file in staged {
        let path = file.target().to_path_buf();
        file.commit().map_err(write_error(&path))?;
    }
    Ok(())
}
