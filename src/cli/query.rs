//! `folio query`: look things up in built artifacts.
//!
//! Prints JSON on stdout; progress and warnings go to stderr.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::{
    cli::args::QueryArgs,
    config::FolioConfig,
    content::Record,
    log,
    snapshot::{Snapshot, paginate},
    utils::plural_count,
};

/// A search result: the record plus its score.
#[derive(Debug, Serialize)]
struct ScoredRecord<'a> {
    score: f64,
    #[serde(flatten)]
    record: &'a Record,
}

/// A route lookup: the record and its resolved children.
#[derive(Debug, Serialize)]
struct RouteView<'a> {
    record: &'a Record,
    children: Vec<&'a Record>,
}

/// Execute query command
pub fn run_query(args: &QueryArgs, config: &FolioConfig) -> Result<()> {
    let snapshot = Snapshot::load(&config.build.table, &config.build.index)
        .context("Failed to load artifacts (run `folio build` first)")?;

    let json = if let Some(query) = &args.search {
        let hits = snapshot.search(query, config.search.min_score);
        let scored: Vec<_> = hits
            .iter()
            .filter_map(|hit| {
                snapshot.get(&hit.route).map(|record| ScoredRecord {
                    score: hit.score,
                    record,
                })
            })
            .collect();
        log!("query"; "{} for \"{}\"", plural_count(scored.len(), "hit"), query);
        to_json(paginate(&scored, args.offset, args.limit), args.pretty)?
    } else if let Some(tag) = &args.tag {
        let records = snapshot.filter_by_tag(tag);
        log!("query"; "{} tagged \"{}\"", plural_count(records.len(), "record"), tag);
        to_json(paginate(&records, args.offset, args.limit), args.pretty)?
    } else if let Some(route) = &args.route {
        let view = snapshot.get(route).map(|record| RouteView {
            record,
            children: snapshot.children(route),
        });
        if view.is_none() {
            log!("query"; "no record at {}", route);
        }
        to_json(&view, args.pretty)?
    } else {
        bail!("one of --search, --tag or --route is required");
    };

    println!("{json}");
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize query result")
}
