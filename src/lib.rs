//! stats-to-void – describe an RDF dataset in VOID from its optimizer statistics.
//!
//! Query optimizers such as the one in a TDB store collect selectivity
//! statistics into a small SSE document: a `stats` list holding an optional
//! `meta` record (total triple count, timestamp) followed by weights for single
//! predicates and for triple patterns. This crate reads such a document and
//! writes the coverage it implies as a VOID dataset description: total
//! triples, one property partition per weighted predicate, and one class
//! partition per `rdf:type` (or wikidata `P31`) pattern.
//!
//! ## Modules
//! * [`sse`] – pest-based reader producing a generic [`sse::Item`] tree.
//! * [`pattern`] – wildcard [`pattern::TermClass`]es and interning of pattern positions.
//! * [`interpret`] – classification of records and the [`interpret::DatasetStats`] accumulator.
//! * [`void`] – the [`void::VoidEmitter`] mapping statistics onto a [`graph::Graph`].
//! * [`serialize`] – Turtle and N-Triples writers.
//! * [`term`], [`graph`], [`vocab`] – the small RDF model the above share.
//! * [`config`] – settings from `stats-to-void.toml` and `STATS_TO_VOID_*` variables.
//!
//! ## Quick Start
//! ```
//! use stats_to_void::{config::Settings, serialize, stats_to_void};
//! let text = "(stats (meta (count 10)) (<http://example.org/p> 10))";
//! let graph = stats_to_void(text, &Settings::default(), None, Some("http://example.org/ds"))
//!     .unwrap()
//!     .unwrap();
//! let mut out = Vec::new();
//! serialize::write_turtle(&graph, &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("void:triples 10"));
//! ```
//!
//! ## Failure policy
//! A document whose root is not tagged `stats` is an error. Records that do not
//! fit any known shape are logged through `tracing` and skipped. An empty
//! document describes nothing, and nothing at all should be written for it.

pub mod config;
pub mod error;
pub mod graph;
pub mod interpret;
pub mod pattern;
pub mod serialize;
pub mod sse;
pub mod term;
pub mod vocab;
pub mod void;

use tracing::info;

pub use error::{Result, StatsVoidError};

use crate::config::Settings;
use crate::graph::Graph;
use crate::interpret::StatsInterpreter;
use crate::sse::SseReader;
use crate::term::check_iri;
use crate::void::VoidEmitter;

/// Reads a statistics document and builds its VOID description.
///
/// `endpoint` and `dataset` are IRIs; blank or missing values are ignored, and
/// the dataset then becomes a blank node. `Ok(None)` means there was nothing to
/// describe.
pub fn stats_to_void(
    text: &str,
    settings: &Settings,
    endpoint: Option<&str>,
    dataset: Option<&str>,
) -> Result<Option<Graph>> {
    let mut emitter = VoidEmitter::new();
    if let Some(iri) = non_blank(dataset) {
        emitter = emitter.with_dataset(check_iri(iri)?);
    }
    if let Some(iri) = non_blank(endpoint) {
        emitter = emitter.with_endpoint(check_iri(iri)?);
    }

    let document = SseReader::new().with_prefixes(&settings.prefixes).read(text)?;
    let interpreter = StatsInterpreter::with_class_predicates(settings.class_predicates.clone());
    let Some(stats) = interpreter.interpret(document.as_ref())? else {
        info!("Empty stats document");
        return Ok(None);
    };
    info!(
        property_partitions = stats.property_partitions().len(),
        class_partitions = stats.class_partitions().len(),
        skipped = stats.skipped().len(),
        "Statistics interpreted"
    );
    Ok(emitter.emit(stats))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
