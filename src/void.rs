//! Maps interpreted statistics onto a VOID dataset description.

use tracing::{info, warn};

use crate::graph::Graph;
use crate::interpret::DatasetStats;
use crate::term::Term;
use crate::vocab::{self, dcterms, rdf, void};

#[derive(Clone, Debug, Default)]
pub struct VoidEmitter {
    dataset: Option<String>,
    endpoint: Option<String>,
}

impl VoidEmitter {
    /// Describes an anonymous dataset with no endpoint.
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_dataset(mut self, iri: impl Into<String>) -> Self {
        self.dataset = Some(iri.into());
        self
    }
    pub fn with_endpoint(mut self, iri: impl Into<String>) -> Self {
        self.endpoint = Some(iri.into());
        self
    }

    /// Builds the dataset description. Returns `None` when the statistics hold
    /// nothing to describe, in which case nothing should be written at all.
    pub fn emit(&self, stats: DatasetStats) -> Option<Graph> {
        if stats.is_empty() {
            info!("No statistics to describe, nothing emitted");
            return None;
        }
        let mut graph = Graph::new();
        for (prefix, namespace) in vocab::OUTPUT_PREFIXES {
            graph.add_prefix(*prefix, *namespace);
        }
        let dataset = match &self.dataset {
            Some(iri) => Term::iri(iri.as_str()),
            None => graph.fresh_blank(),
        };

        graph.add(&dataset, rdf::TYPE, Term::iri(void::DATASET));
        if let Some(total) = stats.total_triples() {
            graph.add(&dataset, void::TRIPLES, Term::integer(total));
        }
        let classes = i64::try_from(stats.class_count()).unwrap_or(i64::MAX);
        graph.add(&dataset, void::CLASSES, Term::integer(classes));
        if let Some(endpoint) = &self.endpoint {
            graph.add(&dataset, void::SPARQL_ENDPOINT, Term::iri(endpoint.as_str()));
        }

        for partition in stats.property_partitions() {
            // a wildcard stands in for the predicate and cannot be written as one
            let Some(property) = partition.predicate.as_node().filter(|p| p.is_iri()) else {
                warn!(predicate = %partition.predicate, "Property partition without a predicate IRI skipped");
                continue;
            };
            let node = graph.fresh_blank();
            graph.add(&dataset, void::PROPERTY_PARTITION, node.clone());
            graph.add(&node, void::PROPERTY, property.clone());
            graph.add(&node, void::TRIPLES, Term::integer(partition.triples));
        }
        for partition in stats.class_partitions() {
            let node = graph.fresh_blank();
            // blank classes come from the statistics file, not from this graph
            let class = graph.import(&partition.class);
            graph.add(&dataset, void::CLASS_PARTITION, node.clone());
            graph.add(&node, void::CLASS, class);
            graph.add(&node, void::DISTINCT_SUBJECTS, Term::integer(partition.distinct_subjects));
        }

        if let Some(date) = stats.date() {
            graph.add(&dataset, dcterms::DATE, date.clone());
        }
        Some(graph)
    }
}
