//! Interpretation of a parsed statistics document.
//!
//! A statistics document is a list tagged `stats`. An optional first element
//! tagged `meta` carries the total triple count and a timestamp; every other
//! element is one record:
//!
//! ```text
//! (stats
//!   (meta (timestamp "2024-01-01T00:00:00Z"^^xsd:dateTime) (count 12345))
//!   (<http://ex/p> 42)                  # predicate abbreviation
//!   ((VAR rdf:type <http://ex/C>) 7)    # triple pattern
//!   (other 1))                          # default weight
//! ```
//!
//! [`StatsInterpreter::classify`] turns one element into a [`StatsRecord`];
//! [`StatsInterpreter::interpret`] walks the whole document and folds the
//! records into a [`DatasetStats`] accumulator. Malformed records never stop
//! the walk. They are logged and kept as [`SkippedRecord`]s.

use chrono::DateTime;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{Result, StatsVoidError};
use crate::pattern::{PatternTerm, TermClass, intern};
use crate::sse::Item;
use crate::term::Term;
use crate::vocab::{rdf, wikidata, xsd};

pub const STATS: &str = "stats";
pub const META: &str = "meta";
pub const COUNT: &str = "count";
pub const TIMESTAMP: &str = "timestamp";
pub const OTHER: &str = "other";

/// Predicates whose patterns describe class membership by default.
pub const DEFAULT_CLASS_PREDICATES: &[&str] = &[rdf::TYPE, wikidata::INSTANCE_OF];

// ------------- Records -------------
#[derive(Clone, Debug, PartialEq)]
pub enum StatsRecord {
    /// `(<p> n)`, or `(ANY n)` with a wildcard standing in for the predicate
    PredicateAbbreviation { predicate: PatternTerm, triples: i64 },
    /// `((s p o) n)`
    TriplePattern {
        subject: PatternTerm,
        predicate: PatternTerm,
        object: PatternTerm,
        weight: i64,
    },
    /// `(other w)`
    OtherDefault { weight: f64 },
    Unrecognized(SkipReason),
}

/// Why a record was dropped.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SkipReason {
    #[error("Not a predicate URI: {0}")]
    NotAPredicateUri(String),
    #[error("Not a match for a predicate URI: {0}")]
    NotAPredicateMatch(TermClass),
    #[error("Not understood: {0}")]
    NotUnderstood(String),
    #[error("Unrecognized pattern: {0}")]
    UnrecognizedPattern(String),
    #[error("Missing or non-numeric weight in {0}")]
    BadWeight(String),
    #[error("Class partition needs a concrete class, found {0}")]
    NotAClass(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRecord {
    /// Position among the records, the meta record not counted
    pub index: usize,
    pub reason: SkipReason,
}

// ------------- Accumulator -------------
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyPartition {
    pub predicate: PatternTerm,
    pub triples: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassPartition {
    pub class: Term,
    pub distinct_subjects: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetStats {
    total_triples: Option<i64>,
    date: Option<Term>,
    property_partitions: Vec<PropertyPartition>,
    class_partitions: Vec<ClassPartition>,
    class_count: u64,
    skipped: Vec<SkippedRecord>,
}

impl DatasetStats {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn total_triples(&self) -> Option<i64> {
        self.total_triples
    }
    pub fn date(&self) -> Option<&Term> {
        self.date.as_ref()
    }
    pub fn property_partitions(&self) -> &[PropertyPartition] {
        &self.property_partitions
    }
    pub fn class_partitions(&self) -> &[ClassPartition] {
        &self.class_partitions
    }
    pub fn class_count(&self) -> u64 {
        self.class_count
    }
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }
    /// Nothing was interpreted that would show up in a dataset description.
    pub fn is_empty(&self) -> bool {
        self.total_triples.is_none()
            && self.date.is_none()
            && self.property_partitions.is_empty()
            && self.class_partitions.is_empty()
    }
    pub fn set_total_triples(&mut self, total: i64) {
        self.total_triples = Some(total);
    }
    pub fn set_date(&mut self, date: Term) {
        self.date = Some(date);
    }
    pub fn add_property_partition(&mut self, predicate: PatternTerm, triples: i64) {
        self.property_partitions.push(PropertyPartition { predicate, triples });
    }
    // the only place class_count moves, so it always matches the partitions
    pub fn add_class_partition(&mut self, class: Term, distinct_subjects: i64) {
        self.class_partitions.push(ClassPartition { class, distinct_subjects });
        self.class_count += 1;
    }
    fn skip(&mut self, index: usize, reason: SkipReason) {
        warn!(record = index, "{}", reason);
        self.skipped.push(SkippedRecord { index, reason });
    }
}

// ------------- Interpreter -------------
#[derive(Clone, Debug)]
pub struct StatsInterpreter {
    class_predicates: Vec<String>,
}

impl StatsInterpreter {
    /// Classes are detected through rdf:type and wikidata's P31.
    pub fn new() -> Self {
        Self::with_class_predicates(DEFAULT_CLASS_PREDICATES.iter().map(|p| p.to_string()).collect())
    }
    pub fn with_class_predicates(class_predicates: Vec<String>) -> Self {
        Self { class_predicates }
    }
    pub fn class_predicates(&self) -> &[String] {
        &self.class_predicates
    }

    /// Walks a whole document. `Ok(None)` means there was nothing to interpret
    /// (no item, or the empty list); a root not tagged `stats` is an error.
    pub fn interpret(&self, document: Option<&Item>) -> Result<Option<DatasetStats>> {
        let document = match document {
            Some(document) if !document.is_nil() => document,
            _ => return Ok(None),
        };
        let elements = match document.as_list() {
            Some(elements) if document.is_tagged(STATS) => &elements[1..],
            _ => return Err(StatsVoidError::NotAStatsDocument(format!("Not tagged '{}': {}", STATS, abbreviated(document)))),
        };

        let mut stats = DatasetStats::new();
        let records = match elements.split_first() {
            Some((meta, rest)) if meta.is_tagged(META) => {
                self.read_meta(meta, &mut stats);
                rest
            }
            _ => elements,
        };
        for (index, element) in records.iter().enumerate() {
            let record = self.classify(element);
            self.accumulate(&mut stats, index, record);
        }
        Ok(Some(stats))
    }

    fn read_meta(&self, meta: &Item, stats: &mut DatasetStats) {
        if let Some(count) = meta.find_tagged(COUNT) {
            match count.get(1).and_then(Item::as_node).and_then(Term::as_integer) {
                Some(total) => stats.set_total_triples(total),
                None => warn!("Ignoring meta count that is not an integer: {}", count),
            }
        }
        if let Some(timestamp) = meta.find_tagged(TIMESTAMP) {
            match timestamp.get(1).and_then(Item::as_node) {
                Some(date) if date.is_literal() => {
                    check_timestamp(date);
                    stats.set_date(date.clone());
                }
                _ => warn!("Ignoring meta timestamp that is not a literal: {}", timestamp),
            }
        }
    }

    /// Classifies one record by the shape of its first position.
    pub fn classify(&self, element: &Item) -> StatsRecord {
        let Some(pat) = element.get(0) else {
            return StatsRecord::Unrecognized(SkipReason::UnrecognizedPattern(element.to_string()));
        };
        match pat {
            Item::Node(term) if term.is_iri() => abbreviation(element, PatternTerm::Node(term.clone())),
            Item::Node(term) => StatsRecord::Unrecognized(SkipReason::NotAPredicateUri(term.to_string())),
            Item::Symbol(symbol) if symbol == OTHER => {
                match element.get(1).and_then(Item::as_node).and_then(Term::as_double) {
                    Some(weight) => StatsRecord::OtherDefault { weight },
                    None => StatsRecord::Unrecognized(SkipReason::BadWeight(element.to_string())),
                }
            }
            Item::Symbol(symbol) => match TermClass::from_symbol(symbol) {
                Some(class @ (TermClass::BNode | TermClass::Literal)) => {
                    StatsRecord::Unrecognized(SkipReason::NotAPredicateMatch(class))
                }
                Some(class @ (TermClass::Any | TermClass::Var | TermClass::Term)) => {
                    abbreviation(element, PatternTerm::Class(class))
                }
                Some(TermClass::Uri) | None => StatsRecord::Unrecognized(SkipReason::NotUnderstood(symbol.clone())),
            },
            Item::List(triple) if triple.len() == 3 => match weight(element) {
                Some(weight) => StatsRecord::TriplePattern {
                    subject: intern(&triple[0]),
                    predicate: intern(&triple[1]),
                    object: intern(&triple[2]),
                    weight,
                },
                None => StatsRecord::Unrecognized(SkipReason::BadWeight(element.to_string())),
            },
            Item::List(_) => StatsRecord::Unrecognized(SkipReason::UnrecognizedPattern(pat.to_string())),
        }
    }

    fn accumulate(&self, stats: &mut DatasetStats, index: usize, record: StatsRecord) {
        match record {
            StatsRecord::PredicateAbbreviation { predicate, triples } => {
                stats.add_property_partition(predicate, triples);
            }
            StatsRecord::TriplePattern { predicate, object, weight, .. } => {
                if !self.is_class_predicate(&predicate) {
                    debug!(record = index, %predicate, "Triple pattern not projected");
                    return;
                }
                match object {
                    PatternTerm::Node(class) if class.is_iri() || class.is_blank() => {
                        stats.add_class_partition(class, weight);
                    }
                    other => stats.skip(index, SkipReason::NotAClass(other.to_string())),
                }
            }
            StatsRecord::OtherDefault { weight } => {
                debug!(record = index, weight, "Default weight not projected");
            }
            StatsRecord::Unrecognized(reason) => stats.skip(index, reason),
        }
    }

    fn is_class_predicate(&self, predicate: &PatternTerm) -> bool {
        predicate
            .as_iri()
            .is_some_and(|iri| self.class_predicates.iter().any(|p| p == iri))
    }
}

impl Default for StatsInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn abbreviation(element: &Item, predicate: PatternTerm) -> StatsRecord {
    match weight(element) {
        Some(triples) => StatsRecord::PredicateAbbreviation { predicate, triples },
        None => StatsRecord::Unrecognized(SkipReason::BadWeight(element.to_string())),
    }
}

fn weight(element: &Item) -> Option<i64> {
    element.get(1).and_then(Item::as_node).and_then(Term::as_integer)
}

fn check_timestamp(date: &Term) {
    if let Term::Literal { lexical, datatype, .. } = date {
        if datatype == xsd::DATE_TIME && DateTime::parse_from_rfc3339(lexical).is_err() {
            warn!("Meta timestamp is not a valid xsd:dateTime: {}", lexical);
        }
    }
}

fn abbreviated(item: &Item) -> String {
    let text = item.to_string();
    match text.char_indices().nth(60) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::parse;

    fn interpret(text: &str) -> DatasetStats {
        let document = parse(text).unwrap();
        StatsInterpreter::new().interpret(document.as_ref()).unwrap().unwrap()
    }

    fn record(text: &str) -> StatsRecord {
        let element = parse(text).unwrap().unwrap();
        StatsInterpreter::new().classify(&element)
    }

    #[test]
    fn classifies_each_record_shape() {
        assert_eq!(
            record("(<http://ex/p> 42)"),
            StatsRecord::PredicateAbbreviation { predicate: PatternTerm::Node(Term::iri("http://ex/p")), triples: 42 }
        );
        assert_eq!(
            record("(VAR 3)"),
            StatsRecord::PredicateAbbreviation { predicate: PatternTerm::Class(TermClass::Var), triples: 3 }
        );
        assert_eq!(record("(other 0.5)"), StatsRecord::OtherDefault { weight: 0.5 });
        assert_eq!(
            record("((ANY <http://ex/p> TERM) 9)"),
            StatsRecord::TriplePattern {
                subject: PatternTerm::Class(TermClass::Any),
                predicate: PatternTerm::Node(Term::iri("http://ex/p")),
                object: PatternTerm::Class(TermClass::Term),
                weight: 9,
            }
        );
    }

    #[test]
    fn classifies_anomalies() {
        assert!(matches!(record("(\"p\" 1)"), StatsRecord::Unrecognized(SkipReason::NotAPredicateUri(_))));
        assert!(matches!(record("(_:b 1)"), StatsRecord::Unrecognized(SkipReason::NotAPredicateUri(_))));
        assert_eq!(
            record("(LITERAL 1)"),
            StatsRecord::Unrecognized(SkipReason::NotAPredicateMatch(TermClass::Literal))
        );
        assert_eq!(
            record("(BNODE 1)"),
            StatsRecord::Unrecognized(SkipReason::NotAPredicateMatch(TermClass::BNode))
        );
        assert_eq!(record("(URI 1)"), StatsRecord::Unrecognized(SkipReason::NotUnderstood("URI".into())));
        assert_eq!(record("(foo 1)"), StatsRecord::Unrecognized(SkipReason::NotUnderstood("foo".into())));
        assert!(matches!(record("((ANY ANY) 1)"), StatsRecord::Unrecognized(SkipReason::UnrecognizedPattern(_))));
        assert!(matches!(record("()"), StatsRecord::Unrecognized(SkipReason::UnrecognizedPattern(_))));
        assert!(matches!(record("(<http://ex/p>)"), StatsRecord::Unrecognized(SkipReason::BadWeight(_))));
        assert!(matches!(record("(<http://ex/p> 1.5)"), StatsRecord::Unrecognized(SkipReason::BadWeight(_))));
        assert!(matches!(record("(other \"x\")"), StatsRecord::Unrecognized(SkipReason::BadWeight(_))));
    }

    #[test]
    fn reads_meta_record() {
        let stats = interpret(
            r#"(stats (meta (timestamp "2024-01-02T03:04:05Z"^^xsd:dateTime) (run@ "x") (count 12345)))"#,
        );
        assert_eq!(stats.total_triples(), Some(12345));
        assert_eq!(
            stats.date(),
            Some(&Term::typed("2024-01-02T03:04:05Z", xsd::DATE_TIME))
        );
        assert!(stats.property_partitions().is_empty());
    }

    #[test]
    fn absent_meta_fields_stay_unset() {
        let stats = interpret("(stats (meta (run@ \"x\")) (<http://ex/p> 1))");
        assert_eq!(stats.total_triples(), None);
        assert_eq!(stats.date(), None);
        let stats = interpret("(stats (meta (count \"many\")) (<http://ex/p> 1))");
        assert_eq!(stats.total_triples(), None);
    }

    #[test]
    fn meta_is_only_recognized_first() {
        let stats = interpret("(stats (<http://ex/p> 1) (meta (count 5)))");
        assert_eq!(stats.total_triples(), None);
        assert_eq!(stats.skipped().len(), 1);
        assert_eq!(stats.skipped()[0].index, 1);
    }

    #[test]
    fn class_partitions_are_not_deduplicated() {
        let stats = interpret(
            "(stats
               ((VAR rdf:type <http://ex/C>) 4)
               ((VAR <http://www.wikidata.org/prop/direct/P31> <http://ex/C>) 6)
               ((VAR <http://ex/knows> ANY) 100))",
        );
        assert_eq!(stats.class_count(), 2);
        assert_eq!(stats.class_partitions().len(), 2);
        assert_eq!(stats.class_partitions()[0].class, Term::iri("http://ex/C"));
        assert_eq!(stats.class_partitions()[0].distinct_subjects, 4);
        assert_eq!(stats.class_partitions()[1].distinct_subjects, 6);
        assert!(stats.skipped().is_empty());
    }

    #[test]
    fn wildcard_class_objects_are_skipped() {
        let stats = interpret("(stats ((VAR rdf:type ANY) 4) ((VAR rdf:type \"C\") 2))");
        assert_eq!(stats.class_count(), 0);
        assert!(stats.class_partitions().is_empty());
        assert_eq!(stats.skipped().len(), 2);
        assert!(matches!(stats.skipped()[0].reason, SkipReason::NotAClass(_)));
    }

    #[test]
    fn configured_class_predicates() {
        let interpreter = StatsInterpreter::with_class_predicates(vec!["http://ex/a".to_string()]);
        let document = parse("(stats ((VAR <http://ex/a> <http://ex/C>) 4) ((VAR rdf:type <http://ex/D>) 2))").unwrap();
        let stats = interpreter.interpret(document.as_ref()).unwrap().unwrap();
        assert_eq!(stats.class_count(), 1);
        assert_eq!(stats.class_partitions()[0].class, Term::iri("http://ex/C"));
    }

    #[test]
    fn empty_and_wrong_documents() {
        let interpreter = StatsInterpreter::new();
        assert_eq!(interpreter.interpret(None).unwrap(), None);
        assert_eq!(interpreter.interpret(Some(&Item::List(Vec::new()))).unwrap(), None);
        let wrong = parse("(statistics (<http://ex/p> 1))").unwrap();
        assert!(matches!(interpreter.interpret(wrong.as_ref()), Err(StatsVoidError::NotAStatsDocument(_))));
        let atom = parse("stats").unwrap();
        assert!(matches!(interpreter.interpret(atom.as_ref()), Err(StatsVoidError::NotAStatsDocument(_))));
    }

    #[test]
    fn bare_stats_document_is_empty() {
        let stats = interpret("(stats)");
        assert!(stats.is_empty());
        assert_eq!(stats.class_count(), 0);
    }
}
