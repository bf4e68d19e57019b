//! Writers turning a [`Graph`] into Turtle or N-Triples text.
//!
//! Both writers follow the graph's insertion order, so the same graph always
//! produces the same bytes. The Turtle writer groups triples by subject,
//! declares only the prefixes it actually uses, and writes blank nodes that
//! are referenced exactly once inline as `[ ... ]`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, Write};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::graph::{Graph, Triple};
use crate::term::{Term, quote_string};
use crate::vocab::{rdf, xsd};

lazy_static! {
    // conservative subset of Turtle's PN_LOCAL
    static ref LOCAL_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
    static ref INTEGER: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
}

const INDENT: &str = "    ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Turtle,
    #[value(name = "ntriples")]
    NTriples,
}

pub fn write<W: Write>(graph: &Graph, format: Format, out: W) -> io::Result<()> {
    match format {
        Format::Turtle => write_turtle(graph, out),
        Format::NTriples => write_ntriples(graph, out),
    }
}

pub fn write_ntriples<W: Write>(graph: &Graph, mut out: W) -> io::Result<()> {
    for triple in graph.triples() {
        writeln!(
            out,
            "{} {} {} .",
            triple.subject.to_ntriples(),
            triple.predicate.to_ntriples(),
            triple.object.to_ntriples()
        )?;
    }
    out.flush()
}

pub fn write_turtle<W: Write>(graph: &Graph, mut out: W) -> io::Result<()> {
    TurtleWriter::new(graph).write(&mut out)?;
    out.flush()
}

// ------------- Turtle -------------
struct TurtleWriter<'a> {
    graph: &'a Graph,
    // subjects in first-seen order, with their triples
    subjects: Vec<&'a Term>,
    by_subject: HashMap<&'a Term, Vec<&'a Triple>>,
    // how often each blank node occurs in object position
    references: HashMap<&'a Term, usize>,
    written: HashSet<&'a Term>,
}

impl<'a> TurtleWriter<'a> {
    fn new(graph: &'a Graph) -> Self {
        let mut subjects = Vec::new();
        let mut by_subject: HashMap<&'a Term, Vec<&'a Triple>> = HashMap::new();
        let mut references = HashMap::new();
        for triple in graph.triples() {
            let kept = by_subject.entry(&triple.subject).or_default();
            if kept.is_empty() {
                subjects.push(&triple.subject);
            }
            kept.push(triple);
            if triple.object.is_blank() {
                *references.entry(&triple.object).or_insert(0) += 1;
            }
        }
        Self { graph, subjects, by_subject, references, written: HashSet::new() }
    }

    fn write<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let used = self.used_prefixes();
        for (prefix, namespace) in &used {
            writeln!(out, "@prefix {}: <{}> .", prefix, namespace)?;
        }
        if !used.is_empty() {
            writeln!(out)?;
        }

        let subjects = self.subjects.clone();
        for subject in subjects.iter().copied() {
            if self.inlined(subject) {
                continue;
            }
            self.written.insert(subject);
            if subject.is_blank() && self.references(subject) == 0 {
                write!(out, "[")?;
                self.write_predicates(out, subject, 1)?;
                writeln!(out, "\n] .")?;
            } else {
                write!(out, "{}", self.term(subject))?;
                self.write_predicates(out, subject, 1)?;
                writeln!(out, " .")?;
            }
        }
        // single references forming a cycle are never reached from above
        for subject in subjects {
            if self.written.insert(subject) {
                write!(out, "{}", self.term(subject))?;
                self.write_predicates(out, subject, 1)?;
                writeln!(out, " .")?;
            }
        }
        Ok(())
    }

    fn write_predicates<W: Write>(&mut self, out: &mut W, subject: &'a Term, depth: usize) -> io::Result<()> {
        for (i, (predicate, objects)) in self.grouped(subject).into_iter().enumerate() {
            write!(out, "{}", if i == 0 { "\n" } else { " ;\n" })?;
            write!(out, "{}{} ", INDENT.repeat(depth), self.predicate(predicate))?;
            for (j, object) in objects.into_iter().enumerate() {
                if j > 0 {
                    write!(out, ", ")?;
                }
                self.write_object(out, object, depth)?;
            }
        }
        Ok(())
    }

    fn write_object<W: Write>(&mut self, out: &mut W, object: &'a Term, depth: usize) -> io::Result<()> {
        if !self.inlined(object) || !self.written.insert(object) {
            return write!(out, "{}", self.term(object));
        }
        if !self.by_subject.contains_key(object) {
            return write!(out, "[]");
        }
        write!(out, "[")?;
        self.write_predicates(out, object, depth + 1)?;
        write!(out, "\n{}]", INDENT.repeat(depth))
    }

    /// Predicates of a subject in first-seen order, each with its objects.
    fn grouped(&self, subject: &Term) -> Vec<(&'a Term, Vec<&'a Term>)> {
        let mut grouped: Vec<(&'a Term, Vec<&'a Term>)> = Vec::new();
        let triples = self.by_subject.get(subject).map(Vec::as_slice).unwrap_or_default();
        for triple in triples.iter().copied() {
            match grouped.iter_mut().find(|(predicate, _)| *predicate == &triple.predicate) {
                Some((_, objects)) => objects.push(&triple.object),
                None => grouped.push((&triple.predicate, vec![&triple.object])),
            }
        }
        grouped
    }

    fn references(&self, term: &Term) -> usize {
        self.references.get(term).copied().unwrap_or(0)
    }

    fn inlined(&self, term: &Term) -> bool {
        term.is_blank() && self.references(term) == 1
    }

    fn used_prefixes(&self) -> BTreeMap<&'a str, &'a str> {
        let mut used = BTreeMap::new();
        let mut mark = |iri: &str| {
            if let Some((prefix, namespace, _)) = abbreviation(self.graph, iri) {
                used.insert(prefix, namespace);
            }
        };
        for triple in self.graph.triples() {
            if let Some(iri) = triple.subject.as_iri() {
                mark(iri);
            }
            match triple.predicate.as_iri() {
                Some(rdf::TYPE) | None => {}
                Some(iri) => mark(iri),
            }
            match &triple.object {
                Term::Iri(iri) => mark(iri),
                Term::Literal { lexical, datatype, language: None } if !short_literal(lexical, datatype) => {
                    mark(datatype)
                }
                _ => {}
            }
        }
        used
    }

    fn predicate(&self, predicate: &Term) -> String {
        match predicate.as_iri() {
            Some(rdf::TYPE) => "a".to_string(),
            _ => self.term(predicate),
        }
    }

    fn term(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.iri(iri),
            Term::Literal { lexical, datatype, language } => match language {
                Some(lang) => format!("{}@{}", quote_string(lexical), lang),
                None if datatype == xsd::STRING => quote_string(lexical),
                None if short_literal(lexical, datatype) => lexical.clone(),
                None => format!("{}^^{}", quote_string(lexical), self.iri(datatype)),
            },
            other => other.to_ntriples(),
        }
    }

    fn iri(&self, iri: &str) -> String {
        match abbreviation(self.graph, iri) {
            Some((prefix, _, local)) => format!("{}:{}", prefix, local),
            None => format!("<{}>", iri),
        }
    }
}

/// Literals Turtle can write without quotes or datatype.
fn short_literal(lexical: &str, datatype: &str) -> bool {
    datatype == xsd::STRING || (datatype == xsd::INTEGER && INTEGER.is_match(lexical))
}

/// The longest matching namespace that leaves a valid local name.
fn abbreviation<'g, 'i>(graph: &'g Graph, iri: &'i str) -> Option<(&'g str, &'g str, &'i str)> {
    graph
        .prefixes
        .iter()
        .filter_map(|(prefix, namespace)| {
            let local = iri.strip_prefix(namespace.as_str())?;
            LOCAL_NAME.is_match(local).then_some((prefix.as_str(), namespace.as_str(), local))
        })
        .max_by_key(|(_, namespace, _)| namespace.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::void;

    fn turtle(graph: &Graph) -> String {
        let mut out = Vec::new();
        write_turtle(graph, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.add_prefix("void", void::NS);
        graph.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        let ds = graph.fresh_blank();
        let partition = graph.fresh_blank();
        graph.add(&ds, rdf::TYPE, Term::iri(void::DATASET));
        graph.add(&ds, void::TRIPLES, Term::integer(12345));
        graph.add(&ds, void::PROPERTY_PARTITION, partition.clone());
        graph.add(&partition, void::PROPERTY, Term::iri("http://ex/p"));
        graph.add(&partition, void::TRIPLES, Term::integer(42));
        graph
    }

    #[test]
    fn anonymous_dataset_with_inline_partition() {
        let expected = "\
@prefix void: <http://rdfs.org/ns/void#> .

[
    a void:Dataset ;
    void:triples 12345 ;
    void:propertyPartition [
        void:property <http://ex/p> ;
        void:triples 42
    ]
] .
";
        assert_eq!(turtle(&sample()), expected);
    }

    #[test]
    fn shared_blank_nodes_keep_labels() {
        let mut graph = Graph::new();
        let shared = graph.fresh_blank();
        graph.add(&Term::iri("http://ex/a"), "http://ex/p", shared.clone());
        graph.add(&Term::iri("http://ex/b"), "http://ex/p", shared.clone());
        graph.add(&shared, "http://ex/q", Term::string("x"));
        let expected = "\
<http://ex/a>
    <http://ex/p> _:b0 .
<http://ex/b>
    <http://ex/p> _:b0 .
_:b0
    <http://ex/q> \"x\" .
";
        assert_eq!(turtle(&graph), expected);
    }

    #[test]
    fn repeated_predicates_are_grouped() {
        let mut graph = Graph::new();
        let s = Term::iri("http://ex/s");
        graph.add(&s, "http://ex/p", Term::integer(1));
        graph.add(&s, "http://ex/q", Term::lang_string("chat", "fr"));
        graph.add(&s, "http://ex/p", Term::integer(2));
        let expected = "\
<http://ex/s>
    <http://ex/p> 1, 2 ;
    <http://ex/q> \"chat\"@fr .
";
        assert_eq!(turtle(&graph), expected);
    }

    #[test]
    fn typed_literals_use_declared_prefixes() {
        let mut graph = Graph::new();
        graph.add_prefix("xsd", xsd::NS);
        graph.add_prefix("dcterms", "http://purl.org/dc/terms/");
        graph.add(
            &Term::iri("http://ex/ds"),
            "http://purl.org/dc/terms/date",
            Term::typed("2024-01-02T03:04:05Z", xsd::DATE_TIME),
        );
        let expected = "\
@prefix dcterms: <http://purl.org/dc/terms/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

<http://ex/ds>
    dcterms:date \"2024-01-02T03:04:05Z\"^^xsd:dateTime .
";
        assert_eq!(turtle(&graph), expected);
    }

    #[test]
    fn cyclic_single_references_are_still_written() {
        let mut graph = Graph::new();
        let a = graph.fresh_blank();
        let b = graph.fresh_blank();
        graph.add(&a, "http://ex/p", b.clone());
        graph.add(&b, "http://ex/p", a.clone());
        let text = turtle(&graph);
        assert!(text.contains("_:b0"));
        assert!(text.contains("<http://ex/p> ["));
    }

    #[test]
    fn ntriples_are_fully_expanded() {
        let mut out = Vec::new();
        write(&sample(), Format::NTriples, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "_:b0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://rdfs.org/ns/void#Dataset> ."
        );
        assert_eq!(
            lines[4],
            "_:b1 <http://rdfs.org/ns/void#triples> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        );
    }
}
