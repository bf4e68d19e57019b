//! An RDF graph as an insertion-ordered list of triples.
//!
//! Triples keep the order they were added in so that writing the same graph
//! twice produces the same text. Fresh blank nodes are numbered `b0`, `b1`, ...
//! per graph for the same reason. Blank nodes coming from outside the graph are
//! relabelled `i0`, `i1`, ... through [`Graph::import`], so they never meet a
//! fresh one.

use std::collections::BTreeMap;

use crate::term::Term;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self { subject, predicate, object }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    next_blank: usize,
    // outside label -> label in this graph
    imported: BTreeMap<String, Term>,
    /// Prefix mappings offered to writers (deterministic order via BTreeMap)
    pub prefixes: BTreeMap<String, String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }
    /// A blank node not used anywhere else in this graph.
    pub fn fresh_blank(&mut self) -> Term {
        let blank = Term::blank(format!("b{}", self.next_blank));
        self.next_blank += 1;
        blank
    }
    /// A term from outside the graph. Blank nodes get a label of their own,
    /// the same one each time the outside label comes back.
    pub fn import(&mut self, term: &Term) -> Term {
        let Term::BlankNode(label) = term else {
            return term.clone();
        };
        let next = self.imported.len();
        self.imported
            .entry(label.clone())
            .or_insert_with(|| Term::blank(format!("i{}", next)))
            .clone()
    }
    pub fn add(&mut self, subject: &Term, predicate: &str, object: Term) {
        self.triples.push(Triple::new(subject.clone(), Term::iri(predicate), object));
    }
    pub fn len(&self) -> usize {
        self.triples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }
    /// Objects of every triple with this subject and predicate, in insertion order.
    pub fn objects<'a>(&'a self, subject: &'a Term, predicate: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate.as_iri() == Some(predicate))
            .map(|t| &t.object)
    }
    /// The single object for a subject and predicate, if there is exactly one.
    pub fn object<'a>(&'a self, subject: &Term, predicate: &str) -> Option<&'a Term> {
        let mut objects = self
            .triples
            .iter()
            .filter(|t| &t.subject == subject && t.predicate.as_iri() == Some(predicate))
            .map(|t| &t.object);
        match (objects.next(), objects.next()) {
            (Some(object), None) => Some(object),
            _ => None,
        }
    }
}
