//! Wildcard term classes and the interning of pattern positions.

use std::fmt;

use crate::sse::Item;
use crate::term::Term;

/// A category standing in for a concrete value in a triple-pattern position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermClass {
    Any,
    Var,
    Term,
    Uri,
    Literal,
    BNode,
}

// symbol name -> canonical class
const TERM_CLASSES: &[(&str, TermClass)] = &[
    ("ANY", TermClass::Any),
    ("VAR", TermClass::Var),
    ("TERM", TermClass::Term),
    ("URI", TermClass::Uri),
    ("LITERAL", TermClass::Literal),
    ("BNODE", TermClass::BNode),
];

impl TermClass {
    pub fn from_symbol(symbol: &str) -> Option<TermClass> {
        TERM_CLASSES
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, class)| *class)
    }
    pub fn symbol(&self) -> &'static str {
        TERM_CLASSES
            .iter()
            .find(|(_, class)| class == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

impl fmt::Display for TermClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One position of a statistics pattern after interning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternTerm {
    Class(TermClass),
    Node(Term),
    /// Anything else, kept exactly as read
    Raw(Item),
}

impl PatternTerm {
    pub fn as_node(&self) -> Option<&Term> {
        match self {
            PatternTerm::Node(term) => Some(term),
            _ => None,
        }
    }
    pub fn as_iri(&self) -> Option<&str> {
        self.as_node().and_then(Term::as_iri)
    }
    pub fn as_class(&self) -> Option<TermClass> {
        match self {
            PatternTerm::Class(class) => Some(*class),
            _ => None,
        }
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatternTerm::Class(class) => write!(f, "{}", class),
            PatternTerm::Node(term) => write!(f, "{}", term),
            PatternTerm::Raw(item) => write!(f, "{}", item),
        }
    }
}

/// Maps a wildcard symbol onto its class; nodes and everything else pass through.
pub fn intern(item: &Item) -> PatternTerm {
    match item {
        Item::Symbol(name) => match TermClass::from_symbol(name) {
            Some(class) => PatternTerm::Class(class),
            None => PatternTerm::Raw(item.clone()),
        },
        Item::Node(term) => PatternTerm::Node(term.clone()),
        Item::List(_) => PatternTerm::Raw(item.clone()),
    }
}
