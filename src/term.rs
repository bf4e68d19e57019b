//! RDF terms: IRI, blank node, literal and (SSE only) variable.
//!
//! A `Term` is what the SSE reader produces for a node token and what the
//! graph stores in each triple position. IRIs are always kept expanded;
//! prefixed names are resolved while reading.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, StatsVoidError};
use crate::vocab::{rdf, xsd};

lazy_static! {
    // absolute IRI: a scheme, then no spaces or characters Turtle cannot hold between <>
    static ref ABSOLUTE_IRI: Regex = Regex::new(r#"^[A-Za-z][A-Za-z0-9+.-]*:[^\s<>"{}|\\^`]*$"#).unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Full expanded IRI, e.g. "http://rdfs.org/ns/void#Dataset"
    Iri(String),
    /// Blank node label without the `_:` prefix
    BlankNode(String),
    /// Literal with an explicit datatype (xsd:string when none was written)
    Literal {
        lexical: String,
        datatype: String,
        language: Option<String>,
    },
    /// Named variable, `?x` in SSE. Never part of an emitted graph.
    Variable(String),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(label.into())
    }

    /// Plain string literal (xsd:string)
    pub fn string(value: impl Into<String>) -> Self {
        Term::Literal {
            lexical: value.into(),
            datatype: xsd::STRING.to_string(),
            language: None,
        }
    }

    /// Integer literal (xsd:integer)
    pub fn integer(value: i64) -> Self {
        Term::Literal {
            lexical: value.to_string(),
            datatype: xsd::INTEGER.to_string(),
            language: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    pub fn lang_string(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: rdf::LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Datatype IRI of a literal.
    pub fn datatype(&self) -> Option<&str> {
        match self {
            Term::Literal { datatype, .. } => Some(datatype),
            _ => None,
        }
    }

    /// Reads a literal of an integer datatype as `i64`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Term::Literal { lexical, datatype, .. } if xsd::INTEGER_TYPES.contains(&datatype.as_str()) => {
                lexical.trim_start_matches('+').parse().ok()
            }
            _ => None,
        }
    }

    /// Reads any numeric literal as `f64`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Term::Literal { lexical, datatype, .. }
                if xsd::INTEGER_TYPES.contains(&datatype.as_str())
                    || datatype == xsd::DECIMAL
                    || datatype == xsd::DOUBLE
                    || datatype == xsd::FLOAT =>
            {
                lexical.parse().ok()
            }
            _ => None,
        }
    }

    /// The N-Triples form of this term.
    pub fn to_ntriples(&self) -> String {
        match self {
            Term::Iri(iri) => format!("<{}>", iri),
            Term::BlankNode(label) => format!("_:{}", label),
            Term::Literal { lexical, datatype, language } => {
                let quoted = quote_string(lexical);
                match language {
                    Some(lang) => format!("{}@{}", quoted, lang),
                    None if datatype == xsd::STRING => quoted,
                    None => format!("{}^^<{}>", quoted, datatype),
                }
            }
            Term::Variable(name) => format!("?{}", name),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_ntriples())
    }
}

/// Accepts only absolute IRIs that can be written between angle brackets.
pub fn check_iri(iri: &str) -> Result<&str> {
    if ABSOLUTE_IRI.is_match(iri) {
        Ok(iri)
    } else {
        Err(StatsVoidError::InvalidIri(iri.to_string()))
    }
}

/// Quotes and escapes a lexical form for N-Triples and Turtle output.
pub fn quote_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if (c as u32) < 0x20 => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
