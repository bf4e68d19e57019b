//! Reader for SSE (S-expression) documents, the syntax statistics files are written in.
//!
//! The grammar lives in `sse.pest`. Reading produces a generic [`Item`] tree of
//! symbols, RDF nodes and nested lists; it knows nothing about statistics.
//! Prefixed names are expanded while reading, and `(prefix ((p: <ns>) ...) body)`
//! forms disappear, leaving only `body`.

use std::collections::BTreeMap;
use std::fmt;

use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::error::{Result, StatsVoidError};
use crate::term::{Term, check_iri};
use crate::vocab::{self, xsd};

#[derive(Parser)]
#[grammar = "sse.pest"]
struct SseParser;

// ------------- Item -------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// A bare word such as `stats`, `meta` or `ANY`
    Symbol(String),
    /// An RDF node: IRI, literal, blank node or variable
    Node(Term),
    List(Vec<Item>),
}

impl Item {
    pub fn symbol(name: impl Into<String>) -> Self {
        Item::Symbol(name.into())
    }
    pub fn is_nil(&self) -> bool {
        matches!(self, Item::List(items) if items.is_empty())
    }
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Item::Symbol(name) => Some(name),
            _ => None,
        }
    }
    pub fn as_node(&self) -> Option<&Term> {
        match self {
            Item::Node(term) => Some(term),
            _ => None,
        }
    }
    pub fn as_list(&self) -> Option<&[Item]> {
        match self {
            Item::List(items) => Some(items),
            _ => None,
        }
    }
    /// Element at `index` when this is a list.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.as_list().and_then(|items| items.get(index))
    }
    /// A list whose first element is the symbol `tag`.
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.get(0).and_then(Item::as_symbol) == Some(tag)
    }
    /// First element of this list that is itself tagged with `tag`.
    pub fn find_tagged(&self, tag: &str) -> Option<&Item> {
        self.as_list()?.iter().find(|item| item.is_tagged(tag))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Item::Symbol(name) => write!(f, "{}", name),
            Item::Node(term) => write!(f, "{}", term),
            Item::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

// ------------- Reader -------------
pub struct SseReader {
    // innermost scope last
    scopes: Vec<BTreeMap<String, String>>,
}

impl SseReader {
    /// A reader that knows the standard prefixes (rdf, rdfs, xsd, owl, dc).
    pub fn new() -> Self {
        let standard = vocab::STANDARD_PREFIXES
            .iter()
            .map(|(prefix, ns)| (prefix.to_string(), ns.to_string()))
            .collect();
        Self { scopes: vec![standard] }
    }
    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.scopes[0].insert(prefix.into(), namespace.into());
        self
    }
    pub fn with_prefixes<'a>(mut self, prefixes: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (prefix, namespace) in prefixes {
            self.scopes[0].insert(prefix.clone(), namespace.clone());
        }
        self
    }

    /// Reads one document. `None` means the text held no item at all.
    pub fn read(&mut self, text: &str) -> Result<Option<Item>> {
        let mut pairs = SseParser::parse(Rule::document, text)?;
        let Some(document) = pairs.next() else {
            return Ok(None);
        };
        for pair in document.into_inner() {
            if pair.as_rule() != Rule::EOI {
                return self.build(pair).map(Some);
            }
        }
        Ok(None)
    }

    fn build(&mut self, pair: Pair<Rule>) -> Result<Item> {
        match pair.as_rule() {
            Rule::list => self.build_list(pair),
            Rule::iri => checked_iri(pair).map(|iri| Item::Node(Term::Iri(iri))),
            Rule::literal => self.build_literal(pair).map(Item::Node),
            Rule::number => Ok(Item::Node(number(pair.as_str()))),
            Rule::blank => Ok(Item::Node(Term::blank(&pair.as_str()[2..]))),
            Rule::variable => Ok(Item::Node(Term::variable(&pair.as_str()[1..]))),
            Rule::prefixed => self.expand(&pair).map(|iri| Item::Node(Term::Iri(iri))),
            Rule::symbol => Ok(Item::symbol(pair.as_str())),
            rule => Err(error_at(&pair, format!("Unexpected {:?}", rule))),
        }
    }

    fn build_list(&mut self, pair: Pair<Rule>) -> Result<Item> {
        let children: Vec<Pair<Rule>> = pair.into_inner().collect();
        let is_prefix_form = children.len() == 3
            && children[0].as_rule() == Rule::symbol
            && children[0].as_str() == "prefix";
        if is_prefix_form {
            let mut children = children.into_iter().skip(1);
            if let (Some(declarations), Some(body)) = (children.next(), children.next()) {
                let scope = prefix_declarations(&declarations)?;
                self.scopes.push(scope);
                let built = self.build(body);
                self.scopes.pop();
                return built;
            }
            return Ok(Item::List(Vec::new()));
        }
        children
            .into_iter()
            .map(|child| self.build(child))
            .collect::<Result<Vec<_>>>()
            .map(Item::List)
    }

    fn build_literal(&self, pair: Pair<Rule>) -> Result<Term> {
        let mut inner = pair.into_inner();
        let body = inner
            .next()
            .and_then(|string| string.into_inner().next())
            .map(|body| body.as_str())
            .unwrap_or("");
        let lexical = unescape(body).map_err(|message| StatsVoidError::Parse {
            message,
            line: None,
            col: None,
        })?;
        match inner.next() {
            None => Ok(Term::string(lexical)),
            Some(tag) if tag.as_rule() == Rule::lang_tag => Ok(Term::lang_string(lexical, &tag.as_str()[1..])),
            Some(datatype) if datatype.as_rule() == Rule::iri => Ok(Term::typed(lexical, checked_iri(datatype)?)),
            Some(datatype) => Ok(Term::typed(lexical, self.expand(&datatype)?)),
        }
    }

    fn expand(&self, pair: &Pair<Rule>) -> Result<String> {
        let (prefix, local) = pair.as_str().split_once(':').unwrap_or(("", pair.as_str()));
        let iri = self
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix))
            .map(|namespace| format!("{}{}", namespace, local))
            .ok_or_else(|| error_at(pair, format!("Unknown prefix '{}:'", prefix)))?;
        match check_iri(&iri) {
            Ok(_) => Ok(iri),
            Err(_) => Err(error_at(pair, format!("Invalid IRI <{}> from {}", iri, pair.as_str()))),
        }
    }
}

impl Default for SseReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a document with the standard prefixes only.
pub fn parse(text: &str) -> Result<Option<Item>> {
    SseReader::new().read(text)
}

fn prefix_declarations(pair: &Pair<Rule>) -> Result<BTreeMap<String, String>> {
    let mut scope = BTreeMap::new();
    if pair.as_rule() != Rule::list {
        return Err(error_at(pair, "Malformed prefix declarations".to_string()));
    }
    for declaration in pair.clone().into_inner() {
        let parts: Vec<Pair<Rule>> = declaration.clone().into_inner().collect();
        match parts.as_slice() {
            [name, namespace] if name.as_rule() == Rule::prefixed && namespace.as_rule() == Rule::iri => {
                let prefix = name.as_str().trim_end_matches(':');
                scope.insert(prefix.to_string(), iri_text(namespace.clone()));
            }
            _ => return Err(error_at(&declaration, "Malformed prefix declaration".to_string())),
        }
    }
    Ok(scope)
}

fn iri_text(pair: Pair<Rule>) -> String {
    pair.into_inner().next().map(|body| body.as_str().to_string()).unwrap_or_default()
}

// only absolute IRIs that can be written back between angle brackets
fn checked_iri(pair: Pair<Rule>) -> Result<String> {
    let iri = iri_text(pair.clone());
    match check_iri(&iri) {
        Ok(_) => Ok(iri),
        Err(_) => Err(error_at(&pair, format!("Invalid IRI <{}>", iri))),
    }
}

fn number(text: &str) -> Term {
    let datatype = if text.contains(['e', 'E']) {
        xsd::DOUBLE
    } else if text.contains('.') {
        xsd::DECIMAL
    } else {
        xsd::INTEGER
    };
    Term::typed(text, datatype)
}

fn unescape(s: &str) -> std::result::Result<String, String> {
    let mut unescaped = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => unescaped.push('\t'),
            Some('b') => unescaped.push('\u{8}'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('f') => unescaped.push('\u{c}'),
            Some(u @ ('u' | 'U')) => {
                let width = if u == 'u' { 4 } else { 8 };
                let hex: String = chars.by_ref().take(width).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("Invalid escape \\{}{}", u, hex))?;
                unescaped.push(code);
            }
            Some(other) => unescaped.push(other),
            None => return Err("Dangling escape at end of string".to_string()),
        }
    }
    Ok(unescaped)
}

fn error_at(pair: &Pair<Rule>, message: String) -> StatsVoidError {
    let (line, col) = pair.as_span().start_pos().line_col();
    StatsVoidError::Parse { message, line: Some(line), col: Some(col) }
}

impl From<pest::error::Error<Rule>> for StatsVoidError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, col) = match e.line_col {
            LineColLocation::Pos((line, col)) => (line, col),
            LineColLocation::Span((line, col), _) => (line, col),
        };
        StatsVoidError::Parse {
            message: format!("{} at {}:{}", e.variant.message(), line, col),
            line: Some(line),
            col: Some(col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_statistics_document() {
        let text = r#"
            (stats
              (meta
                (timestamp "2008-10-23T10:35:19.122+01:00"^^xsd:dateTime)
                (run@ "23/10/08 10:35")
                (count 8))
              (<http://example/p> 7)
              ((VAR rdf:type ANY) 5)
              (other 0.5)
            )
        "#;
        let item = parse(text).unwrap().unwrap();
        assert!(item.is_tagged("stats"));
        let meta = item.get(1).unwrap();
        assert!(meta.is_tagged("meta"));
        let count = meta.find_tagged("count").unwrap();
        assert_eq!(count.get(1).and_then(Item::as_node).and_then(Term::as_integer), Some(8));
        let timestamp = meta.find_tagged("timestamp").unwrap().get(1).unwrap();
        assert_eq!(
            timestamp.as_node().and_then(Term::datatype),
            Some("http://www.w3.org/2001/XMLSchema#dateTime")
        );
        assert!(meta.find_tagged("run@").is_some());
        let pattern = item.get(3).unwrap().get(0).unwrap();
        assert_eq!(pattern.get(0), Some(&Item::symbol("VAR")));
        assert_eq!(
            pattern.get(1),
            Some(&Item::Node(Term::iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type")))
        );
        let other = item.get(4).unwrap();
        assert_eq!(other.get(1).and_then(Item::as_node).and_then(Term::as_double), Some(0.5));
    }

    #[test]
    fn empty_text_is_no_item() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("  # just a comment\n").unwrap(), None);
        assert!(parse("()").unwrap().unwrap().is_nil());
    }

    #[test]
    fn prefix_forms_are_transparent() {
        let text = "(prefix ((: <http://example/>) (ex: <http://ex.org/ns#>)) (stats (:p 3) (ex:q 4)))";
        let item = parse(text).unwrap().unwrap();
        assert!(item.is_tagged("stats"));
        assert_eq!(item.get(1).unwrap().get(0), Some(&Item::Node(Term::iri("http://example/p"))));
        assert_eq!(item.get(2).unwrap().get(0), Some(&Item::Node(Term::iri("http://ex.org/ns#q"))));
    }

    #[test]
    fn configured_prefixes_are_used() {
        let mut reader = SseReader::new().with_prefix("wdt", "http://www.wikidata.org/prop/direct/");
        let item = reader.read("(wdt:P31 12)").unwrap().unwrap();
        assert_eq!(
            item.get(0),
            Some(&Item::Node(Term::iri("http://www.wikidata.org/prop/direct/P31")))
        );
    }

    #[test]
    fn node_kinds() {
        let item = parse(r#"(_:b1 ?x "chat"@fr 'single' "tab\there" -4 2.5 1e3 [ANY])"#).unwrap().unwrap();
        assert_eq!(item.get(0), Some(&Item::Node(Term::blank("b1"))));
        assert_eq!(item.get(1), Some(&Item::Node(Term::variable("x"))));
        assert_eq!(item.get(2), Some(&Item::Node(Term::lang_string("chat", "fr"))));
        assert_eq!(item.get(3), Some(&Item::Node(Term::string("single"))));
        assert_eq!(item.get(4), Some(&Item::Node(Term::string("tab\there"))));
        assert_eq!(item.get(5).and_then(Item::as_node).and_then(Term::as_integer), Some(-4));
        assert_eq!(item.get(6).and_then(Item::as_node).and_then(Term::datatype), Some(xsd::DECIMAL));
        assert_eq!(item.get(7).and_then(Item::as_node).and_then(Term::datatype), Some(xsd::DOUBLE));
        assert_eq!(item.get(8), Some(&Item::List(vec![Item::symbol("ANY")])));
    }

    #[test]
    fn unknown_prefix_is_an_error() {
        let err = parse("(stats\n  (nope:p 1))").unwrap_err();
        match err {
            StatsVoidError::Parse { message, line, .. } => {
                assert!(message.contains("nope:"));
                assert_eq!(line, Some(2));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn iris_that_cannot_be_written_are_errors() {
        for text in [
            "(stats\n  (<http://ex/a\"b> 5))",
            "(stats\n  (<http://ex/a{b}> 5))",
            "(stats\n  (<relative> 5))",
            "(stats\n  (\"x\"^^<http://ex/a|b> 5))",
        ] {
            match parse(text) {
                Err(StatsVoidError::Parse { message, line, col }) => {
                    assert!(message.contains("Invalid IRI"), "{message}");
                    assert_eq!(line, Some(2));
                    assert!(col.is_some());
                }
                other => panic!("expected a parse error for {text}, got {other:?}"),
            }
        }
        let mut reader = SseReader::new().with_prefix("ex", "http://ex/a^");
        assert!(matches!(reader.read("(ex:b 1)"), Err(StatsVoidError::Parse { .. })));
    }

    #[test]
    fn unbalanced_and_trailing_input_are_errors() {
        assert!(matches!(parse("(stats (a 1)"), Err(StatsVoidError::Parse { .. })));
        assert!(matches!(parse("(stats) (stats)"), Err(StatsVoidError::Parse { .. })));
    }

    #[test]
    fn display_round_trips_shape() {
        let item = parse("(stats (<http://ex/p> 42))").unwrap().unwrap();
        assert_eq!(
            item.to_string(),
            "(stats (<http://ex/p> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer>))"
        );
    }
}
