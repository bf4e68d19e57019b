//! IRI constants for the vocabularies written by the emitter.

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
}

pub mod owl {
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";
}

pub mod dc {
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";
}

pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// Datatypes derived from xsd:integer whose values fit an `i64` reading.
    pub const INTEGER_TYPES: &[&str] = &[
        INTEGER,
        "http://www.w3.org/2001/XMLSchema#long",
        "http://www.w3.org/2001/XMLSchema#int",
        "http://www.w3.org/2001/XMLSchema#short",
        "http://www.w3.org/2001/XMLSchema#byte",
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger",
        "http://www.w3.org/2001/XMLSchema#positiveInteger",
        "http://www.w3.org/2001/XMLSchema#unsignedLong",
        "http://www.w3.org/2001/XMLSchema#unsignedInt",
    ];
}

/// The VOID vocabulary, <http://rdfs.org/ns/void#>.
pub mod void {
    pub const NS: &str = "http://rdfs.org/ns/void#";
    pub const DATASET: &str = "http://rdfs.org/ns/void#Dataset";
    pub const TRIPLES: &str = "http://rdfs.org/ns/void#triples";
    pub const CLASSES: &str = "http://rdfs.org/ns/void#classes";
    pub const SPARQL_ENDPOINT: &str = "http://rdfs.org/ns/void#sparqlEndpoint";
    pub const PROPERTY_PARTITION: &str = "http://rdfs.org/ns/void#propertyPartition";
    pub const PROPERTY: &str = "http://rdfs.org/ns/void#property";
    pub const CLASS_PARTITION: &str = "http://rdfs.org/ns/void#classPartition";
    pub const CLASS: &str = "http://rdfs.org/ns/void#class";
    pub const DISTINCT_SUBJECTS: &str = "http://rdfs.org/ns/void#distinctSubjects";
}

pub mod dcterms {
    pub const NS: &str = "http://purl.org/dc/terms/";
    pub const DATE: &str = "http://purl.org/dc/terms/date";
}

pub mod wikidata {
    /// wdt:P31, "instance of"
    pub const INSTANCE_OF: &str = "http://www.wikidata.org/prop/direct/P31";
}

/// Prefixes known to the SSE reader before any `(prefix ...)` form or configured extras.
pub const STANDARD_PREFIXES: &[(&str, &str)] = &[
    ("rdf", rdf::NS),
    ("rdfs", rdfs::NS),
    ("xsd", xsd::NS),
    ("owl", owl::NS),
    ("dc", dc::NS),
];

/// Prefixes offered to the Turtle writer; only the ones in use get declared.
pub const OUTPUT_PREFIXES: &[(&str, &str)] = &[
    ("rdf", rdf::NS),
    ("rdfs", rdfs::NS),
    ("xsd", xsd::NS),
    ("owl", owl::NS),
    ("dc", dc::NS),
    ("void", void::NS),
    ("dcterms", dcterms::NS),
];
