//! Settings read from an optional config file and the environment.
//!
//! The file defaults to `stats-to-void.toml` in the working directory and may
//! be TOML, JSON or YAML when given explicitly. Environment variables prefixed
//! `STATS_TO_VOID_` override it, e.g. `STATS_TO_VOID_FORMAT=ntriples` or
//! `STATS_TO_VOID_CLASS_PREDICATES=http://a,http://b`.

use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;
use crate::interpret::DEFAULT_CLASS_PREDICATES;
use crate::serialize::Format;
use crate::term::check_iri;

pub const DEFAULT_CONFIG_FILE: &str = "stats-to-void.toml";
pub const ENV_PREFIX: &str = "STATS_TO_VOID";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Filter used when `RUST_LOG` is not set
    pub log_level: String,
    pub format: Format,
    /// Predicates whose patterns become class partitions
    pub class_predicates: Vec<String>,
    /// Extra prefixes available while reading statistics files
    pub prefixes: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            format: Format::Turtle,
            class_predicates: DEFAULT_CLASS_PREDICATES.iter().map(|p| p.to_string()).collect(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Loads settings. An explicitly named file must exist; the default one may not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("class_predicates"),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        for predicate in &self.class_predicates {
            check_iri(predicate)?;
        }
        for namespace in self.prefixes.values() {
            check_iri(namespace)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsVoidError;
    use std::io::Write;

    fn settings_file(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(extension).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_keep_type_and_instance_of() {
        let settings = Settings::default();
        assert_eq!(settings.format, Format::Turtle);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(
            settings.class_predicates,
            vec![
                "http://www.w3.org/1999/02/22-rdf-syntax-ns#type".to_string(),
                "http://www.wikidata.org/prop/direct/P31".to_string(),
            ]
        );
    }

    #[test]
    fn reads_toml_file() {
        let file = settings_file(
            ".toml",
            r#"
format = "ntriples"
class_predicates = ["http://ex/isA"]

[prefixes]
wdt = "http://www.wikidata.org/prop/direct/"
"#,
        );
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.format, Format::NTriples);
        assert_eq!(settings.class_predicates, vec!["http://ex/isA".to_string()]);
        assert_eq!(settings.prefixes.get("wdt").map(String::as_str), Some("http://www.wikidata.org/prop/direct/"));
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn named_file_must_exist() {
        let missing = Path::new("/nonexistent/stats-to-void.toml");
        assert!(matches!(Settings::load(Some(missing)), Err(StatsVoidError::Config(_))));
    }

    #[test]
    fn rejects_invalid_iris() {
        let file = settings_file(".toml", "class_predicates = [\"not an iri\"]\n");
        assert!(matches!(Settings::load(Some(file.path())), Err(StatsVoidError::InvalidIri(_))));
    }
}
