use std::io::Read;
use std::sync::Arc;

use serde::de::Error as _;
use tracing::debug;

use crate::compat::{AcceptAll, Compatibility};
use crate::data::{Catalog, CatalogEntry};
use crate::error::ParseError;

/// Decodes a catalog stream into a filtered, name-ordered [`Catalog`].
#[derive(Clone)]
pub struct CatalogParser {
    compat: Arc<dyn Compatibility>,
}

impl Default for CatalogParser {
    fn default() -> Self {
        Self::new(AcceptAll)
    }
}

impl CatalogParser {
    pub fn new(compat: impl Compatibility + 'static) -> Self {
        Self {
            compat: Arc::new(compat),
        }
    }

    /// Decode the first JSON value of `reader` as an array of entries.
    ///
    /// Bytes after that value are not read. `null` yields an empty catalog;
    /// an empty stream, a non-array value or malformed JSON is a decode error.
    /// The sort is stable: entries with equal names keep their input order.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Catalog, ParseError> {
        let mut values =
            serde_json::Deserializer::from_reader(reader).into_iter::<Option<Vec<CatalogEntry>>>();

        let entries = match values.next() {
            Some(decoded) => decoded?.unwrap_or_default(),
            None => return Err(serde_json::Error::custom("empty catalog stream").into()),
        };

        let total = entries.len();
        let mut entries: Vec<CatalogEntry> = entries
            .into_iter()
            .filter(|entry| self.compat.is_compatible(entry.requires()))
            .collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        debug!(total, kept = entries.len(), "catalog decoded");
        Ok(Catalog::from_sorted(entries))
    }
}

/// Parse with the default, accept-everything compatibility policy.
pub fn parse<R: Read>(reader: R) -> Result<Catalog, ParseError> {
    CatalogParser::default().parse(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.iter().map(|entry| entry.name()).collect()
    }

    #[test]
    fn test_parse_sorts_by_name() {
        let raw = r#"[{"Name":"Zeta"},{"Name":"Alpha"},{"Name":"Mid"}]"#;
        let catalog = parse(raw.as_bytes()).unwrap();
        assert_eq!(names(&catalog), ["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_parse_sort_is_bytewise() {
        let raw = r#"[{"Name":"beta"},{"Name":"Beta"},{"Name":"alpha"},{"Name":"Zulu"}]"#;
        let catalog = parse(raw.as_bytes()).unwrap();
        assert_eq!(names(&catalog), ["Beta", "Zulu", "alpha", "beta"]);
    }

    #[test]
    fn test_parse_equal_names_keep_input_order() {
        let raw = r#"[{"ID":"b","Name":"Same"},{"ID":"a","Name":"Same"},{"ID":"c","Name":"Early"}]"#;
        let catalog = parse(raw.as_bytes()).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|entry| entry.id()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn test_parse_empty_array() {
        let catalog = parse("[]".as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_null_is_empty() {
        let catalog = parse("null".as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_truncated_is_decode_error() {
        let result = parse(r#"[{"Name":"#.as_bytes());
        assert!(matches!(result, Err(ParseError::Decode(_))));
    }

    #[test]
    fn test_parse_empty_stream_is_decode_error() {
        assert!(matches!(parse("".as_bytes()), Err(ParseError::Decode(_))));
        assert!(matches!(parse("  \n".as_bytes()), Err(ParseError::Decode(_))));
    }

    #[test]
    fn test_parse_object_is_decode_error() {
        let result = parse(r#"{"Name":"Alpha"}"#.as_bytes());
        assert!(matches!(result, Err(ParseError::Decode(_))));
    }

    #[test]
    fn test_parse_wrong_field_type_is_decode_error() {
        let result = parse(r#"[{"Name":42}]"#.as_bytes());
        assert!(matches!(result, Err(ParseError::Decode(_))));
    }

    #[test]
    fn test_parse_ignores_trailing_bytes() {
        let catalog = parse(r#"[{"Name":"Alpha"}] trailing"#.as_bytes()).unwrap();
        assert_eq!(names(&catalog), ["Alpha"]);
    }

    #[test]
    fn test_parse_filters_incompatible() {
        let raw = r#"[
            {"Name":"Keep","Requires":""},
            {"Name":"Drop","Requires":"exotic"},
            {"Name":"Also","Requires":"linux"}
        ]"#;
        let parser = CatalogParser::new(|requires: &str| requires != "exotic");
        let catalog = parser.parse(raw.as_bytes()).unwrap();

        assert_eq!(names(&catalog), ["Also", "Keep"]);
        assert!(catalog.iter().all(|entry| entry.requires() != "exotic"));
    }

    #[test]
    fn test_parse_all_filtered_is_empty() {
        let parser = CatalogParser::new(|_: &str| false);
        let catalog = parser.parse(r#"[{"Name":"A"},{"Name":"B"}]"#.as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_full_entry() {
        let raw = r#"[{
            "ID": "io.fyne.notes",
            "Name": "Notes",
            "Icon": "https://example.com/notes.png",
            "Developer": "Fyne.io",
            "Summary": "Take notes",
            "URL": "https://apps.fyne.io/apps/io.fyne.notes.html",
            "Website": "https://fyne.io/notes",
            "Screenshots": [{"Image": "https://example.com/shot.png", "Type": "desktop"}],
            "Date": "2020-06-21T14:30:00+01:00",
            "Version": "1.2.0",
            "Source": {"Git": "https://github.com/fyne-io/notes", "Package": "fyne.io/notes"},
            "Requires": "1.3",
            "Extra": "ignored"
        }]"#;
        let catalog = parse(raw.as_bytes()).unwrap();
        let entry = catalog.get(0).unwrap();

        assert_eq!(entry.id(), "io.fyne.notes");
        assert_eq!(entry.icon(), "https://example.com/notes.png");
        assert_eq!(entry.developer(), "Fyne.io");
        assert_eq!(entry.url(), "https://apps.fyne.io/apps/io.fyne.notes.html");
        assert_eq!(entry.screenshots().len(), 1);
        assert_eq!(entry.screenshots()[0].kind(), "desktop");
        assert_eq!(entry.date().unwrap().format("%d %b %Y").to_string(), "21 Jun 2020");
        assert_eq!(entry.source().git(), "https://github.com/fyne-io/notes");
        assert_eq!(entry.package(), "fyne.io/notes");
        assert_eq!(entry.requires(), "1.3");
    }

    #[test]
    fn test_parse_null_fields_default() {
        let raw = r#"[{"Name":"Alpha","Screenshots":null,"Date":null,"Source":null,"Icon":null}]"#;
        let catalog = parse(raw.as_bytes()).unwrap();
        let entry = catalog.get(0).unwrap();

        assert!(entry.screenshots().is_empty());
        assert!(entry.date().is_none());
        assert_eq!(entry.package(), "");
        assert_eq!(entry.icon(), "");
    }

    #[test]
    fn test_catalog_find_by_id_then_name() {
        let raw = r#"[{"ID":"one","Name":"Alpha"},{"ID":"Alpha","Name":"Beta"}]"#;
        let catalog = parse(raw.as_bytes()).unwrap();

        assert_eq!(catalog.find("Alpha").unwrap().name(), "Beta");
        assert_eq!(catalog.find("one").unwrap().name(), "Alpha");
        assert!(catalog.find("missing").is_none());
    }
}
