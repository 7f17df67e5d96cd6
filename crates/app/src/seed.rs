//! Seed files: a TOML table of quoted keys.
//!
//! ```toml
//! # project data
//! "/Project/Phase/Time" = 42
//! "/Project/Phase/Notes" = "needs review"
//! "/Project/Completed" = true
//! "/Project/Tags" = ["draft", 2]
//! ```
//!
//! Strings become text, integers and floats numbers, booleans flags and
//! arrays lists. Datetimes are kept as their TOML text. Nested tables are
//! rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use common::prelude::{Namespace, NamespaceError, Value};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid seed file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{key:?}: {kind} values are not supported")]
    Unsupported { key: String, kind: &'static str },
    #[error("{key:?}: {source}")]
    Store {
        key: String,
        source: NamespaceError,
    },
}

/// Build a fresh namespace from a seed file on disk
pub fn load(path: &Path) -> Result<Namespace, SeedError> {
    let text = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let namespace = Namespace::new();
    let count = apply(&namespace, &text)?;
    tracing::debug!(path = %path.display(), count, "seeded namespace");
    Ok(namespace)
}

/// Store every entry of the seed document `text` in `namespace`. Returns
/// the number of values stored.
pub fn apply(namespace: &Namespace, text: &str) -> Result<usize, SeedError> {
    let entries: BTreeMap<String, toml::Value> = toml::from_str(text)?;
    let count = entries.len();
    for (key, raw) in entries {
        let value = convert(&key, raw)?;
        namespace
            .put(&key, value)
            .map_err(|source| SeedError::Store { key, source })?;
    }
    Ok(count)
}

fn convert(key: &str, raw: toml::Value) -> Result<Value, SeedError> {
    let value = match raw {
        toml::Value::String(text) => Value::Text(text),
        toml::Value::Integer(number) => Value::from(number),
        toml::Value::Float(number) => Value::Number(number),
        toml::Value::Boolean(flag) => Value::Flag(flag),
        toml::Value::Datetime(datetime) => Value::Text(datetime.to_string()),
        toml::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| convert(key, item))
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(_) => {
            return Err(SeedError::Unsupported {
                key: key.to_string(),
                kind: "table",
            })
        }
    };
    Ok(value)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_value_forms() {
        let namespace = Namespace::new();
        let text = r#"
            "/n/int" = 42
            "/n/float" = -1.5
            "/f/yes" = true
            "/t/quoted" = "42"
            "/t/escaped" = "café \"x\""
            "/t/when" = 1979-05-27
            "/l/mixed" = ["a", 2, false]
        "#;
        assert_eq!(apply(&namespace, text).unwrap(), 7);

        assert_eq!(namespace.get_value("/n/int"), Some(Value::Number(42.0)));
        assert_eq!(namespace.get_value("/n/float"), Some(Value::Number(-1.5)));
        assert_eq!(namespace.get_value("/f/yes"), Some(Value::Flag(true)));
        assert_eq!(namespace.get_value("/t/quoted"), Some(Value::from("42")));
        assert_eq!(
            namespace.get_value("/t/escaped"),
            Some(Value::from("café \"x\""))
        );
        assert_eq!(
            namespace.get_value("/t/when"),
            Some(Value::from("1979-05-27"))
        );
        assert_eq!(
            namespace.get_value("/l/mixed"),
            Some(Value::List(vec![
                Value::from("a"),
                Value::Number(2.0),
                Value::Flag(false)
            ]))
        );
    }

    #[test]
    fn test_comments_and_keys_with_equals() {
        let namespace = Namespace::new();
        let text = "# header\n\n\"/A/Time\" = 1 # trailing note\n\"/x=y\" = \"a = b\"\n\"/B\" = \"caf\\u00e9\"\n";
        assert_eq!(apply(&namespace, text).unwrap(), 3);
        assert_eq!(namespace.get_value("/A/Time"), Some(Value::Number(1.0)));
        assert_eq!(namespace.get_value("/x=y"), Some(Value::from("a = b")));
        assert_eq!(namespace.get_value("/B"), Some(Value::from("café")));
        assert_eq!(namespace.all_keys().count(), 3);
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let namespace = Namespace::new();
        for text in [
            "/A = 1\n",
            "\"/A\" = \"open\n",
            "\"/A\" = \n",
            "\"/A\" = 1\n\"/A\" = 2\n",
            "\"/A\" = bare words\n",
        ] {
            assert!(
                matches!(apply(&namespace, text), Err(SeedError::Parse(_))),
                "{:?}",
                text
            );
        }
        assert_eq!(namespace.all_keys().count(), 0);
    }

    #[test]
    fn test_store_and_shape_errors() {
        let namespace = Namespace::new();
        let err = apply(&namespace, "\"/A/\" = 1\n").unwrap_err();
        assert!(matches!(
            err,
            SeedError::Store {
                source: NamespaceError::ContainerPath(_),
                ..
            }
        ));

        let err = apply(&namespace, "[Project]\nTime = 1\n").unwrap_err();
        assert!(matches!(
            err,
            SeedError::Unsupported { kind: "table", .. }
        ));

        let err = apply(&namespace, "\"/L\" = [1, { a = 2 }]\n").unwrap_err();
        assert!(matches!(err, SeedError::Unsupported { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.toml");
        std::fs::write(&path, "\"/P/Time\" = 5\n\"/P/Q/Time\" = 6\n").unwrap();

        let namespace = load(&path).unwrap();
        assert_eq!(namespace.all_keys().count(), 2);

        let missing = load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, SeedError::Read { .. }));
    }
}
