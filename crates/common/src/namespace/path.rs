//! Key path canonicalization
//!
//! Keys are slash-delimited names, e.g. `/Project/Task/Time`. A key that
//! ends in `/` (or is empty) names a *context*, one that does not names a
//! *value slot*. `..` segments climb one level and are collapsed against
//! the preceding name wherever possible; any `..` that cannot be resolved
//! (because nothing precedes it) is kept in place.

use std::fmt;

/// The character used to split apart key strings
pub const SEPARATOR: char = '/';

/// The name used to refer to the parent of a context
pub const PARENT_NAME: &str = "..";

/// A single component of a canonical key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An unresolved step up to the parent context
    Parent,
    /// A named child
    Name(String),
}

impl Segment {
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Name(name) => Some(name),
            Segment::Parent => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Parent => write!(f, "{}", PARENT_NAME),
            Segment::Name(name) => write!(f, "{}", name),
        }
    }
}

/// A parsed, canonical key.
///
/// `absolute` records whether the raw key began with a separator, in which
/// case it is resolved against the root of the tree rather than the context
/// it was issued on. The canonical string form never carries that leading
/// separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    absolute: bool,
    segments: Vec<Segment>,
    container: bool,
}

impl KeyPath {
    /// Parse and canonicalize a raw key. Total: every input yields a path.
    pub fn parse(raw: &str) -> Self {
        let absolute = raw.starts_with(SEPARATOR);
        let mut segments: Vec<Segment> = Vec::new();
        let mut last_raw = "";

        for part in raw.split(SEPARATOR) {
            last_raw = part;
            match part {
                "" => continue,
                PARENT_NAME => match segments.last() {
                    Some(Segment::Name(_)) => {
                        segments.pop();
                    }
                    _ => segments.push(Segment::Parent),
                },
                name => segments.push(Segment::Name(name.to_string())),
            }
        }

        // climbing always lands on a context, so a trailing ".." reads
        //  as if it had been written "../"
        let container =
            segments.is_empty() || raw.ends_with(SEPARATOR) || last_raw == PARENT_NAME;

        Self {
            absolute,
            segments,
            container,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// True if this path addresses a context rather than a value slot
    pub fn is_container(&self) -> bool {
        self.container
    }

    /// True if the path collapsed to the acting context itself
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The final segment, if it is a name
    pub fn last_name(&self) -> Option<&str> {
        self.segments.last().and_then(Segment::name)
    }

    /// Reinterpret this path as addressing a context
    pub fn into_container(mut self) -> Self {
        self.container = true;
        self
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return Ok(());
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        if self.container {
            write!(f, "{}", SEPARATOR)?;
        }
        Ok(())
    }
}

/// Canonicalize a raw key string.
///
/// Collapses every resolvable `name/..` pair, drops empty segments, keeps
/// unresolvable leading `..` segments verbatim and preserves the trailing
/// separator of context keys. A key that collapses to nothing becomes the
/// empty string.
pub fn canonicalize(raw: &str) -> String {
    KeyPath::parse(raw).to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_canonicalize_parent_only() {
        assert_eq!(canonicalize(".."), "../");
        assert_eq!(canonicalize("../"), "../");
        assert_eq!(canonicalize("../.."), "../../");
    }

    #[test]
    fn test_canonicalize_collapses() {
        assert_eq!(canonicalize("a/.."), "");
        assert_eq!(canonicalize("a/b/../c/../.."), "");
        assert_eq!(canonicalize("a/b/.."), "a/");
        assert_eq!(canonicalize("a/b/../c"), "a/c");
        assert_eq!(canonicalize("a/../../b"), "../b");
    }

    #[test]
    fn test_canonicalize_keeps_unresolvable_parents() {
        assert_eq!(canonicalize("../../../foo/bar/baz"), "../../../foo/bar/baz");
        assert_eq!(
            canonicalize("../../../foo/bar/baz/"),
            "../../../foo/bar/baz/"
        );
    }

    #[test]
    fn test_canonicalize_no_leading_separator_after_cancel() {
        assert_eq!(canonicalize("x/y/../../qwerty"), "qwerty");
        assert_eq!(canonicalize("/x/../qwerty"), "qwerty");
    }

    #[test]
    fn test_canonicalize_empty_segments() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("/"), "");
        assert_eq!(canonicalize("//"), "");
        assert_eq!(canonicalize("/Foo/Bar//Baz"), "Foo/Bar/Baz");
        assert_eq!(canonicalize("Foo//"), "Foo/");
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let samples = [
            "",
            "/",
            "..",
            "a/..",
            "a/b/../c/../..",
            "../../../foo/bar/baz",
            "../../../foo/bar/baz/",
            "/Foo/Bar//Baz",
            "a/./b",
            "x/../../y/",
            "../a/../../b/c/..",
        ];
        for raw in samples {
            let once = canonicalize(raw);
            assert_eq!(canonicalize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_parse_flags() {
        let path = KeyPath::parse("/Foo/Bar");
        assert!(path.is_absolute());
        assert!(!path.is_container());
        assert_eq!(path.last_name(), Some("Bar"));

        let path = KeyPath::parse("Foo/Bar/");
        assert!(!path.is_absolute());
        assert!(path.is_container());

        let path = KeyPath::parse("a/..");
        assert!(path.is_empty());
        assert!(path.is_container());

        let path = KeyPath::parse("Foo").into_container();
        assert_eq!(path.to_string(), "Foo/");
    }

    #[test]
    fn test_dot_is_an_ordinary_name() {
        let path = KeyPath::parse("a/./b");
        assert_eq!(
            path.segments(),
            &[
                Segment::Name("a".into()),
                Segment::Name(".".into()),
                Segment::Name("b".into()),
            ]
        );
    }
}
