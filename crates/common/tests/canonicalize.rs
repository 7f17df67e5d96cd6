//! Integration tests for key canonicalization

use common::namespace::canonicalize;

#[test]
fn test_canonicalize_scenarios() {
    assert_eq!(canonicalize("a/b/../c/../.."), "");
    assert_eq!(
        canonicalize("../../../foo/bar/baz/"),
        "../../../foo/bar/baz/"
    );
    assert_eq!(canonicalize("../../../foo/bar/baz"), "../../../foo/bar/baz");
    assert_eq!(canonicalize(".."), "../");
    assert_eq!(canonicalize("a/.."), "");
}

#[test]
fn test_cancelled_prefix_leaves_bare_suffix() {
    let garbage = "x/y/z/../../..";
    assert_eq!(canonicalize(garbage), "");
    assert_eq!(canonicalize(&format!("{}/qwerty", garbage)), "qwerty");
}

/// Every key over a small alphabet of awkward segments, up to five long
fn all_keys() -> Vec<String> {
    const PARTS: [&str; 6] = ["a", "b", "..", "", ".", "c"];
    let mut keys = vec![String::new()];
    let mut frontier = vec![Vec::<&str>::new()];
    for _ in 0..5 {
        let mut next = Vec::new();
        for parts in &frontier {
            for part in PARTS {
                let mut grown = parts.clone();
                grown.push(part);
                keys.push(grown.join("/"));
                next.push(grown);
            }
        }
        frontier = next;
    }
    keys
}

#[test]
fn test_canonicalize_is_idempotent_and_clean() {
    let keys = all_keys();
    assert!(keys.len() > 9000);
    for raw in keys {
        for variant in [raw.clone(), format!("/{}", raw), format!("{}/", raw)] {
            let once = canonicalize(&variant);
            assert_eq!(canonicalize(&once), once, "raw key {:?}", variant);
            assert!(!once.starts_with('/'), "raw key {:?}", variant);
            assert!(!once.contains("//"), "raw key {:?}", variant);
            // unresolved climbs only ever lead the key
            let segments: Vec<&str> = once.split('/').filter(|s| !s.is_empty()).collect();
            let first_name = segments.iter().position(|s| *s != "..");
            if let Some(first_name) = first_name {
                assert!(
                    segments[first_name..].iter().all(|s| *s != ".."),
                    "raw key {:?} -> {:?}",
                    variant,
                    once
                );
            }
        }
    }
}
