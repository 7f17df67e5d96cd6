//! Integration tests for context creation, removal and attributes

mod common;

use std::collections::BTreeSet;

use ::common::namespace::{NamespaceError, Value};

#[test]
fn test_create_context() {
    let ns = common::setup_test_namespace(&[]);

    let ctx = ns.create_context("/Project/Phase/").unwrap();
    assert_eq!(ctx.path().as_deref(), Some("/Project/Phase/"));
    assert!(ctx.is_empty());
    assert_eq!(ns.root().children(), vec!["Project".to_string()]);

    // creating again opens the same context
    let again = ns.create_context("Project/Phase/").unwrap();
    assert_eq!(again, ctx);

    assert_eq!(ns.create_context("").unwrap(), ns.root());
    assert!(matches!(
        ns.create_context("Project/Leaf"),
        Err(NamespaceError::ValuePath(_))
    ));
}

#[test]
fn test_remove_context_drops_index_entries() {
    let ns = common::setup_test_namespace(&[
        ("/P/A/Time", "1"),
        ("/P/A/B/Time", "2"),
        ("/P/C/Time", "3"),
        ("/Q/Time", "4"),
    ]);
    let before = ns.node_count();

    assert_eq!(ns.remove_context("/P/A/").unwrap(), 2);
    assert_eq!(ns.node_count(), before - 4);

    let found: BTreeSet<String> = ns.keys_ending_with("Time").collect();
    let expected: BTreeSet<String> = ["/P/C/Time", "/Q/Time"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(found, expected);
    assert_eq!(ns.get("/P/A/"), None);
    assert_eq!(ns.get_value("/P/C/Time"), Some(Value::from("3")));
}

#[test]
fn test_remove_context_prunes_emptied_parents() {
    let ns = common::setup_test_namespace(&[("/P/A/Time", "1")]);
    assert_eq!(ns.remove_context("P/A/").unwrap(), 1);
    assert_eq!(ns.node_count(), 1);
    assert!(ns.root().children().is_empty());
}

#[test]
fn test_remove_context_on_leaf_is_noop() {
    let ns = common::setup_test_namespace(&[("/P/Time", "1")]);
    assert_eq!(ns.remove_context("P/Time/").unwrap(), 0);
    assert_eq!(ns.get_value("P/Time"), Some(Value::from("1")));
}

#[test]
fn test_remove_context_from_a_sibling_view() {
    let ns = common::setup_test_namespace(&[("/P/A/x", "1"), ("/P/B/y", "2")]);
    let a = ns.get_context("/P/A/").unwrap();
    assert_eq!(a.remove_context("../B/").unwrap(), 1);
    assert_eq!(ns.get_value("/P/B/y"), None);
    assert_eq!(a.get_value("x"), Some(Value::from("1")));
}

#[test]
fn test_views_below_removed_context_detach() {
    let ns = common::setup_test_namespace(&[("/P/A/B/x", "1")]);
    let b = ns.get_context("/P/A/B/").unwrap();
    ns.remove_context("/P/").unwrap();

    assert!(b.is_detached());
    assert_eq!(b.get_value("x"), None);
    assert_eq!(b.put("x", "2"), Err(NamespaceError::Detached));
    assert_eq!(b.create_context("y/"), Err(NamespaceError::Detached));
    assert_eq!(b.put_attribute("unit", "h"), Err(NamespaceError::Detached));
    assert_eq!(b.deepest_existing_subtree("x"), b);
    assert!(b.children().is_empty());

    // the slots get recycled without the stale view seeing them
    ns.put("/P/A/B/x", "3").unwrap();
    assert!(b.is_detached());
    assert_eq!(b.get_value("x"), None);
}

#[test]
fn test_attribute_inheritance_through_views() {
    let ns = common::setup_test_namespace(&[("/Project/Task/Time", "4")]);
    let project = ns.get_context("/Project/").unwrap();
    project.put_attribute("template", "PSP2").unwrap();

    let task = ns.get_context("/Project/Task/").unwrap();
    assert_eq!(task.get_attribute("template", false), None);
    assert_eq!(
        task.get_attribute("template", true),
        Some(Value::from("PSP2"))
    );
    assert_eq!(ns.get_attribute("template", true), None);
}

#[test]
fn test_attributes_keep_node_alive() {
    let ns = common::setup_test_namespace(&[("/A/x", "1")]);
    ns.get_context("/A/")
        .unwrap()
        .put_attribute("colour", "red")
        .unwrap();
    ns.remove("/A/x").unwrap();
    let a = ns.get_context("/A/").unwrap();
    assert_eq!(a.get_attribute("colour", false), Some(Value::from("red")));
}
