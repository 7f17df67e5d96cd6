//! Hierarchical namespace store
//!
//! An in-memory tree keyed by slash-delimited names, much like a Unix path:
//!
//! - **[`canonicalize`] / [`KeyPath`]**: normalize raw keys, resolving `..`
//! - **[`Namespace`]**: a store, dereferencing to its root [`Context`]
//! - **[`Context`]**: a live view bound to one node, resolving keys relative to it
//! - **[`Keys`]**: lazy enumeration of every key holding a value
//! - **[`Value`]**: whatever is stored at a value slot
//!
//! # Keys
//!
//! ```text
//! /Project/Task/Time     absolute value key
//! Task/Time              value key, relative to the acting context
//! ../Other/              context key, one level up
//! ```
//!
//! A trailing `/` names a context; no trailing `/` names a value slot. The
//! same node may hold a value and have children at once.
//!
//! # Storage
//!
//! Nodes live in an arena addressed by generation-checked ids. A secondary
//! index maps each key's final segment to the full keys ending in it, so
//! [`Context::keys_ending_with`] never walks the tree.

mod context;
mod error;
mod keys;
mod node;
mod path;
mod suffix_index;
mod tree;
mod value;

pub use context::{Context, Entry, Namespace};
pub use error::NamespaceError;
pub use keys::Keys;
pub use path::{canonicalize, KeyPath, Segment, PARENT_NAME, SEPARATOR};
pub use value::Value;
