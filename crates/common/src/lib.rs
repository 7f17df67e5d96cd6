/**
 * The namespace store itself.
 *  - Key canonicalization
 *  - The node tree and its live context views
 *  - Full and suffix key enumeration
 */
pub mod namespace;
/**
 * Helper for reporting build version information
 *  set at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::namespace::{
        canonicalize, Context, Entry, KeyPath, Namespace, NamespaceError, Value,
    };
    pub use crate::version::build_info;
}
