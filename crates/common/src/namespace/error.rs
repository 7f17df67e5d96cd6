/// Caller contract violations. Absence is never an error: reads return
/// `None` or an empty iterator instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    #[error("key names a context, not a value: {0:?}")]
    ContainerPath(String),
    #[error("key names a value, not a context: {0:?}")]
    ValuePath(String),
    #[error("no such parent exists for key: {0:?}")]
    NoSuchParent(String),
    #[error("cannot remove the acting context or one of its ancestors: {0:?}")]
    RemoveSelf(String),
    #[error("context has been detached from its tree")]
    Detached,
}
