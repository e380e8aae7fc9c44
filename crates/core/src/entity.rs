//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + Send + Sync + From<i64> + Into<i64> + 'static;

    /// Name used in logs and storage errors (e.g. "order").
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
