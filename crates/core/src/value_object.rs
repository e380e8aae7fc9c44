//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are never mutated after construction; event
/// payloads and line-item snapshots are the main examples in this system. To
/// "change" one, build a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
