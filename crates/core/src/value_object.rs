//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values
/// (`Price`, `Email`), as opposed to entities which carry an identity
/// (`Advisor`, `Product`). To "modify" a value object, construct a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
