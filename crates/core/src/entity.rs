//! Entity trait: records that keep their identity while their fields change.

/// An identified domain record (`Advisor`, `Product`).
///
/// Stores key records by [`Entity::id`]; two entities with equal ids are the
/// same record even if their other fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
