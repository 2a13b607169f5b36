//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Index of the first entity carrying `id`, if any.
pub fn position_of<E: Entity>(entities: &[E], id: E::Id) -> Option<usize> {
    entities.iter().position(|e| e.id() == id)
}
