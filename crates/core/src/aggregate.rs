//! Aggregate root trait.

/// Aggregate root marker + minimal interface.
///
/// An aggregate exclusively owns its nested entities; anything outside the
/// aggregate refers to it only through `Id`.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;
}

/// Position of the aggregate with `id` in a slice.
pub fn find_index<A: AggregateRoot>(items: &[A], id: &A::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
