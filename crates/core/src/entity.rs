//! Shop records with a stable identity.

/// A record that keeps its identity while its fields change: customers,
/// technicians, parts, catalog entries and repair jobs. Storage keys
/// documents by this id.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}
