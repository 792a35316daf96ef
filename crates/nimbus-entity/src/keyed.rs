//! Identity trait shared by every entity kept in a normalized collection.

use std::fmt::Debug;
use std::hash::Hash;

/// An entity with a stable identifier.
pub trait Keyed: Clone {
    /// The identifier type.
    type Id: Clone + Eq + Hash + Debug;

    /// Return the entity's identifier.
    fn id(&self) -> &Self::Id;
}
