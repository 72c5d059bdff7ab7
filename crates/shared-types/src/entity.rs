//! Entity and identifier conventions.
//!
//! An identifier is an opaque, string-valued key, unique within its
//! collection; two identifiers are equal iff their underlying values are
//! equal. An entity is anything with an identifier, and entity equality is
//! defined solely by identifier equality, never by the other fields of the
//! aggregate.
//!
//! Service crates define one identifier newtype per aggregate (e.g.
//! `CarePlanId(String)`) deriving `Clone + Eq + Hash`, and implement this
//! trait on their aggregate wrappers with a manual `PartialEq` over the id.

use std::fmt::Display;
use std::hash::Hash;

/// An aggregate with a stable identifier.
///
/// `Id` is the per-aggregate newtype; the bounds are what the repository
/// port needs to key stored records.
pub trait Entity {
    type Id: Clone + Eq + Hash + Display + Send + Sync;

    /// The identifier this entity is keyed by.
    fn id(&self) -> &Self::Id;
}
