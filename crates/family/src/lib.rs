//! Family relationship graph
//!
//! A [`FamilyGraph`] registry owns every [`Person`] record; persons refer
//! to each other by [`PersonId`] through four relation kinds: parent,
//! child, spouse and sibling. Assignment operations keep both directions
//! of every link consistent and reconcile the surrounding relations after
//! each change (parents become spouses, siblings share parents, spouses
//! share children).
//!
//! Deletion is guarded by the [`connectivity`] module: removing a person
//! who alone connects two parts of the family is refused.
//!
//! The graph is synchronous and single-threaded by design; callers
//! serialize mutating access.
//!
//! ```
//! use arbor_family::{FamilyGraph, Person, PersonId};
//! use chrono::NaiveDate;
//!
//! let mut family = FamilyGraph::new();
//! let birth = NaiveDate::from_ymd_opt(1955, 3, 2).unwrap();
//! family.add_person(Person::new(PersonId(1), "Luis", birth, true, None))?;
//! let birth = NaiveDate::from_ymd_opt(1980, 7, 19).unwrap();
//! family.add_person(Person::new(PersonId(2), "Pedro", birth, true, None))?;
//!
//! family.assign_father(PersonId(2), PersonId(1))?;
//! assert_eq!(family.get(PersonId(1)).unwrap().children(), &[PersonId(2)]);
//! # Ok::<(), arbor_family::RelationError>(())
//! ```

pub mod connectivity;
mod error;
mod graph;
mod person;

pub use error::{DeletionRefused, RelationError, RemovalError};
pub use graph::FamilyGraph;
pub use person::{ParentRole, Person, PersonId};
