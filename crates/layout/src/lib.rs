//! Relation matrix and generation grid layout for family graphs
//!
//! [`RelationMatrix`] snapshots an [`arbor_family::FamilyGraph`] into a
//! weight-coded adjacency matrix; [`GenerationLayout`] turns that snapshot
//! into a `(row, column)` grid cell per person, with parents above and
//! centered over their children, spouses adjacent and sibling groups
//! contiguous. A renderer draws boxes at the cells and lines along the
//! matrix's relation codes; nothing here draws or persists.
//!
//! ```
//! use arbor_family::{FamilyGraph, Person, PersonId};
//! use arbor_layout::{GenerationLayout, RelationMatrix};
//! use chrono::NaiveDate;
//!
//! let mut family = FamilyGraph::new();
//! let birth = NaiveDate::from_ymd_opt(1955, 3, 2).unwrap();
//! family.add_person(Person::new(PersonId(1), "Luis", birth, true, None))?;
//! let birth = NaiveDate::from_ymd_opt(1980, 7, 19).unwrap();
//! family.add_person(Person::new(PersonId(2), "Pedro", birth, true, None))?;
//! family.assign_father(PersonId(2), PersonId(1))?;
//!
//! let matrix = RelationMatrix::build(&family);
//! let coords = GenerationLayout::new().compute(&matrix);
//! assert_eq!(coords[&PersonId(1)].row, 0);
//! assert_eq!(coords[&PersonId(2)].row, 1);
//! # Ok::<(), arbor_family::RelationError>(())
//! ```

mod geometry;
pub mod generations;
mod matrix;

pub use generations::GenerationLayout;
pub use geometry::GridCoord;
pub use matrix::{RelationCode, RelationMatrix};
