use crate::person::{ParentRole, PersonId};
use thiserror::Error;

/// Failures of relation assignment operations.
///
/// Every variant is raised before any mutation happens; the graph is
/// unchanged whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// The given id is not in the registry.
    #[error("person {0} is not in the registry")]
    UnknownPerson(PersonId),

    /// A record with this id already exists.
    #[error("a person with id {0} is already registered")]
    DuplicatePerson(PersonId),

    /// A person cannot be its own parent, child, spouse or sibling.
    #[error("{name} cannot be their own relative")]
    SelfRelation { id: PersonId, name: String },

    /// The person already has a different father.
    #[error("{name} already has a father assigned")]
    FatherAlreadyAssigned { id: PersonId, name: String },

    /// The person already has a different mother.
    #[error("{name} already has a mother assigned")]
    MotherAlreadyAssigned { id: PersonId, name: String },

    /// The person already has a different spouse.
    #[error("{name} already has a spouse assigned")]
    SpouseAlreadyAssigned { id: PersonId, name: String },

    /// The person already acts as the other parent of an existing child.
    #[error("{name} already acts as {actual} of a child and cannot be assigned as {requested}")]
    ParentRoleConflict {
        id: PersonId,
        name: String,
        actual: ParentRole,
        requested: ParentRole,
    },

    /// The assignment would make someone an ancestor of themselves.
    #[error("assigning {parent} as parent of {child} would make {parent} their own descendant")]
    AncestryCycle { parent: String, child: String },
}

/// Deleting the person would split the family into disconnected parts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot remove {name}: the family graph would split into disconnected parts")]
pub struct DeletionRefused {
    pub id: PersonId,
    pub name: String,
}

/// Failures of the removal workflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemovalError {
    #[error(transparent)]
    Relation(#[from] RelationError),
    #[error(transparent)]
    Refused(#[from] DeletionRefused),
}
