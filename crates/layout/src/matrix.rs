use arbor_family::{FamilyGraph, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One-hop relation between two persons, read from the row person's
/// perspective: `matrix[i][j] == FatherOf` means i is the father of j.
///
/// The integer codes are part of the renderer contract: 0 father-of,
/// 1 mother-of, 2 has-father, 3 has-mother, 4 spouse, 5 sibling, and -1
/// for an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationCode {
    FatherOf,
    MotherOf,
    HasFather,
    HasMother,
    SpouseOf,
    SiblingOf,
}

impl RelationCode {
    /// The wire code of the cell; empty cells are -1.
    pub fn code(self) -> i8 {
        match self {
            RelationCode::FatherOf => 0,
            RelationCode::MotherOf => 1,
            RelationCode::HasFather => 2,
            RelationCode::HasMother => 3,
            RelationCode::SpouseOf => 4,
            RelationCode::SiblingOf => 5,
        }
    }
}

/// Weighted adjacency matrix over a snapshot of a [`FamilyGraph`].
///
/// Rows and columns follow the registry's insertion order. Only direct
/// relations are encoded; the matrix is not transitively closed and must
/// be rebuilt after any graph mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMatrix {
    ids: Vec<PersonId>,
    index: HashMap<PersonId, usize>,
    cells: Vec<Option<RelationCode>>,
}

impl RelationMatrix {
    /// Snapshot the graph into a fresh matrix.
    pub fn build(graph: &FamilyGraph) -> Self {
        let ids: Vec<PersonId> = graph.ids().to_vec();
        let index: HashMap<PersonId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let n = ids.len();
        let mut matrix = Self {
            ids,
            index,
            cells: vec![None; n * n],
        };

        for person in graph.people() {
            let i = matrix.index[&person.id()];
            if let Some(f) = person.father() {
                let p = matrix.index[&f];
                matrix.set(p, i, RelationCode::FatherOf);
                matrix.set(i, p, RelationCode::HasFather);
            }
            if let Some(m) = person.mother() {
                let p = matrix.index[&m];
                matrix.set(p, i, RelationCode::MotherOf);
                matrix.set(i, p, RelationCode::HasMother);
            }
        }
        for person in graph.people() {
            if let Some(sp) = person.spouse() {
                let i = matrix.index[&person.id()];
                let j = matrix.index[&sp];
                matrix.set(i, j, RelationCode::SpouseOf);
                matrix.set(j, i, RelationCode::SpouseOf);
            }
        }
        for person in graph.people() {
            let i = matrix.index[&person.id()];
            for &sib in person.siblings() {
                let j = matrix.index[&sib];
                matrix.set(i, j, RelationCode::SiblingOf);
                matrix.set(j, i, RelationCode::SiblingOf);
            }
        }

        debug!(persons = n, "relation matrix built");
        matrix
    }

    /// Number of persons in the snapshot.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Person ids in row order.
    pub fn ids(&self) -> &[PersonId] {
        &self.ids
    }

    pub fn index_of(&self, id: PersonId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn id_at(&self, i: usize) -> PersonId {
        self.ids[i]
    }

    /// Relation of row i toward column j, if any.
    pub fn get(&self, i: usize, j: usize) -> Option<RelationCode> {
        self.cells[i * self.ids.len() + j]
    }

    /// Relation between two persons by id.
    pub fn between(&self, a: PersonId, b: PersonId) -> Option<RelationCode> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.get(i, j)
    }

    /// Wire code of cell (i, j); -1 when unrelated.
    pub fn code(&self, i: usize, j: usize) -> i8 {
        self.get(i, j).map_or(-1, RelationCode::code)
    }

    /// All non-empty cells of row i.
    pub fn relations_of(&self, i: usize) -> impl Iterator<Item = (usize, RelationCode)> + '_ {
        let n = self.ids.len();
        self.cells[i * n..(i + 1) * n]
            .iter()
            .enumerate()
            .filter_map(|(j, cell)| cell.map(|code| (j, code)))
    }

    fn set(&mut self, i: usize, j: usize, code: RelationCode) {
        let n = self.ids.len();
        self.cells[i * n + j] = Some(code);
    }
}
