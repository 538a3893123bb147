//! Generation grid layout
//!
//! Turns a [`RelationMatrix`] snapshot into one grid cell per person, in
//! three phases: generation rows by constraint relaxation, starting
//! columns by sibling grouping, and a bottom-up centering pass that places
//! every parent over its children's span.

mod centering;
mod columns;
mod rows;

use crate::geometry::GridCoord;
use crate::matrix::{RelationCode, RelationMatrix};
use arbor_family::PersonId;
use std::collections::HashMap;
use tracing::debug;

/// Configuration for the generation layout.
///
/// The engine assumes the snapshot already satisfies the graph invariants;
/// it never fails, it only places.
#[derive(Debug, Clone)]
pub struct GenerationLayout {
    /// Columns left empty between sibling groups of a row.
    pub group_gap: i32,
}

impl Default for GenerationLayout {
    fn default() -> Self {
        Self { group_gap: 1 }
    }
}

impl GenerationLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute a grid cell for every person of the snapshot.
    pub fn compute(&self, matrix: &RelationMatrix) -> HashMap<PersonId, GridCoord> {
        let rows = rows::assign_rows(matrix);
        let mut cols = columns::assign_columns(matrix, &rows, self.group_gap);
        centering::center_over_children(matrix, &rows, &mut cols);
        debug!(persons = matrix.len(), "generation layout computed");

        (0..matrix.len())
            .map(|i| (matrix.id_at(i), GridCoord::new(rows[i], cols[i])))
            .collect()
    }
}

/// Index of the in-matrix spouse of person i, if any.
pub(crate) fn spouse_in(matrix: &RelationMatrix, i: usize) -> Option<usize> {
    matrix
        .relations_of(i)
        .find(|&(_, code)| code == RelationCode::SpouseOf)
        .map(|(j, _)| j)
}

/// Indices of the children of person i.
pub(crate) fn children_of(matrix: &RelationMatrix, i: usize) -> Vec<usize> {
    matrix
        .relations_of(i)
        .filter(|&(_, code)| matches!(code, RelationCode::FatherOf | RelationCode::MotherOf))
        .map(|(j, _)| j)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_family::{FamilyGraph, Person};
    use chrono::NaiveDate;
    use test_log::test;

    fn graph_of(names: &[&str]) -> FamilyGraph {
        let mut g = FamilyGraph::new();
        for (i, name) in names.iter().enumerate() {
            g.add_person(Person::new(
                PersonId(i as u64 + 1),
                *name,
                NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
                true,
                None,
            ))
            .unwrap();
        }
        g
    }

    fn layout_of(g: &FamilyGraph) -> HashMap<PersonId, GridCoord> {
        GenerationLayout::new().compute(&RelationMatrix::build(g))
    }

    #[test]
    fn child_sits_one_row_below_its_father() {
        let mut g = graph_of(&["Luis", "Pedro"]);
        g.assign_father(PersonId(2), PersonId(1)).unwrap();

        let coords = layout_of(&g);
        assert_eq!(coords[&PersonId(2)].row, coords[&PersonId(1)].row + 1);
        assert_eq!(coords[&PersonId(1)].row, 0);
    }

    #[test]
    fn rows_grow_monotonically_down_the_generations() {
        // grandparents, a parent couple, an uncle, two children
        let mut g = graph_of(&["GF", "GM", "P", "U", "S", "C1", "C2"]);
        g.assign_father(PersonId(3), PersonId(1)).unwrap();
        g.assign_mother(PersonId(3), PersonId(2)).unwrap();
        g.assign_father(PersonId(4), PersonId(1)).unwrap();
        g.assign_spouse(PersonId(3), PersonId(5)).unwrap();
        g.assign_father(PersonId(6), PersonId(3)).unwrap();
        g.assign_father(PersonId(7), PersonId(3)).unwrap();

        let coords = layout_of(&g);
        for person in g.people() {
            let row = coords[&person.id()].row;
            for &child in person.children() {
                assert!(coords[&child].row >= row + 1);
            }
        }
    }

    #[test]
    fn spouses_and_siblings_share_a_row() {
        let mut g = graph_of(&["Luis", "Ana", "Pedro", "Juan"]);
        g.assign_father(PersonId(3), PersonId(1)).unwrap();
        g.assign_mother(PersonId(3), PersonId(2)).unwrap();
        g.assign_father(PersonId(4), PersonId(1)).unwrap();

        let coords = layout_of(&g);
        assert_eq!(coords[&PersonId(1)].row, coords[&PersonId(2)].row);
        assert_eq!(coords[&PersonId(3)].row, coords[&PersonId(4)].row);
    }

    #[test]
    fn isolated_person_gets_the_origin_cell() {
        let g = graph_of(&["Solo"]);
        let coords = layout_of(&g);
        assert_eq!(coords[&PersonId(1)], GridCoord::new(0, 0.0));
    }

    #[test]
    fn parent_pair_centers_over_its_children() {
        let mut g = graph_of(&["Luis", "Ana", "Pedro", "Juan"]);
        g.assign_father(PersonId(3), PersonId(1)).unwrap();
        g.assign_mother(PersonId(3), PersonId(2)).unwrap();
        g.assign_father(PersonId(4), PersonId(1)).unwrap();
        g.assign_mother(PersonId(4), PersonId(2)).unwrap();

        let coords = layout_of(&g);
        // children keep their sibling-group slots
        assert_eq!(coords[&PersonId(3)].col, 0.0);
        assert_eq!(coords[&PersonId(4)].col, 1.0);
        // the couple straddles the span's middle
        assert_eq!(coords[&PersonId(1)].col, 0.0);
        assert_eq!(coords[&PersonId(2)].col, 1.0);
    }

    #[test]
    fn single_parent_of_three_lands_on_a_fractional_column() {
        let mut g = graph_of(&["P", "C1", "C2", "C3"]);
        for child in [2, 3, 4] {
            g.assign_father(PersonId(child), PersonId(1)).unwrap();
        }

        let coords = layout_of(&g);
        assert_eq!(coords[&PersonId(1)].col, 1.0 - 0.5);
    }

    #[test]
    fn childless_row_members_are_appended_after_the_parents() {
        let mut g = graph_of(&["Luis", "Ana", "Pedro", "Juan", "Tío"]);
        g.assign_father(PersonId(3), PersonId(1)).unwrap();
        g.assign_mother(PersonId(3), PersonId(2)).unwrap();
        g.assign_father(PersonId(4), PersonId(1)).unwrap();
        g.assign_sibling(PersonId(1), PersonId(5)).unwrap();

        let coords = layout_of(&g);
        assert_eq!(coords[&PersonId(5)].row, coords[&PersonId(1)].row);
        assert!(coords[&PersonId(5)].col > coords[&PersonId(1)].col);
        assert!(coords[&PersonId(5)].col > coords[&PersonId(2)].col);
    }

    #[test]
    fn no_two_row_members_share_a_column() {
        let mut g = graph_of(&["GF", "GM", "P", "S", "U", "C1", "C2", "N"]);
        g.assign_father(PersonId(3), PersonId(1)).unwrap();
        g.assign_mother(PersonId(3), PersonId(2)).unwrap();
        g.assign_father(PersonId(5), PersonId(1)).unwrap();
        g.assign_spouse(PersonId(3), PersonId(4)).unwrap();
        g.assign_father(PersonId(6), PersonId(3)).unwrap();
        g.assign_father(PersonId(7), PersonId(3)).unwrap();
        g.assign_father(PersonId(8), PersonId(5)).unwrap();

        let coords = layout_of(&g);
        let mut by_row: HashMap<i32, Vec<f32>> = HashMap::new();
        for cell in coords.values() {
            by_row.entry(cell.row).or_default().push(cell.col);
        }
        for cols in by_row.values_mut() {
            cols.sort_by(|a, b| a.partial_cmp(b).unwrap());
            for pair in cols.windows(2) {
                assert!(pair[1] > pair[0], "overlapping columns: {pair:?}");
            }
        }
    }

    #[test]
    fn layout_is_deterministic_for_a_fixed_graph() {
        let mut g = graph_of(&["GF", "GM", "P", "S", "C1", "C2"]);
        g.assign_father(PersonId(3), PersonId(1)).unwrap();
        g.assign_mother(PersonId(3), PersonId(2)).unwrap();
        g.assign_spouse(PersonId(3), PersonId(4)).unwrap();
        g.assign_father(PersonId(5), PersonId(3)).unwrap();
        g.assign_father(PersonId(6), PersonId(3)).unwrap();

        let first = layout_of(&g);
        let second = layout_of(&g);
        assert_eq!(first, second);
    }
}
