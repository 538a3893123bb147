use super::spouse_in;
use crate::matrix::{RelationCode, RelationMatrix};
use std::collections::{HashSet, VecDeque};

/// Assign integer starting columns, row by row from the top.
///
/// Within a row, members connected through same-row sibling edges form a
/// group; groups are laid out left to right with `group_gap` empty columns
/// between them, spouses inside a group taking adjacent slots. Members of
/// no group are appended after the groups.
pub(crate) fn assign_columns(matrix: &RelationMatrix, rows: &[i32], group_gap: i32) -> Vec<f32> {
    let n = matrix.len();
    let mut cols = vec![0f32; n];

    let mut row_values: Vec<i32> = rows.to_vec();
    row_values.sort_unstable();
    row_values.dedup();

    for r in row_values {
        let members: Vec<usize> = (0..n).filter(|&i| rows[i] == r).collect();
        place_row(matrix, rows, &members, &mut cols, group_gap);
    }
    cols
}

/// Connected components of the row under same-row sibling edges.
/// Singletons do not count as groups.
fn sibling_groups(matrix: &RelationMatrix, rows: &[i32], members: &[usize]) -> Vec<Vec<usize>> {
    let mut groups = Vec::new();
    let mut visited: HashSet<usize> = HashSet::new();

    for &start in members {
        if visited.contains(&start) {
            continue;
        }
        visited.insert(start);
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(cur) = queue.pop_front() {
            component.push(cur);
            for (j, code) in matrix.relations_of(cur) {
                if code == RelationCode::SiblingOf
                    && rows[j] == rows[cur]
                    && !visited.contains(&j)
                {
                    visited.insert(j);
                    queue.push_back(j);
                }
            }
        }
        if component.len() > 1 {
            groups.push(component);
        }
    }
    groups
}

fn place_row(
    matrix: &RelationMatrix,
    rows: &[i32],
    members: &[usize],
    cols: &mut [f32],
    group_gap: i32,
) {
    fn place(i: usize, cursor: &mut i32, placed: &mut HashSet<usize>, cols: &mut [f32]) {
        cols[i] = *cursor as f32;
        *cursor += 1;
        placed.insert(i);
    }

    let groups = sibling_groups(matrix, rows, members);
    let grouped: HashSet<usize> = groups.iter().flatten().copied().collect();
    let mut placed: HashSet<usize> = HashSet::new();
    let mut cursor: i32 = 0;

    for group in &groups {
        for &m in group {
            if placed.contains(&m) {
                continue;
            }
            place(m, &mut cursor, &mut placed, cols);
            if let Some(sp) = spouse_in(matrix, m) {
                if group.contains(&sp) && !placed.contains(&sp) {
                    place(sp, &mut cursor, &mut placed, cols);
                }
            }
        }
        cursor += group_gap;
    }

    for &m in members {
        if placed.contains(&m) || grouped.contains(&m) {
            continue;
        }
        place(m, &mut cursor, &mut placed, cols);
        if let Some(sp) = spouse_in(matrix, m) {
            if rows[sp] == rows[m] && !grouped.contains(&sp) && !placed.contains(&sp) {
                place(sp, &mut cursor, &mut placed, cols);
            }
        }
    }
}
