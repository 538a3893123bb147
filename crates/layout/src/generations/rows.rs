use crate::matrix::{RelationCode, RelationMatrix};
use std::collections::VecDeque;
use tracing::warn;

/// Assign a generation row to every person by fixed-point relaxation.
///
/// Every row starts at zero and all persons are queued. Dequeuing a person
/// corrects each neighbor that violates a constraint relative to it: a
/// child sits at least one row below its parent, spouses and siblings share
/// a row. Corrected neighbors are re-enqueued. Parents of the dequeued
/// person may be pushed to negative rows; a final shift moves the minimum
/// back to zero.
///
/// Termination relies on the parent orientation being acyclic, which the
/// graph enforces at assignment time.
pub(crate) fn assign_rows(matrix: &RelationMatrix) -> Vec<i32> {
    let n = matrix.len();
    let mut rows = vec![0i32; n];
    if n == 0 {
        return rows;
    }

    let mut queue: VecDeque<usize> = (0..n).collect();
    let mut queued = vec![true; n];
    // Contradictory equal-row and parent constraints cannot all be
    // satisfied; cap the work instead of ping-ponging forever.
    let mut budget = (n * n * n).max(64);

    while let Some(i) = queue.pop_front() {
        queued[i] = false;
        if budget == 0 {
            warn!("row relaxation did not settle, keeping current rows");
            break;
        }
        budget -= 1;

        for (j, code) in matrix.relations_of(i) {
            let corrected = match code {
                // i is a parent of j: j belongs at least one row below
                RelationCode::FatherOf | RelationCode::MotherOf => {
                    (rows[j] < rows[i] + 1).then_some(rows[i] + 1)
                }
                // j is a parent of i: j belongs at least one row above
                RelationCode::HasFather | RelationCode::HasMother => {
                    (rows[j] > rows[i] - 1).then_some(rows[i] - 1)
                }
                RelationCode::SpouseOf | RelationCode::SiblingOf => {
                    (rows[j] != rows[i]).then_some(rows[i])
                }
            };
            if let Some(row) = corrected {
                rows[j] = row;
                if !queued[j] {
                    queued[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }

    let min = rows.iter().copied().min().unwrap_or(0);
    for r in &mut rows {
        *r -= min;
    }
    rows
}
