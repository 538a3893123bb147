use super::{children_of, spouse_in};
use crate::matrix::RelationMatrix;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Center parents over their children, processing rows bottom-up so that
/// every span is computed over final child columns.
///
/// A parent lands on the shifted mean of its children's column span (each
/// child's in-row spouse widens the span); the parent's own in-row spouse
/// follows one column to the right. Childless members of a re-centered row
/// are queued and appended after its rightmost occupied column. Each row
/// ends with an overlap sweep that keeps columns strictly increasing.
pub(crate) fn center_over_children(matrix: &RelationMatrix, rows: &[i32], cols: &mut [f32]) {
    let n = matrix.len();
    if n == 0 {
        return;
    }
    let max_row = rows.iter().copied().max().unwrap_or(0);

    for r in (0..=max_row).rev() {
        let members: Vec<usize> = (0..n).filter(|&i| rows[i] == r).collect();
        if members.is_empty() {
            continue;
        }
        center_row(matrix, rows, cols, &members, r);
        resolve_overlaps(cols, &members);
    }
}

fn center_row(matrix: &RelationMatrix, rows: &[i32], cols: &mut [f32], members: &[usize], r: i32) {
    let mut placed: HashSet<usize> = HashSet::new();

    for &m in members {
        if placed.contains(&m) {
            continue;
        }
        let children = children_of(matrix, m);
        if children.is_empty() {
            continue;
        }

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &c in &children {
            min = min.min(cols[c]);
            max = max.max(cols[c]);
            if let Some(sp) = spouse_in(matrix, c) {
                if rows[sp] == rows[c] {
                    min = min.min(cols[sp]);
                    max = max.max(cols[sp]);
                }
            }
        }

        // mean of the integer span [min..max], shifted half a slot left so
        // a parent pair straddles the middle
        cols[m] = (min + max) / 2.0 - 0.5;
        placed.insert(m);
        if let Some(sp) = spouse_in(matrix, m) {
            if rows[sp] == r {
                cols[sp] = cols[m] + 1.0;
                placed.insert(sp);
            }
        }
    }

    // A row without any parent keeps its grid columns from the previous
    // phase.
    if placed.is_empty() {
        return;
    }

    let mut rightmost = placed
        .iter()
        .map(|&i| cols[i])
        .fold(f32::NEG_INFINITY, f32::max);

    let mut queue: Vec<usize> = members
        .iter()
        .copied()
        .filter(|m| !placed.contains(m))
        .collect();
    queue.sort_by(|&a, &b| cols[a].partial_cmp(&cols[b]).unwrap_or(Ordering::Equal));

    for m in queue {
        if placed.contains(&m) {
            continue;
        }
        rightmost += 1.0;
        cols[m] = rightmost;
        placed.insert(m);
        if let Some(sp) = spouse_in(matrix, m) {
            if rows[sp] == r && !placed.contains(&sp) {
                rightmost += 1.0;
                cols[sp] = rightmost;
                placed.insert(sp);
            }
        }
    }
}

/// Push any occupant that does not strictly exceed its predecessor to
/// `predecessor + 1`.
fn resolve_overlaps(cols: &mut [f32], members: &[usize]) {
    let mut order = members.to_vec();
    order.sort_by(|&a, &b| cols[a].partial_cmp(&cols[b]).unwrap_or(Ordering::Equal));

    for k in 1..order.len() {
        let prev = cols[order[k - 1]];
        if cols[order[k]] <= prev {
            cols[order[k]] = prev + 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_overlaps;
    use test_log::test;

    #[test]
    fn equal_columns_are_pushed_apart() {
        let mut cols = vec![0.0, 0.0, 2.0];
        resolve_overlaps(&mut cols, &[0, 1, 2]);
        assert_eq!(cols, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn a_pile_up_cascades_to_the_right() {
        let mut cols = vec![1.0, 1.0, 1.0];
        resolve_overlaps(&mut cols, &[0, 1, 2]);
        assert_eq!(cols, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn strictly_increasing_columns_are_untouched() {
        let mut cols = vec![-0.5, 0.5, 3.0];
        resolve_overlaps(&mut cols, &[0, 1, 2]);
        assert_eq!(cols, vec![-0.5, 0.5, 3.0]);
    }
}
