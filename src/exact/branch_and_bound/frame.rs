use super::*;
use crate::utils::signal_handling;
use log::{debug, trace};
use std::time::Instant;

/// In paranoid mode, the lower bound of a search node is cross-checked against all completions
/// if at most this many rows remain active.
const PARANOIA_MAX_ACTIVE: usize = 6;

/// The best tour found so far. Its cost is the upper bound used for pruning.
#[derive(Clone, Debug)]
pub(super) struct Incumbent {
    pub(super) cost: Cost,
    pub(super) successors: Option<Vec<Node>>,
}

impl Incumbent {
    pub(super) fn unbounded() -> Self {
        Self {
            cost: INFINITY,
            successors: None,
        }
    }

    pub(super) fn is_improved_by(&self, bound: Cost) -> bool {
        bound < self.cost
    }

    fn replace(&mut self, cost: Cost, successors: Vec<Node>) {
        self.cost = cost;
        self.successors = Some(successors);
    }
}

/// The zero cell chosen for branching together with the lower bound increase incurred
/// if its edge is excluded. `row` and `col` index into the active sets.
#[derive(Clone, Copy, Debug)]
struct BranchCell {
    row: usize,
    col: usize,
    regret: Cost,
}

/// State shared by all frames of the recursive search. The cost matrix and the linkage are not
/// part of it, since frames hand out scoped modifications of them to their children.
pub(super) struct Search {
    pub(super) incumbent: Incumbent,
    pub(super) statistics: SearchStatistics,
    pub(super) deadline: Option<Instant>,
    /// Unmodified copy of the input, only kept in paranoid mode
    pub(super) pristine: Option<CostMatrix>,
}

impl Search {
    pub(super) fn new(pristine: Option<CostMatrix>) -> Self {
        Self {
            incumbent: Incumbent::unbounded(),
            statistics: SearchStatistics::default(),
            deadline: None,
            pristine,
        }
    }

    /// Explores the search node with the active `rows` and `cols` whose committed edges
    /// cost `weight` in total (relative to the reductions of all ancestors).
    pub(super) fn search(
        &mut self,
        matrix: &mut CostMatrix,
        links: &mut Linkage,
        rows: &[Node],
        cols: &[Node],
        weight: Cost,
    ) -> Result<(), SolveError> {
        debug_assert_eq!(rows.len(), cols.len());
        self.statistics.nodes += 1;
        self.check_interrupt()?;

        let mut reduced = Reduction::apply(matrix, rows, cols);
        let weight = weight + reduced.amount();

        trace!(
            "{} active: {:>3} lb: {weight} ub: {}",
            " ".repeat(links.successors().len() - 1 - rows.len()),
            rows.len(),
            self.incumbent.cost
        );

        if !self.incumbent.is_improved_by(weight) {
            self.statistics.bound_prunings += 1;
            return Ok(());
        }

        if let Some(pristine) = &self.pristine {
            assert_lower_bound(pristine, &reduced, links, rows, cols, weight);
        }

        if rows.len() == 2 {
            self.close_tour(&reduced, links, rows, cols, weight);
            return Ok(());
        }

        let Some(branch) = select_branch_cell(&reduced, rows, cols) else {
            return Ok(());
        };

        let (from, to) = (rows[branch.row], cols[branch.col]);
        let threshold = weight + branch.regret;

        // include `from -> to`; the edge closing the extended path into a cycle is forbidden
        {
            let mut links = links.commit(from, to);
            let head = links.path_head(from);
            let tail = links.path_tail(to);
            let mut masked = MaskedCell::new(&mut reduced, tail, head);

            let child_rows = without(rows, branch.row);
            let child_cols = without(cols, branch.col);
            self.search(&mut masked, &mut links, &child_rows, &child_cols, weight)?;
        }

        // exclude `from -> to`
        if self.incumbent.is_improved_by(threshold) {
            let mut masked = MaskedCell::new(&mut reduced, from, to);
            self.search(&mut masked, links, rows, cols, weight)?;
        } else {
            self.statistics.skipped_exclusions += 1;
        }

        Ok(())
    }

    fn check_interrupt(&self) -> Result<(), SolveError> {
        let timed_out = self
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline);

        if timed_out || signal_handling::received_ctrl_c() {
            return Err(SolveError::Interrupted {
                iterations: self.statistics.nodes,
            });
        }

        Ok(())
    }

    /// With two rows left, exactly one of the two assignments avoids closing a premature cycle;
    /// the other one uses a forbidden cell.
    fn close_tour(
        &mut self,
        matrix: &CostMatrix,
        links: &Linkage,
        rows: &[Node],
        cols: &[Node],
        weight: Cost,
    ) {
        let straight = !matrix.is_forbidden(rows[0], cols[0]) && !matrix.is_forbidden(rows[1], cols[1]);
        let (first, second) = if straight {
            (cols[0], cols[1])
        } else {
            (cols[1], cols[0])
        };

        let mut successors = links.successors().to_vec();
        successors[rows[0] as usize] = first;
        successors[rows[1] as usize] = second;

        debug!(
            "Improved tour cost from {} to {weight} after {} nodes",
            self.incumbent.cost, self.statistics.nodes
        );

        self.statistics.improvements += 1;
        self.incumbent.replace(weight, successors);
    }
}

/// Returns the zero cell whose exclusion raises the lower bound the most, i.e. the one
/// maximizing the sum of the smallest other cost in its row and in its column.
/// Ties are broken in favor of the first such cell in row-major order.
fn select_branch_cell(matrix: &CostMatrix, rows: &[Node], cols: &[Node]) -> Option<BranchCell> {
    let mut best: Option<BranchCell> = None;

    for (i, &r) in rows.iter().enumerate() {
        for (j, &c) in cols.iter().enumerate() {
            if matrix.get(r, c) != 0.0 {
                continue;
            }

            let row_alternative = cols
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != j)
                .map(|(_, &c)| matrix.get(r, c))
                .fold(INFINITY, Cost::min);

            let col_alternative = rows
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != i)
                .map(|(_, &r)| matrix.get(r, c))
                .fold(INFINITY, Cost::min);

            let regret = row_alternative + col_alternative;
            if best.is_none_or(|b| regret > b.regret) {
                best = Some(BranchCell {
                    row: i,
                    col: j,
                    regret,
                });
            }
        }
    }

    best
}

fn without(nodes: &[Node], index: usize) -> Vec<Node> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(k, &u)| (k != index).then_some(u))
        .collect()
}

/// Checks that `weight` does not exceed the cost of any tour that completes the committed
/// edges using only finite cells of the active submatrix.
fn assert_lower_bound(
    pristine: &CostMatrix,
    matrix: &CostMatrix,
    links: &Linkage,
    rows: &[Node],
    cols: &[Node],
    weight: Cost,
) {
    if rows.len() > PARANOIA_MAX_ACTIVE {
        return;
    }

    for perm in (0..cols.len()).permutations(cols.len()) {
        if rows
            .iter()
            .zip(&perm)
            .any(|(&r, &k)| matrix.is_forbidden(r, cols[k]))
        {
            continue;
        }

        let mut successors = links.successors().to_vec();
        for (&r, &k) in rows.iter().zip(&perm) {
            successors[r as usize] = cols[k];
        }

        // completions containing a shorter cycle do not visit every destination from 1
        let tour = Tour::from_successors(&successors, 0.0);
        if tour.is_correct().is_err() {
            continue;
        }

        let cost = pristine.tour_cost(tour.order());
        assert!(
            weight <= cost + 1e-9 * cost.abs().max(1.0),
            "lower bound {weight} exceeds cost {cost} of tour {:?}",
            tour.order()
        );
    }
}
