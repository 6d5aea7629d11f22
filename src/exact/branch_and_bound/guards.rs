//! Scoped modifications of the search state. Each guard applies its modification on
//! construction and reverts it exactly when dropped; this covers all exits of a search frame,
//! including pruning and early returns due to interruption.

use super::*;
use std::ops::{Deref, DerefMut};

macro_rules! impl_guard_deref {
    ($guard : ident, $field : ident, $target : ty) => {
        impl Deref for $guard<'_> {
            type Target = $target;

            fn deref(&self) -> &Self::Target {
                &*self.$field
            }
        }

        impl DerefMut for $guard<'_> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut *self.$field
            }
        }
    };
}

/// Row and column reduction of the submatrix spanned by the active rows and columns.
///
/// Every active row (and afterwards every active column) is decreased by its minimum so that
/// it contains at least one zero. Infinite cells are never touched. The sum of all minima,
/// [`Reduction::amount`], is a lower bound on the cost of any assignment within the submatrix.
/// If some row or column has no finite cell, the amount is [`INFINITY`] and the submatrix is left
/// partially reduced.
///
/// Instead of adding the minima back, the guard keeps a copy of the submatrix taken before the
/// reduction and writes it back on drop, so the restored costs are bit-identical.
pub(super) struct Reduction<'a> {
    matrix: &'a mut CostMatrix,
    rows: &'a [Node],
    cols: &'a [Node],
    saved: Vec<Cost>,
    amount: Cost,
}

impl_guard_deref!(Reduction, matrix, CostMatrix);

impl<'a> Reduction<'a> {
    pub(super) fn apply(matrix: &'a mut CostMatrix, rows: &'a [Node], cols: &'a [Node]) -> Self {
        let saved = rows
            .iter()
            .cartesian_product(cols)
            .map(|(&r, &c)| matrix.get(r, c))
            .collect();

        let mut reduction = Self {
            matrix,
            rows,
            cols,
            saved,
            amount: 0.0,
        };

        reduction.amount = reduction.reduce();
        reduction
    }

    pub(super) fn amount(&self) -> Cost {
        self.amount
    }

    fn reduce(&mut self) -> Cost {
        let mut amount = 0.0;

        for &r in self.rows {
            let min = self.min_of_row(r);
            if min == INFINITY {
                return INFINITY;
            }

            if min > 0.0 {
                for &c in self.cols {
                    self.subtract(r, c, min);
                }
                amount += min;
            }
        }

        for &c in self.cols {
            let min = self.min_of_col(c);
            if min == INFINITY {
                return INFINITY;
            }

            if min > 0.0 {
                for &r in self.rows {
                    self.subtract(r, c, min);
                }
                amount += min;
            }
        }

        amount
    }

    fn min_of_row(&self, r: Node) -> Cost {
        self.cols
            .iter()
            .map(|&c| self.matrix.get(r, c))
            .fold(INFINITY, Cost::min)
    }

    fn min_of_col(&self, c: Node) -> Cost {
        self.rows
            .iter()
            .map(|&r| self.matrix.get(r, c))
            .fold(INFINITY, Cost::min)
    }

    #[inline(always)]
    fn subtract(&mut self, r: Node, c: Node, value: Cost) {
        let cost = self.matrix.get(r, c);
        if cost.is_finite() {
            self.matrix.set(r, c, cost - value);
        }
    }
}

impl Drop for Reduction<'_> {
    fn drop(&mut self) {
        for ((&r, &c), &cost) in self
            .rows
            .iter()
            .cartesian_product(self.cols)
            .zip(&self.saved)
        {
            self.matrix.set(r, c, cost);
        }
    }
}

/// Temporarily forbids a single edge by setting its cost to [`INFINITY`]
pub(super) struct MaskedCell<'a> {
    matrix: &'a mut CostMatrix,
    from: Node,
    to: Node,
    previous: Cost,
}

impl_guard_deref!(MaskedCell, matrix, CostMatrix);

impl<'a> MaskedCell<'a> {
    pub(super) fn new(matrix: &'a mut CostMatrix, from: Node, to: Node) -> Self {
        let previous = matrix.get(from, to);
        matrix.set(from, to, INFINITY);
        Self {
            matrix,
            from,
            to,
            previous,
        }
    }
}

impl Drop for MaskedCell<'_> {
    fn drop(&mut self) {
        self.matrix.set(self.from, self.to, self.previous);
    }
}

/// The edges committed along the current branch of the search tree. They form vertex disjoint
/// paths; `succ[u] == 0` (resp. `pred[u] == 0`) means that `u` has no outgoing (incoming) edge yet.
#[derive(Clone, Debug)]
pub(super) struct Linkage {
    succ: Vec<Node>,
    pred: Vec<Node>,
}

impl Linkage {
    pub(super) fn new(n: NumNodes) -> Self {
        Self {
            succ: vec![0; n as usize + 1],
            pred: vec![0; n as usize + 1],
        }
    }

    /// Commits the edge `from -> to` until the returned guard is dropped
    pub(super) fn commit(&mut self, from: Node, to: Node) -> CommittedEdge<'_> {
        debug_assert_eq!(self.succ[from as usize], 0);
        debug_assert_eq!(self.pred[to as usize], 0);

        self.succ[from as usize] = to;
        self.pred[to as usize] = from;

        CommittedEdge {
            links: self,
            from,
            to,
        }
    }

    /// First node of the path containing `u`
    pub(super) fn path_head(&self, mut u: Node) -> Node {
        while self.pred[u as usize] != 0 {
            u = self.pred[u as usize];
        }
        u
    }

    /// Last node of the path containing `u`
    pub(super) fn path_tail(&self, mut u: Node) -> Node {
        while self.succ[u as usize] != 0 {
            u = self.succ[u as usize];
        }
        u
    }

    pub(super) fn successors(&self) -> &[Node] {
        &self.succ
    }
}

pub(super) struct CommittedEdge<'a> {
    links: &'a mut Linkage,
    from: Node,
    to: Node,
}

impl_guard_deref!(CommittedEdge, links, Linkage);

impl Drop for CommittedEdge<'_> {
    fn drop(&mut self) {
        self.links.succ[self.from as usize] = 0;
        self.links.pred[self.to as usize] = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_restores_bit_identical_costs() {
        let mut matrix = CostMatrix::from_fn(4, |u, v| 0.1 * (u * 7 + v * 3) as Cost + 0.3);
        let original = matrix.clone();
        let rows = [1, 2, 3, 4];
        let cols = [1, 2, 3, 4];

        {
            let reduced = Reduction::apply(&mut matrix, &rows, &cols);
            assert!(reduced.amount() > 0.0);
            for &r in &rows {
                assert!(cols.iter().any(|&c| reduced.get(r, c) == 0.0));
            }
            for &c in &cols {
                assert!(rows.iter().any(|&r| reduced.get(r, c) == 0.0));
            }
            for u in 1..=4 {
                assert!(reduced.is_forbidden(u, u));
            }
        }

        assert!(matrix.same_costs_as(&original));
    }

    #[test]
    fn reduction_amount() {
        let mut matrix = CostMatrix::from_fn(3, |u, v| (10 * u + v) as Cost);
        // row minima: 12, 21, 31; afterwards column 3 has minimum 1
        let rows = [1, 2, 3];
        let reduced = Reduction::apply(&mut matrix, &rows, &rows);
        assert_eq!(reduced.amount(), 12.0 + 21.0 + 31.0 + 1.0);
        assert_eq!(reduced.get(1, 2), 0.0);
        assert_eq!(reduced.get(1, 3), 0.0);
        assert_eq!(reduced.get(2, 3), 1.0);
    }

    #[test]
    fn reduction_of_infeasible_submatrix() {
        let mut matrix = CostMatrix::from_fn(3, |_, _| 5.0);
        matrix.set(2, 1, INFINITY);
        matrix.set(2, 3, INFINITY);
        let original = matrix.clone();

        {
            let rows = [1, 2, 3];
            let reduced = Reduction::apply(&mut matrix, &rows, &rows);
            assert_eq!(reduced.amount(), INFINITY);
        }

        assert!(matrix.same_costs_as(&original));
    }

    #[test]
    fn masked_cell() {
        let mut matrix = CostMatrix::from_fn(3, |_, _| 2.0);
        {
            let masked = MaskedCell::new(&mut matrix, 1, 3);
            assert!(masked.is_forbidden(1, 3));
            assert!(!masked.is_forbidden(3, 1));
        }
        assert_eq!(matrix.get(1, 3), 2.0);
    }

    #[test]
    fn linkage_paths() {
        let mut links = Linkage::new(5);
        {
            let mut links = links.commit(2, 4);
            {
                let links = links.commit(4, 1);
                assert_eq!(links.path_head(1), 2);
                assert_eq!(links.path_tail(2), 1);
                assert_eq!(links.successors(), &[0, 0, 4, 0, 1, 0]);
            }
            assert_eq!(links.path_tail(2), 4);
            assert_eq!(links.path_head(1), 1);
        }
        assert_eq!(links.successors(), &[0; 6]);
        assert_eq!(links.path_head(4), 4);
    }
}
