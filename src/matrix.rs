//! The [`CostMatrix`] stores the pairwise travel costs between destinations.
//!
//! Destinations are numbered `1..=n`; row and column 0 are reserved. Cell `(0,0)` is used to
//! report the cost of the last tour computed on this matrix (see [`CostMatrix::recorded_cost`]).
//! Forbidden edges, most prominently the diagonal, are represented by [`INFINITY`].

use crate::errors::SolveError;
use rand::Rng;
use std::ops::Range;

pub type Node = u32;
pub type NumNodes = Node;
pub type Cost = f64;

/// Marks an edge that may never be part of a tour
pub const INFINITY: Cost = Cost::INFINITY;

/// Largest number of destinations a [`CostMatrix`] can be built for. Far beyond what the exact
/// solvers can handle, but small enough that the `(n+1)^2` cells fit into memory.
pub const MAX_DESTINATIONS: NumNodes = 1 << 12;

/// Returns the number of cells of a matrix over `n` destinations, or `None` if `n` exceeds
/// [`MAX_DESTINATIONS`].
fn number_of_cells(n: NumNodes) -> Option<usize> {
    if n > MAX_DESTINATIONS {
        return None;
    }

    let dim = (n as usize).checked_add(1)?;
    dim.checked_mul(dim)
}

#[derive(Clone, Debug)]
pub struct CostMatrix {
    number_of_destinations: NumNodes,
    costs: Vec<Cost>,
}

impl CostMatrix {
    /// Creates a matrix over `n` destinations where every off-diagonal cost is zero and
    /// every diagonal cost is [`INFINITY`].
    ///
    /// # Panics
    /// If `n` exceeds [`MAX_DESTINATIONS`]; see [`CostMatrix::try_new`].
    pub fn new(n: NumNodes) -> Self {
        Self::from_fn(n, |_, _| 0.0)
    }

    /// Same as [`CostMatrix::new`], but fails with [`SolveError::TooManyDestinations`]
    /// instead of panicking.
    pub fn try_new(n: NumNodes) -> Result<Self, SolveError> {
        Self::try_from_fn(n, |_, _| 0.0)
    }

    /// Creates a matrix over `n` destinations and assigns `cost(u, v)` to each pair `u != v`.
    /// The diagonal is set to [`INFINITY`] and the reserved cells to zero.
    ///
    /// # Example
    /// ```
    /// use tours::matrix::CostMatrix;
    /// let matrix = CostMatrix::from_fn(3, |u, v| (u * 10 + v) as f64);
    /// assert_eq!(matrix.get(1, 2), 12.0);
    /// assert!(matrix.get(2, 2).is_infinite());
    /// ```
    ///
    /// # Panics
    /// If `n` exceeds [`MAX_DESTINATIONS`]; see [`CostMatrix::try_from_fn`].
    pub fn from_fn<F: FnMut(Node, Node) -> Cost>(n: NumNodes, cost: F) -> Self {
        match Self::try_from_fn(n, cost) {
            Ok(matrix) => matrix,
            Err(e) => panic!("{e}"),
        }
    }

    /// Same as [`CostMatrix::from_fn`], but fails with [`SolveError::TooManyDestinations`]
    /// instead of panicking.
    pub fn try_from_fn<F: FnMut(Node, Node) -> Cost>(
        n: NumNodes,
        mut cost: F,
    ) -> Result<Self, SolveError> {
        let cells = number_of_cells(n).ok_or(SolveError::TooManyDestinations(n))?;
        let mut matrix = Self {
            number_of_destinations: n,
            costs: vec![0.0; cells],
        };

        for u in matrix.destinations() {
            for v in matrix.destinations() {
                let value = if u == v { INFINITY } else { cost(u, v) };
                matrix.set(u, v, value);
            }
        }

        Ok(matrix)
    }

    /// Takes ownership of an `(n+1)x(n+1)` nested vector, including the reserved row and column 0.
    /// No validation beyond the shape is carried out; see [`CostMatrix::validate`].
    pub fn try_from_rows(rows: Vec<Vec<Cost>>) -> Result<Self, SolveError> {
        let dim = rows.len();
        let n = dim.saturating_sub(1).min(NumNodes::MAX as usize) as NumNodes;
        if n > MAX_DESTINATIONS {
            return Err(SolveError::TooManyDestinations(n));
        }

        if let Some(row) = rows.iter().find(|row| row.len() != dim) {
            return Err(SolveError::DimensionMismatch {
                expected: n,
                actual: row.len().saturating_sub(1) as NumNodes,
            });
        }

        Ok(Self {
            number_of_destinations: n,
            costs: rows.into_iter().flatten().collect(),
        })
    }

    pub fn number_of_destinations(&self) -> NumNodes {
        self.number_of_destinations
    }

    /// Returns the range `1..n+1` of all destinations
    pub fn destinations(&self) -> Range<Node> {
        1..self.number_of_destinations + 1
    }

    #[inline(always)]
    fn index_of(&self, from: Node, to: Node) -> usize {
        debug_assert!(from <= self.number_of_destinations);
        debug_assert!(to <= self.number_of_destinations);
        from as usize * (self.number_of_destinations as usize + 1) + to as usize
    }

    #[inline(always)]
    pub fn get(&self, from: Node, to: Node) -> Cost {
        self.costs[self.index_of(from, to)]
    }

    #[inline(always)]
    pub fn set(&mut self, from: Node, to: Node, cost: Cost) {
        let idx = self.index_of(from, to);
        self.costs[idx] = cost;
    }

    #[inline(always)]
    pub fn is_forbidden(&self, from: Node, to: Node) -> bool {
        self.get(from, to).is_infinite()
    }

    /// Cost of the last tour computed on this matrix (stored in cell `(0,0)`)
    pub fn recorded_cost(&self) -> Cost {
        self.get(0, 0)
    }

    pub fn record_cost(&mut self, cost: Cost) {
        self.set(0, 0, cost);
    }

    /// Checks that the matrix is a valid input for the solvers: at least three destinations,
    /// finite non-negative costs between distinct destinations, and infinite costs on the diagonal.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.number_of_destinations < 3 {
            return Err(SolveError::TooFewDestinations(self.number_of_destinations));
        }

        for from in self.destinations() {
            for to in self.destinations() {
                let cost = self.get(from, to);
                if from == to {
                    if cost != INFINITY {
                        return Err(SolveError::FiniteDiagonal(from));
                    }
                } else if !cost.is_finite() || cost < 0.0 {
                    return Err(SolveError::InvalidCost { from, to, cost });
                }
            }
        }

        Ok(())
    }

    /// Sums up the costs of the cyclic tour visiting `order[0], order[1], ..., order[0]`.
    pub fn tour_cost(&self, order: &[Node]) -> Cost {
        if order.is_empty() {
            return 0.0;
        }

        order
            .iter()
            .zip(order.iter().skip(1).chain(order.first()))
            .map(|(&u, &v)| self.get(u, v))
            .sum()
    }

    /// Returns true if both matrices have the same dimension and are bit-identical in every cell
    /// except for the reserved cell `(0,0)`.
    pub fn same_costs_as(&self, other: &Self) -> bool {
        self.number_of_destinations == other.number_of_destinations
            && self
                .costs
                .iter()
                .zip(&other.costs)
                .skip(1)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Generates an asymmetric instance with integral costs drawn uniformly from `0..=max_cost`.
    pub fn random_uniform(rng: &mut impl Rng, n: NumNodes, max_cost: u32) -> Self {
        Self::from_fn(n, |_, _| rng.gen_range(0..=max_cost) as Cost)
    }

    /// Places `n` points uniformly in the square `[0, extent]^2` and uses their rounded
    /// Euclidean distances as costs. The result is symmetric.
    pub fn random_euclidean(rng: &mut impl Rng, n: NumNodes, extent: f64) -> Self {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(0.0..=extent), rng.gen_range(0.0..=extent)))
            .collect();

        Self::from_fn(n, |u, v| {
            let (x1, y1) = points[u as usize - 1];
            let (x2, y2) = points[v as usize - 1];
            (x1 - x2).hypot(y1 - y2).round()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn new_has_forbidden_diagonal() {
        let matrix = CostMatrix::new(4);
        assert_eq!(matrix.number_of_destinations(), 4);
        for u in matrix.destinations() {
            for v in matrix.destinations() {
                assert_eq!(matrix.is_forbidden(u, v), u == v);
            }
        }
        assert!(matrix.validate().is_ok());
    }

    #[test]
    fn try_from_rows_rejects_ragged_input() {
        let rows = vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, INFINITY, 1.0, 2.0],
            vec![0.0, 1.0, INFINITY],
            vec![0.0, 2.0, 3.0, INFINITY],
        ];

        assert_eq!(
            CostMatrix::try_from_rows(rows).unwrap_err(),
            SolveError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn size_is_limited() {
        for n in [MAX_DESTINATIONS + 1, NumNodes::MAX] {
            assert_eq!(
                CostMatrix::try_new(n).unwrap_err(),
                SolveError::TooManyDestinations(n)
            );
        }

        assert_eq!(number_of_cells(0), Some(1));
        assert_eq!(number_of_cells(3), Some(16));
        assert!(number_of_cells(MAX_DESTINATIONS).is_some());
        assert!(CostMatrix::try_new(3).is_ok());
    }

    #[test]
    #[should_panic]
    fn from_fn_panics_beyond_limit() {
        CostMatrix::from_fn(NumNodes::MAX, |_, _| 1.0);
    }

    #[test]
    fn validate() {
        assert_eq!(
            CostMatrix::new(2).validate(),
            Err(SolveError::TooFewDestinations(2))
        );

        let mut matrix = CostMatrix::new(3);
        matrix.set(2, 3, -1.0);
        assert_eq!(
            matrix.validate(),
            Err(SolveError::InvalidCost {
                from: 2,
                to: 3,
                cost: -1.0
            })
        );

        matrix.set(2, 3, INFINITY);
        assert!(matches!(
            matrix.validate(),
            Err(SolveError::InvalidCost { from: 2, to: 3, .. })
        ));

        matrix.set(2, 3, 1.0);
        matrix.set(1, 1, 0.0);
        assert_eq!(matrix.validate(), Err(SolveError::FiniteDiagonal(1)));

        // the reserved cells are not constrained
        matrix.set(1, 1, INFINITY);
        matrix.set(0, 0, -5.0);
        matrix.set(0, 2, f64::NAN);
        assert!(matrix.validate().is_ok());
    }

    #[test]
    fn tour_cost_wraps_around() {
        let matrix = CostMatrix::from_fn(4, |u, v| (10 * u + v) as Cost);
        assert_eq!(matrix.tour_cost(&[1, 2, 3, 4]), 12.0 + 23.0 + 34.0 + 41.0);
        assert_eq!(matrix.tour_cost(&[3, 1, 4, 2]), 31.0 + 14.0 + 42.0 + 23.0);
    }

    #[test]
    fn same_costs_ignores_recorded_cost() {
        let matrix = CostMatrix::from_fn(5, |u, v| (u + v) as Cost);
        let mut other = matrix.clone();
        other.record_cost(123.0);
        assert!(matrix.same_costs_as(&other));

        other.set(2, 4, 7.0);
        assert!(!matrix.same_costs_as(&other));
        assert!(!matrix.same_costs_as(&CostMatrix::new(4)));
    }

    #[test]
    fn random_instances_are_valid() {
        let mut rng = Pcg64Mcg::seed_from_u64(123456);
        for n in 3..12 {
            let uniform = CostMatrix::random_uniform(&mut rng, n, 100);
            assert!(uniform.validate().is_ok());

            let euclidean = CostMatrix::random_euclidean(&mut rng, n, 1000.0);
            assert!(euclidean.validate().is_ok());
            for u in euclidean.destinations() {
                for v in euclidean.destinations() {
                    assert_eq!(euclidean.get(u, v), euclidean.get(v, u));
                }
            }
        }
    }
}
