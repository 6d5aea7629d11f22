pub mod branch_and_bound;
pub mod naive;

pub use branch_and_bound::{BranchAndBound, SearchStatistics};
pub use naive::naive_solver;

use crate::prelude::*;

/// Computes a minimum cost tour over the `n` destinations of `cost` and returns the visiting
/// order (starting at destination 1) together with its total cost.
///
/// The matrix is restored before returning, except for cell `(0,0)` which then holds the total
/// cost.
///
/// # Example
/// ```
/// use tours::prelude::*;
///
/// // going to the next destination costs 1, any other move costs 5
/// let mut cost = CostMatrix::from_fn(4, |u, v| if v == u % 4 + 1 { 1.0 } else { 5.0 });
/// let (order, total) = solve(4, &mut cost).unwrap();
/// assert_eq!(order, vec![1, 2, 3, 4]);
/// assert_eq!(total, 4.0);
/// assert_eq!(cost.recorded_cost(), 4.0);
/// ```
pub fn solve(n: NumNodes, cost: &mut CostMatrix) -> Result<(Vec<Node>, Cost), SolveError> {
    if n < 3 {
        return Err(SolveError::TooFewDestinations(n));
    }

    if cost.number_of_destinations() != n {
        return Err(SolveError::DimensionMismatch {
            expected: n,
            actual: cost.number_of_destinations(),
        });
    }

    BranchAndBound::new(cost).run().map(Tour::into_parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use glob::glob;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn solve_checks_dimensions() {
        let mut matrix = four_destinations();
        assert_eq!(solve(2, &mut matrix), Err(SolveError::TooFewDestinations(2)));
        assert_eq!(
            solve(5, &mut matrix),
            Err(SolveError::DimensionMismatch {
                expected: 5,
                actual: 4
            })
        );

        let (order, cost) = solve(4, &mut matrix).unwrap();
        assert_eq!(cost, 80.0);
        assert_eq!(matrix.tour_cost(&order), cost);
    }

    #[test]
    fn solve_reports_cost_of_unreduced_matrix() {
        let mut rng = Pcg64Mcg::seed_from_u64(12345);
        for n in 3..9 {
            let mut matrix = CostMatrix::from_fn(n, |_, _| rng.gen_range(0.0..100.0));
            let original = matrix.clone();

            let (order, cost) = solve(n, &mut matrix).unwrap();
            assert!(Tour::new(order.clone(), cost).is_correct().is_ok());
            assert_eq!(cost, original.tour_cost(&order));
            assert_eq!(matrix.recorded_cost(), cost);
            assert!(matrix.same_costs_as(&original));
        }
    }

    #[test]
    fn instance_files() {
        let mut count = 0;
        for path in glob("instances/*.tsp").unwrap() {
            let path = path.unwrap();
            let mut matrix = CostMatrix::try_read_matrix_file(&path)
                .unwrap_or_else(|_| panic!("Cannot read file {}", path.display()));
            let original = matrix.clone();
            println!(" Test {}", path.display());

            let tour = BranchAndBound::with_paranoia(&mut matrix).run().unwrap();
            assert!(matrix.same_costs_as(&original), "file: {}", path.display());
            assert_optimal(&original, &tour);
            count += 1;
        }
        assert!(count > 0);
    }
}
