use crate::prelude::*;
use itertools::Itertools;
use log::debug;

/// Enumerates all `(n-1)!` tours starting at destination 1 and returns the first one of minimum
/// cost. Only suited for tiny instances (say, up to 10 destinations); it mainly serves as a
/// reference to cross-validate [`BranchAndBound`].
pub fn naive_solver(matrix: &CostMatrix) -> Result<Tour, SolveError> {
    matrix.validate()?;
    let n = matrix.number_of_destinations();

    let (order, cost) = (2..=n)
        .permutations(n as usize - 1)
        .map(|rest| {
            let order = std::iter::once(1).chain(rest).collect_vec();
            let cost = matrix.tour_cost(&order);
            (order, cost)
        })
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .ok_or(SolveError::TooFewDestinations(n))?;

    debug!("Naive solver found tour of cost {cost} for {n} destinations");

    Ok(Tour::new(order, cost))
}
