//! Exact TSP solver based on branch and bound with matrix reduction (Little et al.).
//!
//! Each search node reduces the active part of the cost matrix, which yields a lower bound on all
//! tours below the node. If the bound cannot beat the best tour found so far, the node is pruned.
//! Otherwise we select the zero cell `(i, j)` with maximum regret and branch into
//!  - tours containing the edge `i -> j` (row `i` and column `j` become inactive), and
//!  - tours avoiding the edge `i -> j` (only explored if its lower bound is promising).
//!
//! All modifications of the matrix are undone when a node is left, so after [`BranchAndBound::run`]
//! the matrix is identical to its input except for the reserved cell `(0,0)`, which holds the cost
//! of the tour returned.

use crate::prelude::*;
use itertools::Itertools;
use log::info;
use std::time::{Duration, Instant};

mod frame;
use frame::*;

mod guards;
use guards::*;

/// Counters collected during [`BranchAndBound::run`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Number of search nodes visited (including pruned ones)
    pub nodes: usize,
    /// Nodes pruned since their lower bound did not beat the best tour
    pub bound_prunings: usize,
    /// Exclude branches skipped since their lower bound did not beat the best tour
    pub skipped_exclusions: usize,
    /// Number of times a strictly better tour was found
    pub improvements: usize,
}

pub struct BranchAndBound<'a> {
    matrix: &'a mut CostMatrix,
    search: Search,
    timeout: Option<Duration>,
    initial_tour: Option<Vec<Node>>,
}

impl<'a> BranchAndBound<'a> {
    pub fn new(matrix: &'a mut CostMatrix) -> Self {
        Self {
            matrix,
            search: Search::new(None),
            timeout: None,
            initial_tour: None,
        }
    }

    /// Keeps a copy of the input matrix and checks at every small enough search node that the
    /// lower bound does not exceed the cost of any feasible completion. After the search, the
    /// matrix is checked to be fully restored.
    ///
    /// # Warning
    /// This might be extremely slow! Never use this feature in production.
    pub fn with_paranoia(matrix: &'a mut CostMatrix) -> Self {
        let pristine = matrix.clone();
        let mut res = Self::new(matrix);
        res.search.pristine = Some(pristine);
        res
    }

    /// Aborts the search with [`SolveError::Interrupted`] if it does not complete within `timeout`.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Uses the tour visiting `order` as the initial upper bound. If no strictly cheaper tour
    /// exists, this tour is returned. The order is validated by [`BranchAndBound::run`].
    pub fn set_initial_tour(&mut self, order: &[Node]) {
        self.initial_tour = Some(order.to_vec());
    }

    /// Returns the counters of the last call to [`BranchAndBound::run`]
    pub fn statistics(&self) -> SearchStatistics {
        self.search.statistics
    }

    /// Returns the number of search nodes processed so far
    pub fn number_of_iterations(&self) -> usize {
        self.search.statistics.nodes
    }

    /// Computes a minimum cost tour. The matrix is validated before any search is carried out.
    /// On success, the tour cost is also recorded in cell `(0,0)` of the matrix.
    pub fn run(&mut self) -> Result<Tour, SolveError> {
        self.matrix.validate()?;
        let n = self.matrix.number_of_destinations();

        let start = Instant::now();
        self.search.statistics = SearchStatistics::default();
        self.search.deadline = self.timeout.map(|timeout| start + timeout);
        self.search.incumbent = self.initial_incumbent()?;

        let mut links = Linkage::new(n);
        let destinations = self.matrix.destinations().collect_vec();
        let result = self
            .search
            .search(self.matrix, &mut links, &destinations, &destinations, 0.0);

        if let Some(pristine) = &self.search.pristine {
            assert!(
                self.matrix.same_costs_as(pristine),
                "Cost matrix was not restored"
            );
        }

        let statistics = self.search.statistics;
        if let Err(e) = result {
            info!("{e} ({statistics:?}, {:?})", start.elapsed());
            return Err(e);
        }

        let Some(successors) = self.search.incumbent.successors.as_deref() else {
            unreachable!("Exhaustive search on a valid instance yields a tour");
        };

        let order = Tour::from_successors(successors, 0.0).into_parts().0;
        let cost = self.matrix.tour_cost(&order);
        self.matrix.record_cost(cost);

        info!(
            "Solved {n} destinations with cost {cost} in {:?}: {statistics:?}",
            start.elapsed()
        );

        Ok(Tour::new(order, cost))
    }

    fn initial_incumbent(&self) -> Result<Incumbent, SolveError> {
        let Some(order) = &self.initial_tour else {
            return Ok(Incumbent::unbounded());
        };

        let n = self.matrix.number_of_destinations();
        if order.len() != n as usize {
            return Err(SolveError::NotAPermutation(n));
        }
        let seed = Tour::new(order.clone(), 0.0);
        seed.is_correct()?;

        let mut successors = vec![0; n as usize + 1];
        for (u, v) in seed.edges() {
            successors[u as usize] = v;
        }

        Ok(Incumbent {
            cost: self.matrix.tour_cost(order),
            successors: Some(successors),
        })
    }
}
