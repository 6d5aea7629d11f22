use super::{exact::naive::naive_solver, prelude::*};
use rand::Rng;

/// The symmetric four destination instance with the well known optimum 80 (tour 1-2-4-3).
pub fn four_destinations() -> CostMatrix {
    let mut matrix = CostMatrix::new(4);
    for (u, v, cost) in [
        (1, 2, 10.0),
        (1, 3, 15.0),
        (1, 4, 20.0),
        (2, 3, 35.0),
        (2, 4, 25.0),
        (3, 4, 30.0),
    ] {
        matrix.set(u, v, cost);
        matrix.set(v, u, cost);
    }
    matrix
}

/// Endless stream of random instances over `n` destinations, cycling through asymmetric integral
/// costs, symmetric Euclidean costs, and asymmetric real-valued costs. Small cost ranges are
/// included to produce many ties.
pub fn random_instance_stream(rng: &mut impl Rng, n: NumNodes) -> impl Iterator<Item = CostMatrix> {
    (0..).map(move |i| match i % 4 {
        0 => CostMatrix::random_uniform(&mut *rng, n, 100),
        1 => CostMatrix::random_euclidean(&mut *rng, n, 1000.0),
        2 => CostMatrix::from_fn(n, |_, _| rng.gen_range(0.0..10.0)),
        _ => CostMatrix::random_uniform(&mut *rng, n, 3),
    })
}

/// Asserts that `tour` is a valid tour of `matrix` whose cost matches the one of the naive solver.
pub fn assert_optimal(matrix: &CostMatrix, tour: &Tour) {
    assert!(tour.is_correct().is_ok(), "tour: {:?}", tour.order());
    assert_eq!(tour.len(), matrix.number_of_destinations() as usize);
    assert_eq!(tour.cost(), matrix.tour_cost(tour.order()));

    let naive = naive_solver(matrix).unwrap();
    assert!(
        (naive.cost() - tour.cost()).abs() <= 1e-9 * naive.cost().max(1.0),
        "naive: {:?} ({}), branch and bound: {:?} ({})",
        naive.order(),
        naive.cost(),
        tour.order(),
        tour.cost()
    );
}
