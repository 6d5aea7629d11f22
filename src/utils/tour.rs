use crate::{
    errors::{InvariantCheck, SolveError},
    matrix::{Cost, Node, NumNodes},
};
use serde::Serialize;
use std::io::Write;

/// A closed tour: the destinations are visited in the given order and the last one
/// returns to the first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tour {
    order: Vec<Node>,
    cost: Cost,
}

impl Tour {
    pub fn new(order: Vec<Node>, cost: Cost) -> Self {
        Self { order, cost }
    }

    /// Builds a tour from a successor mapping (indexed by destination, entry 0 unused)
    /// by following it from destination 1.
    ///
    /// # Example
    /// ```
    /// use tours::utils::Tour;
    /// let tour = Tour::from_successors(&[0, 3, 1, 2], 6.0);
    /// assert_eq!(tour.order(), &[1, 3, 2]);
    /// ```
    pub fn from_successors(successors: &[Node], cost: Cost) -> Self {
        let n = successors.len().saturating_sub(1);
        let mut order = Vec::with_capacity(n);
        let mut u = 1;
        for _ in 0..n {
            order.push(u);
            u = successors[u as usize];
        }
        Self { order, cost }
    }

    pub fn order(&self) -> &[Node] {
        &self.order
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Node>, Cost) {
        (self.order, self.cost)
    }

    /// Returns all edges of the tour including the one closing the cycle.
    ///
    /// # Example
    /// ```
    /// use tours::utils::Tour;
    /// let tour = Tour::new(vec![2, 1, 3], 0.0);
    /// assert_eq!(tour.edges().collect::<Vec<_>>(), vec![(2, 1), (1, 3), (3, 2)]);
    /// ```
    pub fn edges(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        self.order
            .iter()
            .copied()
            .zip(self.order.iter().copied().skip(1).chain(self.order.first().copied()))
    }

    /// Writes the cost in the first line followed by one destination per line.
    ///
    /// ```
    /// use tours::utils::Tour;
    /// let tour = Tour::new(vec![1, 3, 2], 42.0);
    ///
    /// let mut buffer: Vec<u8> = Vec::new(); // implements Write
    /// tour.write(&mut buffer).unwrap();
    /// assert_eq!(buffer, b"42\n1\n3\n2\n");
    /// ```
    pub fn write<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(&mut writer, "{}", self.cost)?;
        for u in &self.order {
            writeln!(&mut writer, "{u}")?;
        }
        Ok(())
    }
}

impl InvariantCheck<SolveError> for Tour {
    /// The order has to be a permutation of `1..=len()`.
    fn is_correct(&self) -> Result<(), SolveError> {
        let n = self.order.len();
        let mut seen = vec![false; n + 1];

        for &u in &self.order {
            let u = u as usize;
            if u == 0 || u > n || seen[u] {
                return Err(SolveError::NotAPermutation(n as NumNodes));
            }
            seen[u] = true;
        }

        Ok(())
    }
}
