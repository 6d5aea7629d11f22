use crate::matrix::CostMatrix;
use std::io::Write;

/// Writes a [`CostMatrix`] in the format understood by
/// [`CostMatrixReader`](super::CostMatrixReader); diagonal entries are written as `-`.
pub trait MatrixWriter {
    fn try_write_matrix<W: Write>(&self, writer: W) -> std::io::Result<()>;
}

impl MatrixWriter for CostMatrix {
    fn try_write_matrix<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "p tsp {}", self.number_of_destinations())?;

        for from in self.destinations() {
            let row: Vec<String> = self
                .destinations()
                .map(|to| {
                    if from == to {
                        String::from("-")
                    } else {
                        self.get(from, to).to_string()
                    }
                })
                .collect();
            writeln!(writer, "{}", row.join(" "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::CostMatrixReader;

    #[test]
    fn write_and_read_back() {
        let matrix = CostMatrix::from_fn(4, |u, v| (u * 3 + v) as f64 / 2.0);

        let mut buffer = Vec::new();
        matrix.try_write_matrix(&mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("p tsp 4\n- 2.5 3 3.5\n"));

        let read = CostMatrix::try_read_matrix(buffer.as_slice()).unwrap();
        assert!(read.same_costs_as(&matrix));
    }
}
