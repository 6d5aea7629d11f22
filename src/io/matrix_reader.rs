use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::Path,
};

use crate::matrix::{Cost, CostMatrix, INFINITY, MAX_DESTINATIONS, NumNodes};

type Result<T> = std::io::Result<T>;

/// Reads a [`CostMatrix`] from the line based instance format:
///
/// ```text
/// c comment lines start with c
/// p tsp 3
/// - 1 2
/// 3 - 4
/// 5 6 -
/// ```
///
/// The header is followed by one line per destination containing its outgoing costs.
/// Diagonal tokens are never parsed (by convention they are `-`); the diagonal is always
/// [`INFINITY`].
pub trait CostMatrixReader: Sized {
    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl CostMatrixReader for CostMatrix {
    fn try_read_matrix<R: BufRead>(reader: R) -> Result<Self> {
        MatrixReader::try_new(reader)?.read_costs()
    }

    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_matrix(buf_reader)
    }
}

pub struct MatrixReader<R> {
    lines: Lines<R>,
    number_of_destinations: NumNodes,
}

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        let parsed = next.unwrap().parse();
        raise_error_unless!(
            parsed.is_ok(),
            ErrorKind::InvalidData,
            format!("Invalid value found. Cannot parse {}.", $name)
        );

        parsed.unwrap()
    }};
}

impl<R: BufRead> MatrixReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut matrix_reader = Self {
            lines: reader.lines(),
            number_of_destinations: 0,
        };

        matrix_reader.number_of_destinations = matrix_reader.parse_header()?;
        Ok(matrix_reader)
    }

    pub fn number_of_destinations(&self) -> NumNodes {
        self.number_of_destinations
    }

    /// Consumes the reader and parses one row of costs per destination
    pub fn read_costs(mut self) -> Result<CostMatrix> {
        let mut matrix = CostMatrix::try_new(self.number_of_destinations)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

        for from in matrix.destinations() {
            let line = self.next_non_comment_line()?;
            raise_error_unless!(
                line.is_some(),
                ErrorKind::InvalidData,
                format!("Premature end of file; missing costs of destination {from}")
            );
            let line = line.unwrap();
            let mut parts = line.split_whitespace();

            for to in matrix.destinations() {
                if from == to {
                    raise_error_unless!(
                        parts.next().is_some(),
                        ErrorKind::InvalidData,
                        format!("Premature end of line in row {from}")
                    );
                    matrix.set(from, to, INFINITY);
                } else {
                    let cost: Cost = parse_next_value!(parts, format!("cost {from} -> {to}"));
                    matrix.set(from, to, cost);
                }
            }

            raise_error_unless!(
                parts.next().is_none(),
                ErrorKind::InvalidData,
                format!("Too many values in row {from}")
            );
        }

        Ok(matrix)
    }

    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line)) if line.starts_with('c') || line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_header(&mut self) -> Result<NumNodes> {
        let line = self.next_non_comment_line()?;

        raise_error_unless!(line.is_some(), ErrorKind::InvalidData, "No header found");
        let line = line.unwrap();

        let mut parts = line.split_whitespace();

        raise_error_unless!(
            parts.next().is_some_and(|t| t.starts_with('p')),
            ErrorKind::InvalidData,
            "Invalid header found; line should start with p"
        );

        raise_error_unless!(
            parts.next() == Some("tsp"),
            ErrorKind::InvalidData,
            "Invalid header found; file type should be \"tsp\""
        );

        let number_of_destinations: NumNodes =
            parse_next_value!(parts, "Header>Number of destinations");

        raise_error_unless!(
            number_of_destinations <= MAX_DESTINATIONS,
            ErrorKind::InvalidData,
            format!("Invalid header found; at most {MAX_DESTINATIONS} destinations are supported")
        );

        raise_error_unless!(
            parts.next().is_none(),
            ErrorKind::InvalidData,
            "Invalid header found; expected end of line"
        );

        Ok(number_of_destinations)
    }
}
