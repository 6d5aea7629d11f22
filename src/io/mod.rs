pub mod matrix_reader;
pub use matrix_reader::{CostMatrixReader, MatrixReader};
pub mod matrix_writer;
pub use matrix_writer::MatrixWriter;
