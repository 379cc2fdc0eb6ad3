//! Loading for the benchmark CSV (operation,time_us).

pub mod load;
pub mod row;

pub use load::load_dataset;
pub use row::{Dataset, Record};
