pub mod dataset;
pub mod fields;
pub mod value;

pub use dataset::{Dataset, RowRef};
pub use fields::DatasetFields;
pub use value::CellValue;
