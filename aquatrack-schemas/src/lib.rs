pub mod metric;
pub mod reading;
pub mod risk;
pub mod schema;
