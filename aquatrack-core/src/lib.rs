pub mod analysis;
pub mod builder;
pub mod codec;
pub mod collection;
pub mod error;
pub mod store;
