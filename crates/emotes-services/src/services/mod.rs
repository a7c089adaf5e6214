pub mod cache;
pub mod marketplace;
pub mod refresh;
pub mod registry;
