//! Database layer - model registry, query building, sorting, list resources

pub mod list;
pub mod models;
pub mod query;
pub mod sorting;

pub use models::{Column, Model};
pub use query::{BindValue, TableQuery};
