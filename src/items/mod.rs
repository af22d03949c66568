//! Mock data-items list service backing the admin data table

pub mod model;
pub mod service;

pub use model::{CreateDataItem, DataItem, ItemPage, ListQuery, UpdateDataItem};
pub use service::{ItemService, Latency};
