//! CRUD over streets whose geometry is an ordered polyline, with two
//! interchangeable ways of appending or prepending a vertex.

pub mod config;
pub mod core;
pub mod http;
pub mod logging;

pub use config::StoreConfig;
pub use crate::core::db::{
    GeometryStrategy, LineString, NewStreet, Point, StoreError, StoreResult, Street,
    StreetRepository, StreetStore, ValidationError,
};
