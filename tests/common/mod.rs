#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from streethub for tests
pub use streethub::{
    GeometryStrategy, LineString, NewStreet, Point, StoreConfig, StoreError, Street,
    StreetRepository, StreetStore, ValidationError,
};
