use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::core::db::error::{StoreResult, ValidationError};
use crate::core::db::model::{LineString, Point, nullable_geometry};

/// Longest street name accepted, counted in characters.
pub const STREET_NAME_MAX_CHARS: usize = 100;

/// A persisted street. Only the store hands these out, so `id` is always a
/// server-assigned key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Street {
    pub id: i64,
    pub name: String,
    pub geometry: LineString,
    pub capacity: i32,
    #[serde(skip)]
    pub(super) _guard: (),
}

/// A street without an id, used for creation and full-record replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStreet {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_geometry")]
    pub geometry: LineString,
    pub capacity: i32,
}

impl NewStreet {
    pub fn new(name: impl Into<String>, capacity: i32) -> Self {
        Self {
            name: name.into(),
            geometry: LineString::default(),
            capacity,
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<LineString>) -> Self {
        self.geometry = geometry.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        // SQLite's length() stops counting at the first NUL.
        if self.name.contains('\0') {
            return Err(ValidationError::NulInName);
        }
        let length = self.name.chars().count();
        if length > STREET_NAME_MAX_CHARS {
            return Err(ValidationError::NameTooLong {
                length,
                max: STREET_NAME_MAX_CHARS,
            });
        }
        self.geometry.points().iter().try_for_each(validate_point)
    }
}

pub(super) fn validate_point(point: &Point) -> Result<(), ValidationError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteCoordinate { point: *point })
    }
}

pub trait StreetRepository {
    fn create_street(&self, street: &NewStreet) -> impl Future<Output = StoreResult<Street>> + Send;
    fn get_street_by_id(&self, id: i64) -> impl Future<Output = StoreResult<Option<Street>>> + Send;
    fn get_streets(&self) -> impl Future<Output = StoreResult<Vec<Street>>> + Send;
    fn update_street(&self, id: i64, street: &NewStreet) -> impl Future<Output = StoreResult<Street>> + Send;
    /// Deleting an id that does not exist is not an error.
    fn delete_street(&self, id: i64) -> impl Future<Output = StoreResult<()>> + Send;
    /// Returns `false` if the street does not exist.
    fn append_or_prepend_point(
        &self,
        street_id: i64,
        point: Point,
        add_to_end: bool,
    ) -> impl Future<Output = StoreResult<bool>> + Send;
}
