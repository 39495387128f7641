use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// A 2D coordinate of a street polyline.
///
/// Serializes as `{"x": .., "y": ..}` and additionally accepts a GeoJSON
/// `{"type": "Point", "coordinates": [x, y]}` object on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected a point as `x,y`, got `{0}`")]
pub struct ParsePointError(String);

impl FromStr for Point {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',').ok_or_else(|| ParsePointError(s.to_string()))?;
        let x = x.trim().parse().map_err(|_| ParsePointError(s.to_string()))?;
        let y = y.trim().parse().map_err(|_| ParsePointError(s.to_string()))?;
        Ok(Point { x, y })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Xy { x: f64, y: f64 },
    GeoJson {
        #[serde(rename = "type")]
        _kind: PointTag,
        coordinates: [f64; 2],
    },
}

#[derive(Deserialize)]
enum PointTag {
    Point,
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Xy { x, y } => Point { x, y },
            PointRepr::GeoJson {
                coordinates: [x, y],
                ..
            } => Point { x, y },
        }
    }
}

/// Ordered polyline of a street. Order is significant and may be empty.
///
/// Serialized as a GeoJSON `LineString`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeoJsonLineString", into = "GeoJsonLineString")]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for LineString {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for LineString {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GeoJsonLineString {
    #[serde(rename = "type")]
    kind: LineStringTag,
    coordinates: Vec<[f64; 2]>,
}

#[derive(Serialize, Deserialize)]
enum LineStringTag {
    LineString,
}

impl From<GeoJsonLineString> for LineString {
    fn from(geojson: GeoJsonLineString) -> Self {
        geojson
            .coordinates
            .into_iter()
            .map(|[x, y]| Point { x, y })
            .collect()
    }
}

impl From<LineString> for GeoJsonLineString {
    fn from(line: LineString) -> Self {
        GeoJsonLineString {
            kind: LineStringTag::LineString,
            coordinates: line.points.into_iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}

/// `null` and a missing field both mean an empty geometry.
pub(super) fn nullable_geometry<'de, D>(deserializer: D) -> Result<LineString, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LineString>::deserialize(deserializer)?.unwrap_or_default())
}
