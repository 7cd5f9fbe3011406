//! Shape geometry and its transport codec.
//!
//! The canvas engine owns authoritative geometry; this module defines the
//! engine-agnostic model the sync core exchanges with the annotation store.
//! The transport format is GeoJSON-shaped JSON: an object tagged by `"type"`
//! with a nested `"coordinates"` array. Decoding validates structure and
//! coordinate finiteness so malformed stored payloads surface as errors
//! instead of panics.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `[x, y]` coordinate in image/world space.
pub type Position = [f64; 2];

/// Error returned by [`encode`] and [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The payload is not a recognizable transport geometry object.
    #[error("unrecognized geometry payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A coordinate sequence is too short for its geometry kind.
    #[error("{kind} geometry has an empty or too-short coordinate sequence")]
    TooFewPositions {
        /// Geometry kind the sequence belongs to.
        kind: &'static str,
    },
    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate in {kind} geometry")]
    NonFiniteCoordinate {
        /// Geometry kind the coordinate belongs to.
        kind: &'static str,
    },
}

/// Engine-agnostic shape geometry.
///
/// Serde representation matches the transport format, so [`encode`] and
/// [`decode`] are thin validating wrappers around serde conversions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point {
        /// The position.
        coordinates: Position,
    },
    /// An open polyline of two or more positions.
    LineString {
        /// Vertices in drawing order.
        coordinates: Vec<Position>,
    },
    /// A polygon: exterior ring first, optional interior rings (holes) after.
    Polygon {
        /// Rings; each ring needs at least three positions.
        coordinates: Vec<Vec<Position>>,
    },
    /// A multi-part polygon.
    MultiPolygon {
        /// One entry per part, each shaped like a `Polygon`'s rings.
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// Short kind name used in error messages and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point { .. } => "point",
            Self::LineString { .. } => "line",
            Self::Polygon { .. } => "polygon",
            Self::MultiPolygon { .. } => "multi-polygon",
        }
    }

    /// Axis-aligned extent of this geometry, or `None` when it has no
    /// positions at all.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let mut acc: Option<Bounds> = None;
        self.for_each_position(&mut |pos| {
            let point = Bounds { min_x: pos[0], min_y: pos[1], max_x: pos[0], max_y: pos[1] };
            acc = Some(acc.map_or(point, |b| b.union(point)));
        });
        acc
    }

    fn for_each_position(&self, f: &mut impl FnMut(Position)) {
        match self {
            Self::Point { coordinates } => f(*coordinates),
            Self::LineString { coordinates } => {
                for pos in coordinates {
                    f(*pos);
                }
            }
            Self::Polygon { coordinates } => {
                for ring in coordinates {
                    for pos in ring {
                        f(*pos);
                    }
                }
            }
            Self::MultiPolygon { coordinates } => {
                for part in coordinates {
                    for ring in part {
                        for pos in ring {
                            f(*pos);
                        }
                    }
                }
            }
        }
    }

    /// Structural validity: minimum position counts and finite coordinates.
    fn validate(&self) -> Result<(), GeometryError> {
        let kind = self.kind();
        match self {
            Self::Point { .. } => {}
            Self::LineString { coordinates } => {
                if coordinates.len() < 2 {
                    return Err(GeometryError::TooFewPositions { kind });
                }
            }
            Self::Polygon { coordinates } => {
                validate_rings(coordinates, kind)?;
            }
            Self::MultiPolygon { coordinates } => {
                if coordinates.is_empty() {
                    return Err(GeometryError::TooFewPositions { kind });
                }
                for part in coordinates {
                    validate_rings(part, kind)?;
                }
            }
        }

        let mut finite = true;
        self.for_each_position(&mut |pos| {
            finite &= pos[0].is_finite() && pos[1].is_finite();
        });
        if finite {
            Ok(())
        } else {
            Err(GeometryError::NonFiniteCoordinate { kind })
        }
    }
}

fn validate_rings(rings: &[Vec<Position>], kind: &'static str) -> Result<(), GeometryError> {
    if rings.is_empty() {
        return Err(GeometryError::TooFewPositions { kind });
    }
    for ring in rings {
        if ring.len() < 3 {
            return Err(GeometryError::TooFewPositions { kind });
        }
    }
    Ok(())
}

/// Serialize a geometry into its transport JSON value.
///
/// # Errors
///
/// Returns [`GeometryError`] when the geometry is structurally invalid or
/// carries non-finite coordinates; a valid geometry always encodes.
pub fn encode(geometry: &Geometry) -> Result<Value, GeometryError> {
    geometry.validate()?;
    Ok(serde_json::to_value(geometry)?)
}

/// Deserialize a transport JSON value back into a geometry.
///
/// Inverse of [`encode`]: `decode(&encode(&g)?) == g` for every valid `g`.
///
/// # Errors
///
/// Returns [`GeometryError`] for payloads that are empty, structurally
/// malformed, of an unknown `"type"`, or carry non-finite coordinates.
pub fn decode(value: &Value) -> Result<Geometry, GeometryError> {
    let geometry: Geometry = serde_json::from_value(value.clone())?;
    geometry.validate()?;
    Ok(geometry)
}

/// Axis-aligned bounding box in image/world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub min_x: f64,
    /// Bottom edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Top edge.
    pub max_y: f64,
}

impl Bounds {
    /// Center position of the box.
    #[must_use]
    pub fn center(&self) -> Position {
        [f64::midpoint(self.min_x, self.max_x), f64::midpoint(self.min_y, self.max_y)]
    }

    /// True when the box has zero extent in both dimensions (a single point).
    /// Recenter/fit-view requests are skipped for degenerate bounds.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max_x <= self.min_x && self.max_y <= self.min_y
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
