//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! Error type used by the crate.

use crate::types::GeometryType;
use thiserror::Error;

/// Reasons a geometry cannot be read from or written to GeoJSON.
#[derive(Debug, Error)]
pub enum Error {
    /// A position has fewer than 2 or more than 3 ordinates.
    #[error("position must have 2 or 3 ordinates, found {0}")]
    BadArity(usize),
    /// A position contains a value that is not a number.
    #[error("position ordinate is not a number: {0}")]
    NonNumericElement(String),
    /// An ordinate is NaN or infinite.
    #[error("ordinate is not finite: {0}")]
    NonFiniteCoordinate(f64),
    /// 2D and 3D positions are mixed within one geometry.
    #[error("2D and 3D positions are mixed within one geometry")]
    MixedDimensions,
    /// The object has no string `type` member.
    #[error("geometry must have a string 'type' member")]
    MissingTypeTag,
    /// The `type` member names no GeoJSON geometry.
    #[error("unknown geometry type '{0}'")]
    UnknownGeometryType(String),
    /// A concrete geometry type was requested but the input holds another one.
    #[error("expected a {expected} geometry, found {found}")]
    UnexpectedGeometryType {
        /// Requested type.
        expected: GeometryType,
        /// Type found in the input.
        found: GeometryType,
    },
    /// The `coordinates` (or `geometries`) member is absent.
    #[error("geometry is missing its '{0}' member")]
    MissingCoordinates(&'static str),
    /// The coordinate arrays are not nested the way the geometry type requires.
    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(String),
    /// A line string has exactly one position.
    #[error("line string must have at least 2 positions, found {0}")]
    InsufficientPositions(usize),
    /// A polygon ring has fewer than 4 positions.
    #[error("polygon ring must have at least 4 positions, found {0}")]
    InsufficientRingPositions(usize),
    /// A polygon ring does not end where it starts.
    #[error("polygon ring is not closed")]
    UnclosedRing,
    /// Geometry collections are nested deeper than allowed.
    #[error("geometry collections nested deeper than {0} levels")]
    NestingTooDeep(usize),
    /// The input text is not valid JSON, or the output could not be produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
