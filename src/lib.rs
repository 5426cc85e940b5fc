//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! GeoJSON (RFC 7946) geometry objects for serde.
//!
//! - Point, LineString, Polygon and their Multi* forms, plus GeometryCollection
//! - Arity, ring closure and dimension checks while reading
//! - Optional `bbox` members and coordinate rounding while writing
//!
//! ```rust
//! use geojson_serde::{Geometry, Point, Polygon};
//!
//! let polygon: Polygon = geojson_serde::from_str(
//!     r#"{"type":"Polygon","coordinates":[[[0,0],[4,0],[4,4],[0,4],[0,0]]]}"#,
//! ).unwrap();
//! assert_eq!(polygon.exterior().unwrap().points.len(), 5);
//!
//! let geom = Geometry::from(Point::new(1.5, 2.0));
//! let text = serde_json::to_string(&geom).unwrap();
//! assert_eq!(text, r#"{"type":"Point","coordinates":[1.5,2]}"#);
//! ```
//!
//! Geometry fields inside your own types:
//!
//! ```rust
//! use geojson_serde::{Geometry, Point};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Stop {
//!     name: String,
//!     location: Point,
//!     area: Option<Geometry>,
//! }
//!
//! let stop: Stop = serde_json::from_str(
//!     r#"{"name":"Bahnhof","location":{"type":"Point","coordinates":[8.54,47.37]},"area":null}"#,
//! ).unwrap();
//! assert!(stop.area.is_none());
//! ```
//!
//! Custom options:
//!
//! ```rust
//! use geojson_serde::{GeoJsonCodec, IncludeBoundingBox, LineString};
//!
//! let writer = GeoJsonCodec::new()
//!     .with_bounding_box(IncludeBoundingBox::Always)
//!     .with_decimal_places(1)
//!     .writer();
//! let line: LineString = [(0.04, 1.0), (2.0, 3.06)].into_iter().collect();
//! assert_eq!(
//!     writer.to_string(&line).unwrap(),
//!     r#"{"type":"LineString","bbox":[0,1,2,3.1],"coordinates":[[0,1],[2,3.1]]}"#
//! );
//! ```

pub mod config;
pub mod error;
pub mod geojson;
mod codec;
mod geometry;
mod position;
mod types;

pub use codec::{from_str, from_value, to_string, to_value, GeoJsonCodec, GeometryReader, GeometryWriter};
pub use config::{IncludeBoundingBox, ReadOptions, WriteOptions};
pub use error::Error;
pub use geojson::{GeoJson, GeoJsonGeometry, GeoJsonRead, GeoJsonWrite};
pub use geometry::{
    BoundingBox, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
pub use position::{write_position, Coordinate, Dimension, Ordinates};
pub use types::{GeometryType, Position};
