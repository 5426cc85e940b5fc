//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! Read and write geometries as [GeoJSON](https://www.rfc-editor.org/rfc/rfc7946) geometry objects.
//!
//! ```rust
//! use geojson_serde::geojson::{GeoJsonRead, GeoJsonWrite};
//! use geojson_serde::{LineString, WriteOptions};
//!
//! let value = serde_json::json!({"type": "LineString", "coordinates": [[10, -20], [0, -0.5]]});
//! let line = LineString::read_geojson(&value).unwrap();
//! assert_eq!(line.points.len(), 2);
//!
//! let options = WriteOptions::default();
//! let text = serde_json::to_string(&line.as_geojson(&options)).unwrap();
//! assert_eq!(text, r#"{"type":"LineString","coordinates":[[10,-20],[0,-0.5]]}"#);
//! ```

use crate::config::{ReadOptions, WriteOptions};
use crate::error::Error;
use crate::geometry::{
    BoundingBox, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use crate::position::{Coordinate, Dimension, Number, PositionSer};
use crate::types::GeometryType;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use std::fmt;

pub const TYPE: &str = "type";
pub const COORDINATES: &str = "coordinates";
pub const GEOMETRIES: &str = "geometries";
pub const BBOX: &str = "bbox";

// --- Traits

pub trait GeoJsonGeometry: fmt::Debug {
    fn geometry_type(&self) -> GeometryType;

    /// Calls `f` for every position, in writing order.
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate));

    fn is_empty(&self) -> bool {
        let mut empty = true;
        self.visit_positions(&mut |_| empty = false);
        empty
    }

    /// Dimension of the first position, `None` when empty.
    fn dimension(&self) -> Option<Dimension> {
        let mut dimension = None;
        self.visit_positions(&mut |c| {
            dimension.get_or_insert(c.dimension());
        });
        dimension
    }

    /// 2D extent, `None` when empty.
    fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        self.visit_positions(&mut |c| {
            let b = bbox.get_or_insert([c.x, c.y, c.x, c.y]);
            b[0] = b[0].min(c.x);
            b[1] = b[1].min(c.y);
            b[2] = b[2].max(c.x);
            b[3] = b[3].max(c.y);
        });
        bbox
    }

    /// First NaN or infinite ordinate, if any.
    fn first_non_finite(&self) -> Option<f64> {
        let mut found = None;
        self.visit_positions(&mut |c| {
            if found.is_none() {
                found = [Some(c.x), Some(c.y), c.z]
                    .iter()
                    .flatten()
                    .copied()
                    .find(|v| !v.is_finite());
            }
        });
        found
    }
}

/// Nesting state of one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadContext {
    depth: usize,
    max_depth: usize,
}

impl ReadContext {
    pub fn new(options: &ReadOptions) -> Self {
        ReadContext {
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    fn enter_collection(&self) -> Result<ReadContext, Error> {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep(self.max_depth));
        }
        Ok(ReadContext {
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }
}

impl Default for ReadContext {
    fn default() -> Self {
        ReadContext::new(&ReadOptions::default())
    }
}

pub trait GeoJsonRead: GeoJsonGeometry + Sized {
    fn read_geojson(value: &Value) -> Result<Self, Error> {
        Self::read_geojson_in(value, &ReadContext::default())
    }

    fn read_geojson_in(value: &Value, ctx: &ReadContext) -> Result<Self, Error> {
        let geometry_type = read_type_tag(value)?;
        log::trace!("reading {} geometry", geometry_type);
        Self::read_geojson_body(value, geometry_type, ctx)
    }

    #[doc(hidden)]
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, ctx: &ReadContext) -> Result<Self, Error>;
}

pub trait GeoJsonWrite: GeoJsonGeometry {
    fn write_geojson<S: Serializer>(&self, serializer: S, options: &WriteOptions) -> Result<S::Ok, S::Error> {
        let geometry_type = self.geometry_type();
        let bbox = if options.include_bbox.includes(geometry_type) {
            self.bounding_box()
        } else {
            None
        };
        let mut map = serializer.serialize_map(Some(if bbox.is_some() { 3 } else { 2 }))?;
        map.serialize_entry(TYPE, geometry_type.name())?;
        if let Some(bbox) = bbox {
            map.serialize_entry(BBOX, &BboxSer { bbox, options })?;
        }
        self.write_geojson_body(&mut map, options)?;
        map.end()
    }

    /// Writes the `coordinates` or `geometries` member.
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error>;

    fn as_geojson<'a>(&'a self, options: &'a WriteOptions) -> GeoJson<'a, Self>
    where
        Self: Sized,
    {
        GeoJson { geom: self, options }
    }
}

/// Borrowed geometry plus write options, serializable with any serde serializer.
pub struct GeoJson<'a, G: ?Sized> {
    pub geom: &'a G,
    pub options: &'a WriteOptions,
}

impl<'a, G: GeoJsonWrite + ?Sized> Serialize for GeoJson<'a, G> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.geom.write_geojson(serializer, self.options)
    }
}

impl<'a, G: ?Sized> fmt::Debug for GeoJson<'a, G>
where
    G: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GeoJson")
            .field("geom", &self.geom)
            .field("options", self.options)
            .finish()
    }
}

// --- helper functions for reading ---

fn read_type_tag(value: &Value) -> Result<GeometryType, Error> {
    value
        .get(TYPE)
        .and_then(Value::as_str)
        .ok_or(Error::MissingTypeTag)?
        .parse()
}

fn expect_type(expected: GeometryType, found: GeometryType) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::UnexpectedGeometryType { expected, found })
    }
}

fn member<'v>(value: &'v Value, name: &'static str) -> Result<&'v Value, Error> {
    value.get(name).ok_or(Error::MissingCoordinates(name))
}

fn read_array<'v>(value: &'v Value, what: &str) -> Result<&'v Vec<Value>, Error> {
    value
        .as_array()
        .ok_or_else(|| Error::MalformedCoordinates(format!("expected an array of {}, found {}", what, value)))
}

fn read_positions(value: &Value) -> Result<Vec<Coordinate>, Error> {
    read_array(value, "positions")?
        .iter()
        .map(Coordinate::read_geojson)
        .collect()
}

fn read_line(value: &Value) -> Result<LineString, Error> {
    let points = read_positions(value)?;
    // An empty array stands for an empty line string.
    if points.len() == 1 {
        return Err(Error::InsufficientPositions(points.len()));
    }
    Ok(LineString { points })
}

fn read_ring(value: &Value) -> Result<LineString, Error> {
    let points = read_positions(value)?;
    if points.len() < 4 {
        return Err(Error::InsufficientRingPositions(points.len()));
    }
    if points.first() != points.last() {
        return Err(Error::UnclosedRing);
    }
    Ok(LineString { points })
}

fn read_polygon(value: &Value) -> Result<Polygon, Error> {
    let rings = read_array(value, "rings")?
        .iter()
        .map(read_ring)
        .collect::<Result<_, _>>()?;
    Ok(Polygon { rings })
}

fn uniform_dimension<G: GeoJsonGeometry>(geom: G) -> Result<G, Error> {
    let mut first: Option<Dimension> = None;
    let mut mixed = false;
    geom.visit_positions(&mut |c| {
        if *first.get_or_insert(c.dimension()) != c.dimension() {
            mixed = true;
        }
    });
    if mixed {
        Err(Error::MixedDimensions)
    } else {
        Ok(geom)
    }
}

// --- helpers for writing ---

struct BboxSer<'a> {
    bbox: BoundingBox,
    options: &'a WriteOptions,
}

impl<'a> Serialize for BboxSer<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.bbox.len()))?;
        for v in &self.bbox {
            seq.serialize_element(&Number(self.options.round(*v)))?;
        }
        seq.end()
    }
}

struct Positions<'a> {
    points: &'a [Coordinate],
    options: &'a WriteOptions,
}

impl<'a> Serialize for Positions<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.points.len()))?;
        for position in self.points {
            seq.serialize_element(&PositionSer {
                position,
                options: self.options,
            })?;
        }
        seq.end()
    }
}

struct Lines<'a> {
    lines: &'a [LineString],
    options: &'a WriteOptions,
}

impl<'a> Serialize for Lines<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.lines.len()))?;
        for line in self.lines {
            seq.serialize_element(&Positions {
                points: &line.points,
                options: self.options,
            })?;
        }
        seq.end()
    }
}

struct Polygons<'a> {
    polygons: &'a [Polygon],
    options: &'a WriteOptions,
}

impl<'a> Serialize for Polygons<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.polygons.len()))?;
        for polygon in self.polygons {
            seq.serialize_element(&Lines {
                lines: &polygon.rings,
                options: self.options,
            })?;
        }
        seq.end()
    }
}

struct Members<'a> {
    geometries: &'a [Geometry],
    options: &'a WriteOptions,
}

impl<'a> Serialize for Members<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.geometries.len()))?;
        for geom in self.geometries {
            seq.serialize_element(&GeoJson {
                geom,
                options: self.options,
            })?;
        }
        seq.end()
    }
}

// --- Point

impl GeoJsonGeometry for Point {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::Point
    }
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        if let Some(c) = &self.coord {
            f(c);
        }
    }
}

impl GeoJsonRead for Point {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, _ctx: &ReadContext) -> Result<Self, Error> {
        expect_type(GeometryType::Point, geometry_type)?;
        let coordinates = member(value, COORDINATES)?;
        if read_array(coordinates, "ordinates")?.is_empty() {
            return Ok(Point::empty());
        }
        Coordinate::read_geojson(coordinates).map(Point::from)
    }
}

impl GeoJsonWrite for Point {
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        match &self.coord {
            Some(position) => map.serialize_entry(COORDINATES, &PositionSer { position, options }),
            None => map.serialize_entry(COORDINATES, &Positions { points: &[], options }),
        }
    }
}

// --- LineString

impl GeoJsonGeometry for LineString {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::LineString
    }
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        for c in &self.points {
            f(c);
        }
    }
}

impl GeoJsonRead for LineString {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, _ctx: &ReadContext) -> Result<Self, Error> {
        expect_type(GeometryType::LineString, geometry_type)?;
        uniform_dimension(read_line(member(value, COORDINATES)?)?)
    }
}

impl GeoJsonWrite for LineString {
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        map.serialize_entry(
            COORDINATES,
            &Positions {
                points: &self.points,
                options,
            },
        )
    }
}

// --- Polygon

impl GeoJsonGeometry for Polygon {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::Polygon
    }
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        for ring in &self.rings {
            ring.visit_positions(f);
        }
    }
}

impl GeoJsonRead for Polygon {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, _ctx: &ReadContext) -> Result<Self, Error> {
        expect_type(GeometryType::Polygon, geometry_type)?;
        uniform_dimension(read_polygon(member(value, COORDINATES)?)?)
    }
}

impl GeoJsonWrite for Polygon {
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        map.serialize_entry(
            COORDINATES,
            &Lines {
                lines: &self.rings,
                options,
            },
        )
    }
}

// --- MultiPoint

impl GeoJsonGeometry for MultiPoint {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::MultiPoint
    }
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        for c in &self.points {
            f(c);
        }
    }
}

impl GeoJsonRead for MultiPoint {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, _ctx: &ReadContext) -> Result<Self, Error> {
        expect_type(GeometryType::MultiPoint, geometry_type)?;
        let points = read_positions(member(value, COORDINATES)?)?;
        uniform_dimension(MultiPoint { points })
    }
}

impl GeoJsonWrite for MultiPoint {
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        map.serialize_entry(
            COORDINATES,
            &Positions {
                points: &self.points,
                options,
            },
        )
    }
}

// --- MultiLineString

impl GeoJsonGeometry for MultiLineString {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::MultiLineString
    }
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        for line in &self.lines {
            line.visit_positions(f);
        }
    }
}

impl GeoJsonRead for MultiLineString {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, _ctx: &ReadContext) -> Result<Self, Error> {
        expect_type(GeometryType::MultiLineString, geometry_type)?;
        let lines = read_array(member(value, COORDINATES)?, "line strings")?
            .iter()
            .map(read_line)
            .collect::<Result<_, _>>()?;
        uniform_dimension(MultiLineString { lines })
    }
}

impl GeoJsonWrite for MultiLineString {
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        map.serialize_entry(
            COORDINATES,
            &Lines {
                lines: &self.lines,
                options,
            },
        )
    }
}

// --- MultiPolygon

impl GeoJsonGeometry for MultiPolygon {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::MultiPolygon
    }
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        for polygon in &self.polygons {
            polygon.visit_positions(f);
        }
    }
}

impl GeoJsonRead for MultiPolygon {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, _ctx: &ReadContext) -> Result<Self, Error> {
        expect_type(GeometryType::MultiPolygon, geometry_type)?;
        let polygons = read_array(member(value, COORDINATES)?, "polygons")?
            .iter()
            .map(read_polygon)
            .collect::<Result<_, _>>()?;
        uniform_dimension(MultiPolygon { polygons })
    }
}

impl GeoJsonWrite for MultiPolygon {
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        map.serialize_entry(
            COORDINATES,
            &Polygons {
                polygons: &self.polygons,
                options,
            },
        )
    }
}

// --- GeometryCollection

impl GeoJsonGeometry for GeometryCollection {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::GeometryCollection
    }
    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        for geom in &self.geometries {
            geom.visit_positions(f);
        }
    }
}

impl GeoJsonRead for GeometryCollection {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, ctx: &ReadContext) -> Result<Self, Error> {
        expect_type(GeometryType::GeometryCollection, geometry_type)?;
        let ctx = ctx.enter_collection()?;
        // Members may mix dimensions; each one is checked on its own.
        let geometries = read_array(member(value, GEOMETRIES)?, "geometries")?
            .iter()
            .map(|g| Geometry::read_geojson_in(g, &ctx))
            .collect::<Result<_, _>>()?;
        Ok(GeometryCollection { geometries })
    }
}

impl GeoJsonWrite for GeometryCollection {
    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        map.serialize_entry(
            GEOMETRIES,
            &Members {
                geometries: &self.geometries,
                options,
            },
        )
    }
}

// --- Geometry

impl GeoJsonGeometry for Geometry {
    fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    fn visit_positions(&self, f: &mut dyn FnMut(&Coordinate)) {
        match self {
            Geometry::Point(g) => g.visit_positions(f),
            Geometry::LineString(g) => g.visit_positions(f),
            Geometry::Polygon(g) => g.visit_positions(f),
            Geometry::MultiPoint(g) => g.visit_positions(f),
            Geometry::MultiLineString(g) => g.visit_positions(f),
            Geometry::MultiPolygon(g) => g.visit_positions(f),
            Geometry::GeometryCollection(g) => g.visit_positions(f),
        }
    }
}

impl GeoJsonRead for Geometry {
    fn read_geojson_body(value: &Value, geometry_type: GeometryType, ctx: &ReadContext) -> Result<Self, Error> {
        match geometry_type {
            GeometryType::Point => Point::read_geojson_body(value, geometry_type, ctx).map(Geometry::Point),
            GeometryType::LineString => {
                LineString::read_geojson_body(value, geometry_type, ctx).map(Geometry::LineString)
            }
            GeometryType::Polygon => Polygon::read_geojson_body(value, geometry_type, ctx).map(Geometry::Polygon),
            GeometryType::MultiPoint => {
                MultiPoint::read_geojson_body(value, geometry_type, ctx).map(Geometry::MultiPoint)
            }
            GeometryType::MultiLineString => {
                MultiLineString::read_geojson_body(value, geometry_type, ctx).map(Geometry::MultiLineString)
            }
            GeometryType::MultiPolygon => {
                MultiPolygon::read_geojson_body(value, geometry_type, ctx).map(Geometry::MultiPolygon)
            }
            GeometryType::GeometryCollection => {
                GeometryCollection::read_geojson_body(value, geometry_type, ctx).map(Geometry::GeometryCollection)
            }
        }
    }
}

impl GeoJsonWrite for Geometry {
    // Delegates whole objects so the `type` and `bbox` members are the variant's own.
    fn write_geojson<S: Serializer>(&self, serializer: S, options: &WriteOptions) -> Result<S::Ok, S::Error> {
        match self {
            Geometry::Point(g) => g.write_geojson(serializer, options),
            Geometry::LineString(g) => g.write_geojson(serializer, options),
            Geometry::Polygon(g) => g.write_geojson(serializer, options),
            Geometry::MultiPoint(g) => g.write_geojson(serializer, options),
            Geometry::MultiLineString(g) => g.write_geojson(serializer, options),
            Geometry::MultiPolygon(g) => g.write_geojson(serializer, options),
            Geometry::GeometryCollection(g) => g.write_geojson(serializer, options),
        }
    }

    fn write_geojson_body<M: SerializeMap>(&self, map: &mut M, options: &WriteOptions) -> Result<(), M::Error> {
        match self {
            Geometry::Point(g) => g.write_geojson_body(map, options),
            Geometry::LineString(g) => g.write_geojson_body(map, options),
            Geometry::Polygon(g) => g.write_geojson_body(map, options),
            Geometry::MultiPoint(g) => g.write_geojson_body(map, options),
            Geometry::MultiLineString(g) => g.write_geojson_body(map, options),
            Geometry::MultiPolygon(g) => g.write_geojson_body(map, options),
            Geometry::GeometryCollection(g) => g.write_geojson_body(map, options),
        }
    }
}
