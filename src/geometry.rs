//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! In-memory geometry values.
//!
//! These are plain owned values. Values produced by the reader always satisfy the
//! arity and ring closure rules of their type; values built by hand are written as they are.

use crate::position::Coordinate;

#[derive(PartialEq, Clone, Debug, Default)]
pub struct Point {
    /// `None` for an empty point.
    pub coord: Option<Coordinate>,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct LineString {
    pub points: Vec<Coordinate>,
}

/// The first ring is the exterior, the others are holes.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Polygon {
    pub rings: Vec<LineString>,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct MultiPoint {
    pub points: Vec<Coordinate>,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct MultiLineString {
    pub lines: Vec<LineString>,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct GeometryCollection {
    pub geometries: Vec<Geometry>,
}

#[derive(PartialEq, Clone, Debug)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

/// `[min_x, min_y, max_x, max_y]`
pub type BoundingBox = [f64; 4];

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            coord: Some(Coordinate::new(x, y)),
        }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Point {
            coord: Some(Coordinate::new_3d(x, y, z)),
        }
    }

    pub fn empty() -> Self {
        Point { coord: None }
    }
}

impl From<Coordinate> for Point {
    fn from(coord: Coordinate) -> Self {
        Point { coord: Some(coord) }
    }
}

impl<C: Into<Coordinate>> FromIterator<C> for LineString {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        LineString {
            points: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<C: Into<Coordinate>> FromIterator<C> for MultiPoint {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        MultiPoint {
            points: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromIterator<LineString> for Polygon {
    fn from_iter<I: IntoIterator<Item = LineString>>(iter: I) -> Self {
        Polygon {
            rings: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<LineString> for MultiLineString {
    fn from_iter<I: IntoIterator<Item = LineString>>(iter: I) -> Self {
        MultiLineString {
            lines: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Polygon> for MultiPolygon {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        MultiPolygon {
            polygons: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Geometry> for GeometryCollection {
    fn from_iter<I: IntoIterator<Item = Geometry>>(iter: I) -> Self {
        GeometryCollection {
            geometries: iter.into_iter().collect(),
        }
    }
}

impl Polygon {
    pub fn exterior(&self) -> Option<&LineString> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[LineString] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Geometry::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(Point, LineString, Polygon, MultiPoint, MultiLineString, MultiPolygon, GeometryCollection);
