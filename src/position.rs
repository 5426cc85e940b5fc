//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! Single positions: `[x, y]` or `[x, y, z]`.

use crate::config::WriteOptions;
use crate::error::Error;
use crate::types::Position;
use serde::ser::{self, Serialize, SerializeSeq, Serializer};
use serde_json::Value;

// Largest magnitude below which every integral f64 is exactly an i64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dimension {
    Xy,
    Xyz,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y, z: None }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Coordinate { x, y, z: Some(z) }
    }

    pub fn dimension(&self) -> Dimension {
        match self.z {
            Some(_) => Dimension::Xyz,
            None => Dimension::Xy,
        }
    }

    /// Reads one position array.
    pub fn read_geojson(value: &Value) -> Result<Self, Error> {
        let ordinates = value
            .as_array()
            .ok_or_else(|| Error::MalformedCoordinates(format!("expected a position array, found {}", value)))?;
        if ordinates.len() < 2 || ordinates.len() > 3 {
            return Err(Error::BadArity(ordinates.len()));
        }
        let x = read_ordinate(&ordinates[0])?;
        let y = read_ordinate(&ordinates[1])?;
        let z = match ordinates.get(2) {
            Some(z) => Some(read_ordinate(z)?),
            None => None,
        };
        Ok(Coordinate { x, y, z })
    }

    /// Produces the ordinates to write, rounded per `options`.
    pub fn to_ordinates(&self, options: &WriteOptions) -> Result<Ordinates, Error> {
        write_position(self, options)
    }
}

impl Position for Coordinate {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn opt_z(&self) -> Option<f64> {
        self.z
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Coordinate::new_3d(x, y, z)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Coordinate::new(x, y)
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Coordinate::new_3d(x, y, z)
    }
}

fn read_ordinate(value: &Value) -> Result<f64, Error> {
    match value {
        Value::Number(n) => {
            let v = n
                .as_f64()
                .ok_or_else(|| Error::NonNumericElement(n.to_string()))?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(Error::NonFiniteCoordinate(v))
            }
        }
        Value::Array(_) => Err(Error::MalformedCoordinates(format!(
            "expected a number inside a position, found {}",
            value
        ))),
        other => Err(Error::NonNumericElement(other.to_string())),
    }
}

/// Finite, rounded ordinates of one position, ready to be written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ordinates {
    values: [f64; 3],
    len: usize,
}

impl Ordinates {
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }
}

pub fn write_position<P: Position + ?Sized>(position: &P, options: &WriteOptions) -> Result<Ordinates, Error> {
    let mut values = [check_finite(position.x())?, check_finite(position.y())?, 0.0];
    let mut len = 2;
    if let Some(z) = position.opt_z() {
        values[2] = check_finite(z)?;
        len = 3;
    }
    for v in values[..len].iter_mut() {
        *v = options.round(*v);
    }
    Ok(Ordinates { values, len })
}

fn check_finite(v: f64) -> Result<f64, Error> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Error::NonFiniteCoordinate(v))
    }
}

/// Writes integral values as JSON integers and everything else as floats.
/// Negative zero stays a float so its sign survives.
pub(crate) fn serialize_number<S: Serializer>(v: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER && !(v == 0.0 && v.is_sign_negative()) {
        serializer.serialize_i64(v as i64)
    } else {
        serializer.serialize_f64(v)
    }
}

pub(crate) struct Number(pub f64);

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.0, serializer)
    }
}

impl Serialize for Ordinates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for v in self.as_slice() {
            seq.serialize_element(&Number(*v))?;
        }
        seq.end()
    }
}

/// Serializes one position, failing on non-finite ordinates.
pub(crate) struct PositionSer<'a, P: ?Sized> {
    pub position: &'a P,
    pub options: &'a WriteOptions,
}

impl<'a, P: Position + ?Sized> Serialize for PositionSer<'a, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        write_position(self.position, self.options)
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}
