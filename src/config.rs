//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! Options controlling how geometries are written and read.

use crate::types::GeometryType;
use serde::{Deserialize, Serialize};

/// Default limit for nested geometry collections.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Selects the geometry types that get a `bbox` member when written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeBoundingBox {
    #[default]
    Never,
    Always,
    ForTypes(Vec<GeometryType>),
}

impl IncludeBoundingBox {
    pub fn for_types<I: IntoIterator<Item = GeometryType>>(types: I) -> Self {
        let mut types: Vec<GeometryType> = types.into_iter().collect();
        types.sort();
        types.dedup();
        IncludeBoundingBox::ForTypes(types)
    }

    pub fn includes(&self, geometry_type: GeometryType) -> bool {
        match self {
            IncludeBoundingBox::Never => false,
            IncludeBoundingBox::Always => true,
            IncludeBoundingBox::ForTypes(types) => types.contains(&geometry_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    pub include_bbox: IncludeBoundingBox,
    /// Fractional digits kept for every ordinate. `None` writes values unchanged.
    pub decimal_places: Option<u8>,
}

impl WriteOptions {
    /// Rounds half away from zero. Values that would overflow are kept as they are.
    pub(crate) fn round(&self, value: f64) -> f64 {
        match self.decimal_places {
            Some(places) => {
                let factor = 10f64.powi(i32::from(places));
                let rounded = (value * factor).round() / factor;
                if rounded.is_finite() {
                    rounded
                } else {
                    value
                }
            }
            None => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Deepest allowed nesting of geometry collections. The outermost collection is level 1.
    pub max_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
