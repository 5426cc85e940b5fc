//
// Copyright (c) ShuYu Wang <andelf@gmail.com>, Feather Workshop and Pirmin Kalberer. All rights reserved.
//

//! serde integration.
//!
//! `Serialize` and `Deserialize` are implemented for [`Geometry`] and for every concrete
//! geometry type, so any struct holding geometry fields can derive them. Those impls use
//! default options; [`GeoJsonCodec`] hands out a writer and a reader with custom ones.

use crate::config::{IncludeBoundingBox, ReadOptions, WriteOptions};
use crate::error::Error;
use crate::geojson::{GeoJson, GeoJsonRead, GeoJsonWrite, ReadContext};
use crate::geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Write and read options for one application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoJsonCodec {
    pub write: WriteOptions,
    pub read: ReadOptions,
}

impl GeoJsonCodec {
    pub fn new() -> Self {
        GeoJsonCodec::default()
    }

    pub fn with_bounding_box(mut self, include_bbox: IncludeBoundingBox) -> Self {
        self.write.include_bbox = include_bbox;
        self
    }

    pub fn with_decimal_places(mut self, decimal_places: u8) -> Self {
        self.write.decimal_places = Some(decimal_places);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.read.max_depth = max_depth;
        self
    }

    pub fn writer(&self) -> GeometryWriter {
        log::debug!("geojson writer: {:?}", self.write);
        GeometryWriter {
            options: self.write.clone(),
        }
    }

    pub fn reader(&self) -> GeometryReader {
        log::debug!("geojson reader: {:?}", self.read);
        GeometryReader {
            options: self.read.clone(),
        }
    }
}

/// Writes geometries as GeoJSON. Holds only immutable options.
#[derive(Debug, Clone, Default)]
pub struct GeometryWriter {
    options: WriteOptions,
}

impl GeometryWriter {
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Serializable view of `geom` using this writer's options.
    pub fn encode<'a, G: GeoJsonWrite>(&'a self, geom: &'a G) -> GeoJson<'a, G> {
        geom.as_geojson(&self.options)
    }

    pub fn to_string<G: GeoJsonWrite>(&self, geom: &G) -> Result<String, Error> {
        serde_json::to_string(&self.encode(geom)).map_err(|e| classify(geom, e))
    }

    pub fn to_value<G: GeoJsonWrite>(&self, geom: &G) -> Result<Value, Error> {
        serde_json::to_value(self.encode(geom)).map_err(|e| classify(geom, e))
    }
}

// serde_json keeps only the message of custom errors; recover the kind from the input.
fn classify<G: GeoJsonWrite>(geom: &G, e: serde_json::Error) -> Error {
    match geom.first_non_finite() {
        Some(v) => Error::NonFiniteCoordinate(v),
        None => Error::Json(e),
    }
}

/// Reads GeoJSON geometry objects. Holds only immutable options.
#[derive(Debug, Clone, Default)]
pub struct GeometryReader {
    options: ReadOptions,
}

impl GeometryReader {
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn read_value<G: GeoJsonRead>(&self, value: &Value) -> Result<G, Error> {
        G::read_geojson_in(value, &ReadContext::new(&self.options)).map_err(|e| {
            log::debug!("rejected geojson geometry: {}", e);
            e
        })
    }

    pub fn from_str<G: GeoJsonRead>(&self, text: &str) -> Result<G, Error> {
        let value: Value = serde_json::from_str(text)?;
        self.read_value(&value)
    }

    pub fn from_slice<G: GeoJsonRead>(&self, bytes: &[u8]) -> Result<G, Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.read_value(&value)
    }

    /// Reads a geometry from any serde deserializer.
    pub fn deserialize<'de, G: GeoJsonRead, D: Deserializer<'de>>(&self, deserializer: D) -> Result<G, D::Error> {
        let value = Value::deserialize(deserializer)?;
        self.read_value(&value).map_err(de::Error::custom)
    }
}

/// Writes `geom` with default options.
pub fn to_string<G: GeoJsonWrite>(geom: &G) -> Result<String, Error> {
    GeometryWriter::default().to_string(geom)
}

/// Writes `geom` into a `serde_json::Value` with default options.
pub fn to_value<G: GeoJsonWrite>(geom: &G) -> Result<Value, Error> {
    GeometryWriter::default().to_value(geom)
}

/// Reads a geometry from GeoJSON text with default options.
pub fn from_str<G: GeoJsonRead>(text: &str) -> Result<G, Error> {
    GeometryReader::default().from_str(text)
}

/// Reads a geometry from a parsed GeoJSON value with default options.
pub fn from_value<G: GeoJsonRead>(value: &Value) -> Result<G, Error> {
    GeometryReader::default().read_value(value)
}

macro_rules! register_geojson {
    ($($geom:ty),*) => {
        $(
            impl Serialize for $geom {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.write_geojson(serializer, &WriteOptions::default())
                }
            }

            impl<'de> Deserialize<'de> for $geom {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    GeometryReader::default().deserialize(deserializer)
                }
            }
        )*
    };
}

register_geojson!(
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeometryType;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stop {
        name: String,
        location: Point,
        route: Option<LineString>,
        area: Option<Geometry>,
    }

    #[test]
    fn embedded_fields() {
        let stop = Stop {
            name: "Bahnhof".to_string(),
            location: Point::new(8.54, 47.37),
            route: Some([(8.5, 47.3), (8.6, 47.4)].into_iter().collect()),
            area: None,
        };
        let text = serde_json::to_string(&stop).unwrap();
        assert_eq!(
            text,
            r#"{"name":"Bahnhof","location":{"type":"Point","coordinates":[8.54,47.37]},"route":{"type":"LineString","coordinates":[[8.5,47.3],[8.6,47.4]]},"area":null}"#
        );
        let back: Stop = serde_json::from_str(&text).unwrap();
        assert_eq!(back, stop);
    }

    #[test]
    fn embedded_field_errors_keep_their_message() {
        let text = r#"{"name":"x","location":{"type":"LineString","coordinates":[[0,0],[1,1]]},"route":null,"area":null}"#;
        let err = serde_json::from_str::<Stop>(text).unwrap_err();
        assert!(err.to_string().contains("expected a Point geometry, found LineString"), "{}", err);

        let text = r#"{"name":"x","location":{"type":"Point","coordinates":[0,0]},"route":null,"area":{"type":"Polygon","coordinates":[[[0,0],[1,0],[0,0]]]}}"#;
        let err = serde_json::from_str::<Stop>(text).unwrap_err();
        assert!(err.to_string().contains("at least 4 positions"), "{}", err);
    }

    #[test]
    fn typed_entry_points() {
        assert_matches!(
            from_str::<Geometry>(r#"{"type":"MultiPoint","coordinates":[[1,2],[3,4,5]]}"#),
            Err(Error::MixedDimensions)
        );
        assert_matches!(from_str::<Geometry>("{\"type\":"), Err(Error::Json(_)));
        assert_matches!(
            from_str::<Polygon>(r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1]]]}"#),
            Err(Error::UnclosedRing)
        );

        let value = to_value(&Point::new(1., 2.)).unwrap();
        assert_eq!(value, serde_json::json!({"type": "Point", "coordinates": [1, 2]}));
        assert_eq!(from_value::<Point>(&value).unwrap(), Point::new(1., 2.));
    }

    #[test]
    fn writer_reports_non_finite() {
        let point = Point::new(f64::INFINITY, 0.);
        assert_matches!(to_string(&point), Err(Error::NonFiniteCoordinate(v)) if v == f64::INFINITY);
        let collection = GeometryCollection {
            geometries: vec![Point::new(0., 0.).into(), Point::new_3d(0., 0., f64::NAN).into()],
        };
        assert_matches!(to_value(&collection), Err(Error::NonFiniteCoordinate(v)) if v.is_nan());
        assert!(serde_json::to_string(&point).is_err());
    }

    #[test]
    fn configured_codec() {
        let codec = GeoJsonCodec::new()
            .with_bounding_box(IncludeBoundingBox::for_types([GeometryType::Point]))
            .with_decimal_places(2)
            .with_max_depth(1);
        let writer = codec.writer();
        assert_eq!(writer.options().decimal_places, Some(2));
        assert!(writer.options().include_bbox.includes(GeometryType::Point));
        assert_eq!(
            writer.to_string(&Point::new(1.23456, 2.0)).unwrap(),
            r#"{"type":"Point","bbox":[1.23,2,1.23,2],"coordinates":[1.23,2]}"#
        );

        let reader = codec.reader();
        let nested = r#"{"type":"GeometryCollection","geometries":[{"type":"GeometryCollection","geometries":[]}]}"#;
        assert_matches!(reader.from_str::<Geometry>(nested), Err(Error::NestingTooDeep(1)));
        assert!(reader
            .from_slice::<GeometryCollection>(br#"{"type":"GeometryCollection","geometries":[]}"#)
            .unwrap()
            .geometries
            .is_empty());
    }

    #[test]
    fn configured_reader_with_deserializer() {
        let reader = GeoJsonCodec::new().with_max_depth(0).reader();
        let mut de = serde_json::Deserializer::from_str(r#"{"type":"GeometryCollection","geometries":[]}"#);
        let err = reader.deserialize::<Geometry, _>(&mut de).unwrap_err();
        assert!(err.to_string().contains("nested deeper than 0"), "{}", err);
    }

    #[test]
    fn codec_from_config_text() {
        let codec: GeoJsonCodec =
            serde_json::from_str(r#"{"write":{"include_bbox":"always"},"read":{"max_depth":4}}"#).unwrap();
        assert_eq!(codec.write.include_bbox, IncludeBoundingBox::Always);
        assert_eq!(codec.write.decimal_places, None);
        assert_eq!(codec.reader().options().max_depth, 4);
    }

    #[test]
    fn codec_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeometryWriter>();
        assert_send_sync::<GeometryReader>();
        assert_send_sync::<Geometry>();

        let writer = std::sync::Arc::new(GeoJsonCodec::new().writer());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let writer = writer.clone();
                std::thread::spawn(move || writer.to_string(&Point::new(f64::from(i), 0.)).unwrap())
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                format!(r#"{{"type":"Point","coordinates":[{},0]}}"#, i)
            );
        }
    }
}
