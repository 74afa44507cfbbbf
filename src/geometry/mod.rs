//! The unit stored in each output bucket, plus conversions into the geo
//! ecosystem types for downstream consumers.

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry};
use serde::Serialize;
use serde_json::{Map, Value};

/// The three categories a primitive geometry can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

impl GeometryKind {
    /// The GeoJSON `type` tag used when a geometry of this kind is rebuilt.
    pub fn tag(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::Line => "LineString",
            GeometryKind::Polygon => "Polygon",
        }
    }
}

/// A single geometry lifted out of the source document.
///
/// `coordinates` is copied verbatim from the source node, whatever its
/// shape. `properties` comes from the nearest enclosing Feature, or is
/// `None` when there was none (or its `properties` was null).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedGeometry {
    pub coordinates: Value,
    pub properties: Option<Map<String, Value>>,
}

impl ExtractedGeometry {
    fn geojson_value(&self, kind: GeometryKind) -> Result<geojson::Value> {
        let coordinates = self.coordinates.clone();
        let value = match kind {
            GeometryKind::Point => serde_json::from_value(coordinates).map(geojson::Value::Point),
            GeometryKind::Line => {
                serde_json::from_value(coordinates).map(geojson::Value::LineString)
            }
            GeometryKind::Polygon => {
                serde_json::from_value(coordinates).map(geojson::Value::Polygon)
            }
        };
        value.with_context(|| format!("{} coordinates have the wrong shape", kind.tag()))
    }

    /// Rebuild this geometry as a GeoJSON Feature carrying the inherited
    /// properties.
    pub fn to_feature(&self, kind: GeometryKind) -> Result<Feature> {
        Ok(Feature {
            bbox: None,
            geometry: Some(Geometry::new(self.geojson_value(kind)?)),
            id: None,
            properties: self.properties.clone(),
            foreign_members: None,
        })
    }

    /// Convert into a `geo_types` geometry for geometric processing or
    /// hand-off to sinks that speak `geo`.
    pub fn to_geo(&self, kind: GeometryKind) -> Result<geo_types::Geometry<f64>> {
        let geometry = geo_types::Geometry::try_from(self.geojson_value(kind)?)?;
        Ok(geometry)
    }
}

/// Rebuild a whole bucket as a FeatureCollection, one Feature per element,
/// in extraction order.
pub(crate) fn to_collection(
    items: &[ExtractedGeometry],
    kind: GeometryKind,
) -> Result<FeatureCollection> {
    let features = items
        .iter()
        .map(|item| item.to_feature(kind))
        .collect::<Result<Vec<_>>>()?;
    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extracted(coordinates: Value, properties: Option<Value>) -> ExtractedGeometry {
        ExtractedGeometry {
            coordinates,
            properties: properties.and_then(|p| p.as_object().cloned()),
        }
    }

    #[test]
    fn rebuilds_a_point_feature_with_properties() {
        let item = extracted(json!([100.0, 0.0]), Some(json!({"name": "origin"})));
        let feature = item.to_feature(GeometryKind::Point).unwrap();

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Point");
        assert_eq!(value["geometry"]["coordinates"], json!([100.0, 0.0]));
        assert_eq!(value["properties"]["name"], "origin");
    }

    #[test]
    fn rebuilds_a_polygon_feature_with_holes() {
        let rings = json!([
            [[100.0, 0.0], [101.0, 0.0], [101.0, 1.0], [100.0, 0.0]],
            [[100.2, 0.2], [100.8, 0.2], [100.8, 0.8], [100.2, 0.2]]
        ]);
        let feature = extracted(rings.clone(), None)
            .to_feature(GeometryKind::Polygon)
            .unwrap();

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert_eq!(value["geometry"]["coordinates"], rings);
    }

    #[test]
    fn converts_to_geo_types() {
        let item = extracted(json!([4.9, 52.37]), None);
        let geometry = item.to_geo(GeometryKind::Point).unwrap();

        match geometry {
            geo_types::Geometry::Point(point) => {
                assert!((point.x() - 4.9).abs() < 1e-10);
                assert!((point.y() - 52.37).abs() < 1e-10);
            }
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn malformed_coordinates_surface_as_errors() {
        let item = extracted(json!("not coordinates"), None);
        assert!(item.to_feature(GeometryKind::Point).is_err());
        assert!(item.to_geo(GeometryKind::Line).is_err());
    }

    #[test]
    fn kind_tags_match_geojson_type_names() {
        assert_eq!(GeometryKind::Point.tag(), "Point");
        assert_eq!(GeometryKind::Line.tag(), "LineString");
        assert_eq!(GeometryKind::Polygon.tag(), "Polygon");
    }
}
