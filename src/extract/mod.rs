//! The recursive traversal that sorts a GeoJSON document's primitive
//! geometries into point, line and polygon buckets.

use anyhow::{Context, Result};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::{ExtractedGeometry, GeometryKind, to_collection};

/// Category switches for the extractor.
///
/// A flag set to true means that category's `type` tags are never inspected
/// during the traversal and its accessor stays empty, no matter what the
/// document contains. Deserializes from the camelCase member names used by
/// JSON-carried option objects (`ignorePoints` etc.).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractOptions {
    pub ignore_points: bool,
    pub ignore_lines: bool,
    pub ignore_polygons: bool,
}

/// Walks a GeoJSON value once, at construction time, and keeps every
/// primitive geometry it finds together with the properties of the nearest
/// enclosing Feature.
///
/// The traversal recognizes the nine GeoJSON `type` tags and nothing else;
/// nodes with any other (or no) `type` end their branch silently. It never
/// mutates the input, and a recognized tag whose required member is missing
/// fails construction with a structural error.
#[derive(Debug)]
pub struct GeometryExtractor {
    // None while a category is ignored, so "ignored" and "nothing found"
    // stay distinct internally. Accessors flatten both to an empty slice.
    points: Option<Vec<ExtractedGeometry>>,
    lines: Option<Vec<ExtractedGeometry>>,
    polygons: Option<Vec<ExtractedGeometry>>,
}

impl GeometryExtractor {
    /// Extract every category from `document`.
    pub fn new(document: &Value) -> Result<Self> {
        Self::with_options(document, ExtractOptions::default())
    }

    /// Extract from `document`, skipping the categories disabled in
    /// `options`.
    pub fn with_options(document: &Value, options: ExtractOptions) -> Result<Self> {
        let mut extractor = Self {
            points: (!options.ignore_points).then(Vec::new),
            lines: (!options.ignore_lines).then(Vec::new),
            polygons: (!options.ignore_polygons).then(Vec::new),
        };
        extractor.visit(document, None)?;

        tracing::debug!(
            "extracted {} points, {} lines, {} polygons",
            extractor.points().len(),
            extractor.lines().len(),
            extractor.polygons().len()
        );
        Ok(extractor)
    }

    /// Geometries collected from `Point` and `MultiPoint` nodes, in
    /// document order. Empty when the category was ignored or absent.
    pub fn points(&self) -> &[ExtractedGeometry] {
        self.points.as_deref().unwrap_or(&[])
    }

    /// Geometries collected from `LineString` and `MultiLineString` nodes.
    pub fn lines(&self) -> &[ExtractedGeometry] {
        self.lines.as_deref().unwrap_or(&[])
    }

    /// Geometries collected from `Polygon` and `MultiPolygon` nodes, each
    /// carrying its full ring list (exterior plus holes).
    pub fn polygons(&self) -> &[ExtractedGeometry] {
        self.polygons.as_deref().unwrap_or(&[])
    }

    /// The point bucket rebuilt as a GeoJSON FeatureCollection.
    pub fn points_collection(&self) -> Result<FeatureCollection> {
        to_collection(self.points(), GeometryKind::Point)
    }

    /// The line bucket rebuilt as a GeoJSON FeatureCollection.
    pub fn lines_collection(&self) -> Result<FeatureCollection> {
        to_collection(self.lines(), GeometryKind::Line)
    }

    /// The polygon bucket rebuilt as a GeoJSON FeatureCollection.
    pub fn polygons_collection(&self) -> Result<FeatureCollection> {
        to_collection(self.polygons(), GeometryKind::Polygon)
    }

    // Dispatch order is points, then lines, then polygons, then the
    // container tags; a node matches at most one branch. An ignored
    // category's tags are never compared, so such nodes fall through to the
    // container dispatch and die in its fallthrough arm.
    fn visit(&mut self, node: &Value, properties: Option<&Map<String, Value>>) -> Result<()> {
        let tag = node.get("type").and_then(Value::as_str).unwrap_or("");

        if let Some(points) = &mut self.points {
            match tag {
                "Point" => {
                    let coordinates = required(node, "coordinates", tag)?;
                    points.push(extracted(coordinates.clone(), properties));
                    return Ok(());
                }
                "MultiPoint" => {
                    for coordinates in elements(node, "coordinates", tag)? {
                        points.push(extracted(coordinates.clone(), properties));
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        if let Some(lines) = &mut self.lines {
            match tag {
                "LineString" => {
                    let coordinates = required(node, "coordinates", tag)?;
                    lines.push(extracted(coordinates.clone(), properties));
                    return Ok(());
                }
                "MultiLineString" => {
                    for coordinates in elements(node, "coordinates", tag)? {
                        lines.push(extracted(coordinates.clone(), properties));
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        if let Some(polygons) = &mut self.polygons {
            match tag {
                "Polygon" => {
                    let coordinates = required(node, "coordinates", tag)?;
                    polygons.push(extracted(coordinates.clone(), properties));
                    return Ok(());
                }
                "MultiPolygon" => {
                    for coordinates in elements(node, "coordinates", tag)? {
                        polygons.push(extracted(coordinates.clone(), properties));
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        match tag {
            // A Feature's properties replace whatever was inherited, even
            // when null or absent.
            "Feature" => {
                let geometry = required(node, "geometry", tag)?;
                self.visit(geometry, feature_properties(node))?;
            }
            "FeatureCollection" => {
                for feature in elements(node, "features", tag)? {
                    let geometry = required(feature, "geometry", "Feature")?;
                    self.visit(geometry, feature_properties(feature))?;
                }
            }
            // GeometryCollection carries no properties of its own; children
            // inherit what this call inherited.
            "GeometryCollection" => {
                for geometry in elements(node, "geometries", tag)? {
                    self.visit(geometry, properties)?;
                }
            }
            other => {
                if !other.is_empty() {
                    tracing::trace!("skipping node with unrecognized type {other:?}");
                }
            }
        }
        Ok(())
    }
}

fn extracted(coordinates: Value, properties: Option<&Map<String, Value>>) -> ExtractedGeometry {
    ExtractedGeometry {
        coordinates,
        properties: properties.cloned(),
    }
}

fn feature_properties(feature: &Value) -> Option<&Map<String, Value>> {
    feature.get("properties").and_then(Value::as_object)
}

fn required<'a>(node: &'a Value, member: &str, tag: &str) -> Result<&'a Value> {
    node.get(member)
        .with_context(|| format!("{tag} object is missing required member `{member}`"))
}

fn elements<'a>(node: &'a Value, member: &str, tag: &str) -> Result<&'a Vec<Value>> {
    required(node, member, tag)?
        .as_array()
        .with_context(|| format!("member `{member}` of {tag} object must be an array"))
}
