//! Demultiplex the geometries of a GeoJSON document into flat point, line
//! and polygon collections.
//!
//! A [`GeometryExtractor`] walks an arbitrary GeoJSON value once, at
//! construction time, and collects every primitive geometry it finds into
//! one of three buckets. Geometries wrapped in a `Feature` (directly or via
//! a `FeatureCollection`) carry that feature's `properties` along with them;
//! `GeometryCollection` nesting is transparent. Nodes with an unrecognized
//! `type` are skipped silently, so extended or partially valid documents
//! degrade gracefully.
//!
//! No validation is performed beyond the structural access the traversal
//! itself needs: a recognized `type` missing its required member (for
//! example a `Feature` without `geometry`) is an error, anything else is
//! copied verbatim.
//!
//! ```
//! use geojson_demux::GeometryExtractor;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let document = json!({
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "geometry": {"type": "Point", "coordinates": [102.0, 0.5]},
//!         "properties": {"name": "lighthouse"}
//!     }]
//! });
//!
//! let extracted = GeometryExtractor::new(&document)?;
//! assert_eq!(extracted.points().len(), 1);
//! assert_eq!(extracted.points()[0].coordinates, json!([102.0, 0.5]));
//! assert!(extracted.lines().is_empty());
//! # Ok(())
//! # }
//! ```

mod extract;
mod geometry;

pub use extract::{ExtractOptions, GeometryExtractor};
pub use geometry::{ExtractedGeometry, GeometryKind};
