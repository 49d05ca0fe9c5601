use foundation::bounds::Aabb2;
use serde_json::{Map, Value};
use tracing::warn;

use crate::category::normalize_name;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Closed ring of positions; the first ring of a polygon is its outer ring.
pub type Ring = Vec<GeoPoint>;
pub type Polygon = Vec<Ring>;

#[derive(Debug, Clone, PartialEq)]
pub enum GeoGeometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl GeoGeometry {
    /// Polygons regardless of single/multi encoding.
    pub fn polygons(&self) -> Vec<&Polygon> {
        match self {
            GeoGeometry::Polygon(p) => vec![p],
            GeoGeometry::MultiPolygon(ps) => ps.iter().collect(),
        }
    }

    pub fn bounds(&self) -> Aabb2 {
        let mut b = Aabb2::empty();
        for polygon in self.polygons() {
            for ring in polygon {
                for p in ring {
                    b.extend([p.lon_deg, p.lat_deg]);
                }
            }
        }
        b
    }
}

/// Named boundary feature, joined to tabular data by normalized name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub properties: Map<String, Value>,
    pub geometry: GeoGeometry,
}

impl GeoFeature {
    pub fn new(name: impl Into<String>, geometry: GeoGeometry) -> Self {
        Self {
            name: name.into(),
            properties: Map::new(),
            geometry,
        }
    }

    pub fn join_key(&self) -> String {
        normalize_name(&self.name)
    }
}

#[derive(Debug)]
pub enum GeoError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoError::Json(e) => write!(f, "JSON parse error: {e}"),
            GeoError::NotAFeatureCollection => write!(f, "expected GeoJSON FeatureCollection"),
            GeoError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoError::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Parses a boundary FeatureCollection.
///
/// Features with a `null` geometry are skipped; any other non-areal geometry
/// is rejected, since boundaries must be fillable.
pub fn parse_feature_collection(payload: &str) -> Result<Vec<GeoFeature>, GeoError> {
    let value: Value = serde_json::from_str(payload).map_err(GeoError::Json)?;
    let obj = value.as_object().ok_or(GeoError::NotAFeatureCollection)?;
    if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
        return Err(GeoError::NotAFeatureCollection);
    }
    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(GeoError::NotAFeatureCollection)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let invalid = |reason: String| GeoError::InvalidFeature { index, reason };

        let feat_obj = feat_val
            .as_object()
            .ok_or_else(|| invalid("feature must be an object".to_string()))?;
        match feat_obj.get("type").and_then(|v| v.as_str()) {
            Some("Feature") => {}
            Some(other) => return Err(invalid(format!("unexpected feature type: {other}"))),
            None => return Err(invalid("feature missing type".to_string())),
        }

        let properties = feat_obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        let name = feature_name(&properties, feat_obj.get("id"));

        let geometry_val = feat_obj
            .get("geometry")
            .ok_or_else(|| invalid("feature missing geometry".to_string()))?;
        if geometry_val.is_null() {
            warn!(index, name = %name, "skipping feature without geometry");
            continue;
        }
        let geometry = parse_geometry(geometry_val).map_err(invalid)?;

        features.push(GeoFeature {
            name,
            properties,
            geometry,
        });
    }
    Ok(features)
}

fn feature_name(properties: &Map<String, Value>, id: Option<&Value>) -> String {
    for key in ["name", "NAME", "Name"] {
        if let Some(Value::String(s)) = properties.get(key) {
            return s.clone();
        }
    }
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_geometry(v: &Value) -> Result<GeoGeometry, String> {
    let obj = v.as_object().ok_or("geometry must be an object")?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type")?;
    let coords = obj.get("coordinates").ok_or("geometry missing coordinates")?;

    match ty {
        "Polygon" => Ok(GeoGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => {
            let arr = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array")?;
            let polys: Vec<Polygon> = arr
                .iter()
                .map(parse_polygon)
                .collect::<Result<_, String>>()?;
            Ok(GeoGeometry::MultiPolygon(polys))
        }
        other => Err(format!("unsupported boundary geometry type: {other}")),
    }
}

fn parse_polygon(v: &Value) -> Result<Polygon, String> {
    let rings = v.as_array().ok_or("Polygon coordinates must be an array")?;
    if rings.is_empty() {
        return Err("Polygon must have at least one ring".to_string());
    }
    rings.iter().map(parse_ring).collect()
}

fn parse_ring(v: &Value) -> Result<Ring, String> {
    let arr = v.as_array().ok_or("ring must be an array")?;
    arr.iter().map(parse_position).collect()
}

fn parse_position(v: &Value) -> Result<GeoPoint, String> {
    let arr = v.as_array().ok_or("position must be an array")?;
    if arr.len() < 2 {
        return Err("position must have at least 2 numbers".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number")?;
    let lat = arr[1].as_f64().ok_or("lat must be a number")?;
    Ok(GeoPoint::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::{GeoError, GeoGeometry, parse_feature_collection};

    const TWO_FEATURES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Quebec"},
             "geometry": {"type": "Polygon", "coordinates": [[[-79, 45], [-57, 45], [-57, 62], [-79, 62], [-79, 45]]]}},
            {"type": "Feature", "id": 7, "properties": {},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[-100, 60], [-90, 60], [-90, 80], [-100, 60]]]]}}
        ]
    }"#;

    #[test]
    fn parses_polygons_and_names() {
        let features = parse_feature_collection(TWO_FEATURES).expect("parse");
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "Quebec");
        assert_eq!(features[0].join_key(), "quebec");
        assert!(matches!(features[0].geometry, GeoGeometry::Polygon(_)));
        assert_eq!(features[1].name, "7");
        assert_eq!(features[1].geometry.polygons().len(), 1);
    }

    #[test]
    fn bounds_cover_all_rings() {
        let features = parse_feature_collection(TWO_FEATURES).expect("parse");
        let b = features[0].geometry.bounds();
        assert_eq!(b.min, [-79.0, 45.0]);
        assert_eq!(b.max, [-57.0, 62.0]);
    }

    #[test]
    fn null_geometry_is_skipped() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Ghost"},"geometry":null}]}"#;
        assert!(parse_feature_collection(payload).expect("parse").is_empty());
    }

    #[test]
    fn rejects_points_and_non_collections() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}]}"#;
        assert!(matches!(
            parse_feature_collection(payload),
            Err(GeoError::InvalidFeature { index: 0, .. })
        ));
        assert!(matches!(
            parse_feature_collection(r#"{"type":"Feature"}"#),
            Err(GeoError::NotAFeatureCollection)
        ));
        assert!(matches!(
            parse_feature_collection("{"),
            Err(GeoError::Json(_))
        ));
    }
}
