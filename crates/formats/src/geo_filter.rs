use crate::geo::{GeoFeature, GeoGeometry, Polygon};

/// Trims far-north polygons from a boundary feature.
///
/// A polygon is kept when its outer ring has at least one vertex strictly
/// below `limit_deg`, i.e. some of its area lies under the bound. The result
/// is always a MultiPolygon of the kept polygons, or `None` when nothing
/// qualifies.
pub fn filter_by_latitude(feature: GeoFeature, limit_deg: f64) -> Option<GeoFeature> {
    let polygons: Vec<Polygon> = match feature.geometry {
        GeoGeometry::Polygon(p) => vec![p],
        GeoGeometry::MultiPolygon(ps) => ps,
    };
    let kept: Vec<Polygon> = polygons
        .into_iter()
        .filter(|p| has_area_below(p, limit_deg))
        .collect();
    if kept.is_empty() {
        return None;
    }
    Some(GeoFeature {
        geometry: GeoGeometry::MultiPolygon(kept),
        ..feature
    })
}

fn has_area_below(polygon: &Polygon, limit_deg: f64) -> bool {
    polygon
        .first()
        .is_some_and(|outer| outer.iter().any(|p| p.lat_deg < limit_deg))
}

#[cfg(test)]
mod tests {
    use super::filter_by_latitude;
    use crate::geo::{GeoFeature, GeoGeometry, GeoPoint, Polygon};

    fn square(lat_min: f64, lat_max: f64) -> Polygon {
        vec![vec![
            GeoPoint::new(-100.0, lat_min),
            GeoPoint::new(-90.0, lat_min),
            GeoPoint::new(-90.0, lat_max),
            GeoPoint::new(-100.0, lat_max),
            GeoPoint::new(-100.0, lat_min),
        ]]
    }

    #[test]
    fn polygon_entirely_above_limit_is_dropped() {
        let f = GeoFeature::new("Arctic", GeoGeometry::Polygon(square(78.0, 82.0)));
        assert!(filter_by_latitude(f, 75.0).is_none());
    }

    #[test]
    fn polygon_with_area_below_becomes_multipolygon() {
        let f = GeoFeature::new("Nunavut", GeoGeometry::Polygon(square(60.0, 80.0)));
        let out = filter_by_latitude(f, 75.0).expect("kept");
        assert_eq!(out.name, "Nunavut");
        match out.geometry {
            GeoGeometry::MultiPolygon(ps) => assert_eq!(ps.len(), 1),
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }

    #[test]
    fn multipolygon_keeps_only_qualifying_polygons() {
        let f = GeoFeature::new(
            "Nunavut",
            GeoGeometry::MultiPolygon(vec![
                square(62.0, 70.0),
                square(76.0, 83.0),
                square(70.0, 79.0),
            ]),
        );
        let out = filter_by_latitude(f, 75.0).expect("kept");
        let polys = out.geometry.polygons();
        assert_eq!(polys.len(), 2);
        assert_eq!(polys[0][0][0].lat_deg, 62.0);
        assert_eq!(polys[1][0][0].lat_deg, 70.0);
    }

    #[test]
    fn vertex_exactly_on_limit_does_not_qualify() {
        let f = GeoFeature::new("Edge", GeoGeometry::Polygon(square(75.0, 80.0)));
        assert!(filter_by_latitude(f, 75.0).is_none());
    }
}
