use formats::{GeoFeature, GeoPoint};
use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use foundation::math::mercator::{mercator_x, mercator_y};
use foundation::viewport::PlotArea;

/// Spherical Mercator scaled and translated so a set of features fills a
/// plot area while keeping its aspect ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MercatorFit {
    scale: f64,
    offset: Vec2,
}

impl MercatorFit {
    /// `None` when the features have no extent to fit.
    pub fn fit<'a>(features: impl IntoIterator<Item = &'a GeoFeature>, area: PlotArea) -> Option<Self> {
        let mut projected = Aabb2::empty();
        for feature in features {
            for polygon in feature.geometry.polygons() {
                for ring in polygon {
                    for p in ring {
                        let raw = raw_project(*p);
                        projected.extend([raw.x, raw.y]);
                    }
                }
            }
        }
        if projected.is_empty() || projected.width() <= 0.0 || projected.height() <= 0.0 {
            return None;
        }

        let scale = (area.width / projected.width()).min(area.height / projected.height());
        let [cx, cy] = projected.center();
        let offset = Vec2::new(
            area.x + area.width / 2.0 - cx * scale,
            area.y + area.height / 2.0 - cy * scale,
        );
        Some(Self { scale, offset })
    }

    pub fn project(&self, p: GeoPoint) -> Vec2 {
        raw_project(p).scale(self.scale) + self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Unit Mercator with y pointing down.
fn raw_project(p: GeoPoint) -> Vec2 {
    Vec2::new(mercator_x(p.lon_deg), -mercator_y(p.lat_deg))
}
