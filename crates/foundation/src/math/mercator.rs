/// Spherical Mercator on a unit sphere (radians).
///
/// Screen-space conventions (y down) are applied by the caller.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.05112878;

pub fn is_mercator_lat_valid(lat_deg: f64) -> bool {
    lat_deg.is_finite() && (-MERCATOR_MAX_LAT_DEG..=MERCATOR_MAX_LAT_DEG).contains(&lat_deg)
}

pub fn mercator_x(lon_deg: f64) -> f64 {
    lon_deg.to_radians()
}

pub fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    (0.5 * (std::f64::consts::FRAC_PI_2 + lat)).tan().ln()
}

#[cfg(test)]
mod tests {
    use super::{MERCATOR_MAX_LAT_DEG, is_mercator_lat_valid, mercator_x, mercator_y};

    #[test]
    fn equator_and_prime_meridian_map_to_origin() {
        assert!(mercator_x(0.0).abs() < 1e-12);
        assert!(mercator_y(0.0).abs() < 1e-12);
    }

    #[test]
    fn y_grows_northward_and_clamps_at_poles() {
        assert!(mercator_y(60.0) > mercator_y(45.0));
        assert_eq!(mercator_y(90.0), mercator_y(MERCATOR_MAX_LAT_DEG));
        assert!(!is_mercator_lat_valid(89.0));
        assert!(is_mercator_lat_valid(75.0));
    }
}
