//! Web-Mercator style projection of fixes onto a map canvas.
//!
//! The static map provider renders tiles with the same ground resolution,
//! so a route projected here lines up with a background fetched for the
//! same center and zoom.

use std::f64::consts::PI;

use super::GeoFix;

/// WGS84 equatorial radius.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Fixed ground distance of one degree of latitude.
const METERS_PER_DEGREE_LATITUDE: f64 = 111_139.0;

/// Meters covered by one pixel at `latitude` and `zoom` (256px tiles).
pub fn ground_resolution(latitude: f64, zoom: u8) -> f64 {
    PI * EARTH_RADIUS_M * latitude.to_radians().cos() / 2f64.powi(i32::from(zoom) + 8)
}

/// Pixel position of `fix` on a `canvas_width` x `canvas_height` canvas
/// centered on `center`. North is up.
pub fn project(
    fix: GeoFix,
    center: GeoFix,
    zoom: u8,
    canvas_width: u32,
    canvas_height: u32,
) -> (f64, f64) {
    let lat_cos = center.latitude.to_radians().cos();
    let resolution = ground_resolution(center.latitude, zoom);

    let east_m = (fix.longitude - center.longitude) * EARTH_RADIUS_M * (PI / 180.0) * lat_cos;
    let north_m = (fix.latitude - center.latitude) * METERS_PER_DEGREE_LATITUDE;

    let x = f64::from(canvas_width) / 2.0 + east_m / resolution;
    let y = f64::from(canvas_height) / 2.0 - north_m / resolution;
    (x, y)
}
