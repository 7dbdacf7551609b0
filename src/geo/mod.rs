pub mod projection;
pub mod view;

pub use projection::{ground_resolution, project, EARTH_RADIUS_M};
pub use view::MapView;

use serde::{Deserialize, Serialize};

/// A single recorded coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
