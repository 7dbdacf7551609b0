use crate::error::{Result, RouteArtError};

use super::GeoFix;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 20;
/// Exclusive lower bound for map width and height.
pub const MIN_DIMENSION: u32 = 50;
/// Inclusive upper bound for map width and height.
pub const MAX_DIMENSION: u32 = 10_000;

/// Validated map viewport shared by background fetches and route renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: GeoFix,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl MapView {
    pub fn new(center: GeoFix, zoom: u8, width: u32, height: u32) -> Result<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(RouteArtError::invalid(
                "zoom",
                format!("must be between {MIN_ZOOM} and {MAX_ZOOM}, got {zoom}"),
            ));
        }

        Ok(Self {
            center,
            zoom,
            width,
            height,
        })
    }
}

fn check_dimension(name: &'static str, value: u32) -> Result<()> {
    if value <= MIN_DIMENSION || value > MAX_DIMENSION {
        return Err(RouteArtError::invalid(
            name,
            format!("must be greater than {MIN_DIMENSION} and at most {MAX_DIMENSION}, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> GeoFix {
        GeoFix::new(40.7128, -74.006)
    }

    #[test]
    fn width_bounds() {
        assert!(matches!(
            MapView::new(center(), 15, 50, 400),
            Err(RouteArtError::InvalidParameter { name: "width", .. })
        ));
        assert!(MapView::new(center(), 15, 51, 400).is_ok());
        assert!(MapView::new(center(), 15, 10_000, 400).is_ok());
        assert!(MapView::new(center(), 15, 10_001, 400).is_err());
    }

    #[test]
    fn height_bounds() {
        assert!(matches!(
            MapView::new(center(), 15, 400, 50),
            Err(RouteArtError::InvalidParameter { name: "height", .. })
        ));
        assert!(MapView::new(center(), 15, 400, 10_000).is_ok());
    }

    #[test]
    fn zoom_bounds() {
        assert!(matches!(
            MapView::new(center(), 0, 400, 400),
            Err(RouteArtError::InvalidParameter { name: "zoom", .. })
        ));
        assert!(MapView::new(center(), 1, 400, 400).is_ok());
        assert!(MapView::new(center(), 20, 400, 400).is_ok());
        assert!(MapView::new(center(), 21, 400, 400).is_err());
    }
}
