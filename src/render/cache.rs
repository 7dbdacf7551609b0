use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Result;
use crate::geo::{GeoFix, MapView};
use crate::utils::Fingerprint;

use super::rasterizer::rasterize;

/// On-disk memo of route renders, one PNG per distinct input set.
pub struct RouteCache {
    dir: PathBuf,
}

impl RouteCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, fixes: &[GeoFix], view: &MapView, thickness: u32) -> PathBuf {
        self.dir
            .join(format!("route-{}.png", route_fingerprint(fixes, view, thickness)))
    }

    /// Rasterize the route unless an identical render already exists.
    pub fn render(&self, fixes: &[GeoFix], view: &MapView, thickness: u32) -> Result<PathBuf> {
        let path = self.path_for(fixes, view, thickness);
        if path.exists() {
            debug!("Reusing cached route render {}", path.display());
            return Ok(path);
        }

        fs::create_dir_all(&self.dir)?;
        let canvas = rasterize(
            fixes,
            view.center,
            view.zoom,
            view.width,
            view.height,
            thickness,
        );
        canvas.save(&path)?;
        info!(
            "Rendered {} fixes to {} ({}x{}, zoom {})",
            fixes.len(),
            path.display(),
            view.width,
            view.height,
            view.zoom
        );
        Ok(path)
    }
}

fn route_fingerprint(fixes: &[GeoFix], view: &MapView, thickness: u32) -> String {
    let mut fingerprint = Fingerprint::new()
        .uint(u64::from(view.width))
        .uint(u64::from(view.height))
        .float(view.center.latitude)
        .float(view.center.longitude)
        .uint(u64::from(view.zoom))
        .uint(u64::from(thickness))
        .uint(fixes.len() as u64);
    for fix in fixes {
        fingerprint = fingerprint.float(fix.latitude).float(fix.longitude);
    }
    fingerprint.finish()
}
