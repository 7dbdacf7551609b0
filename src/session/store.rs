use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};

use crate::error::{Result, RouteArtError};
use crate::geo::GeoFix;

use super::model::Session;

/// In-memory session with explicit checkpoints to its JSON file.
///
/// Mutations only touch memory; nothing reaches disk until
/// [`checkpoint`](Self::checkpoint) rewrites the whole file.
pub struct SessionStore {
    path: PathBuf,
    session: Session,
}

impl SessionStore {
    /// Discard whatever was on disk and begin a fresh session.
    pub fn start(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            session: Session::default(),
        };
        store.reset();
        store.checkpoint()?;
        Ok(store)
    }

    /// Resume the session stored at `path`, or begin one if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Self::start(path);
        }

        let contents = fs::read_to_string(&path)?;
        let session: Session = serde_json::from_str(&contents)?;
        debug!(
            "Loaded session from {} with {} fixes",
            path.display(),
            session.fixes.len()
        );
        Ok(Self { path, session })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reference_center(&self) -> Option<GeoFix> {
        self.session.reference_center
    }

    /// The center is fixed for the rest of the session once chosen.
    pub fn set_reference_center(&mut self, center: GeoFix) -> Result<()> {
        if self.session.reference_center.is_some() {
            return Err(RouteArtError::CenterAlreadySet);
        }
        self.session.reference_center = Some(center);
        info!(
            "Reference center set to ({}, {})",
            center.latitude, center.longitude
        );
        Ok(())
    }

    pub fn append_fix(&mut self, fix: GeoFix) {
        self.session.fixes.push(fix);
    }

    pub fn fixes(&self) -> &[GeoFix] {
        &self.session.fixes
    }

    pub fn reset(&mut self) {
        self.session = Session::begin(Utc::now());
    }

    pub fn checkpoint(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(&self.session)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }
}
