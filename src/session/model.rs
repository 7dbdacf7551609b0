use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoFix;

/// One walking session as written to the scratch state file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "desired_map_original_center")]
    pub reference_center: Option<GeoFix>,
    #[serde(rename = "drawing_points", default)]
    pub fixes: Vec<GeoFix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn begin(now: DateTime<Utc>) -> Self {
        Self {
            reference_center: None,
            fixes: Vec::new(),
            started_at: Some(now),
        }
    }
}
