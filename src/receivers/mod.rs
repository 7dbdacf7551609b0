pub mod file;
pub mod socket;

pub use file::FileReceiver;
pub use socket::SocketReceiver;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::config::ReceiverConfig;
use crate::error::{Result, RouteArtError};
use crate::geo::GeoFix;

/// Source of raw location payloads, picked once from configuration.
pub enum GpsReceiver {
    File(FileReceiver),
    Socket(SocketReceiver),
}

impl GpsReceiver {
    /// For the socket variant this waits for the phone to connect.
    pub async fn from_config(config: &ReceiverConfig) -> Result<Self> {
        match config {
            ReceiverConfig::File { path, wait } => {
                Ok(Self::File(FileReceiver::new(path.clone(), *wait)))
            }
            ReceiverConfig::Socket { addr } => Ok(Self::Socket(SocketReceiver::listen(*addr).await?)),
        }
    }

    pub async fn get_raw_location_data(&mut self) -> Result<String> {
        match self {
            Self::File(receiver) => receiver.get_raw_location_data().await,
            Self::Socket(receiver) => receiver.get_raw_location_data().await,
        }
    }

    pub async fn next_fix(&mut self) -> Result<GeoFix> {
        let raw = self.get_raw_location_data().await?;
        parse_location(&raw)
    }
}

#[derive(Deserialize)]
struct Payload {
    network: NetworkFix,
}

#[derive(Deserialize)]
struct NetworkFix {
    #[serde(deserialize_with = "coordinate")]
    latitude: f64,
    #[serde(deserialize_with = "coordinate")]
    longitude: f64,
}

/// Some phone apps send coordinates as strings.
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

/// Decode a receiver payload such as
/// `{'network': {'latitude': 51.5, 'longitude': -0.12}}` into a fix.
pub fn parse_location(raw: &str) -> Result<GeoFix> {
    let normalized = raw.trim().trim_matches('\'').replace('\'', "\"");
    let payload: Payload =
        serde_json::from_str(&normalized).map_err(|err| RouteArtError::MalformedFix {
            raw: raw.to_string(),
            reason: err.to_string(),
        })?;

    let NetworkFix {
        latitude,
        longitude,
    } = payload.network;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(RouteArtError::MalformedFix {
            raw: raw.to_string(),
            reason: format!("coordinate ({latitude}, {longitude}) is out of range"),
        });
    }
    Ok(GeoFix::new(latitude, longitude))
}
