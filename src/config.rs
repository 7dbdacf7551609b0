//! Runtime configuration, read from the environment at startup. Receiver
//! settings are kept raw and validated when a walk starts.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;

use crate::error::{Result, RouteArtError};

pub const DEFAULT_MAP_BASE_URL: &str = "https://maps.geoapify.com/v1/staticmap";

const LOG_LEVELS: [&str; 5] = ["debug", "info", "warning", "error", "critical"];

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiverConfig {
    /// Replay recorded payloads line by line with a simulated wait.
    File { path: PathBuf, wait: Duration },
    /// Accept one phone connection and read live payloads from it.
    Socket { addr: SocketAddr },
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub base_url: String,
    pub style: String,
    pub api_key: String,
}

/// Raw receiver variables, validated only when a walk asks for them.
#[derive(Debug, Clone, Default)]
struct ReceiverVars {
    kind: Option<String>,
    file: Option<String>,
    wait: Option<String>,
    ip: Option<String>,
    port: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: LevelFilter,
    pub map: MapConfig,
    pub session_file: PathBuf,
    pub cache_dir: PathBuf,
    pub line_thickness: u32,
    receiver_vars: ReceiverVars,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        check_dotenv(dotenvy::dotenv().map(|_| ()))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_level = parse_log_level(get("LOG_LEVEL").as_deref().unwrap_or("warning"))?;

        let map = MapConfig {
            base_url: get("MAP_BASE_URL").unwrap_or_else(|| DEFAULT_MAP_BASE_URL.to_string()),
            style: get("MAP_STYLE").unwrap_or_else(|| "osm-carto".to_string()),
            api_key: get("MAP_API_KEY").unwrap_or_default(),
        };

        let line_thickness = match get("LINE_THICKNESS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|value| *value >= 1)
                .ok_or_else(|| {
                    RouteArtError::config("LINE_THICKNESS", format!("must be a whole number >= 1, got {raw:?}"))
                })?,
            None => 3,
        };

        Ok(Self {
            log_level,
            map,
            session_file: get("SESSION_FILE").map(PathBuf::from).unwrap_or_else(|| "state.json".into()),
            cache_dir: get("CACHE_DIR").map(PathBuf::from).unwrap_or_else(|| "cache".into()),
            line_thickness,
            receiver_vars: ReceiverVars {
                kind: get("RECEIVER_FUNC"),
                file: get("EXAMPLE_GPS_DATA_FILE_NAME"),
                wait: get("PRETEND_SOCKET_WAIT_TIME"),
                ip: get("SOCKET_HOST_IP"),
                port: get("SOCKET_HOST_PORT"),
            },
        })
    }

    /// Receiver settings; only the walk needs these, so they are checked here.
    pub fn receiver(&self) -> Result<ReceiverConfig> {
        let vars = &self.receiver_vars;
        match vars.kind.as_deref().unwrap_or("file") {
            "file" => {
                let path = vars.file.clone().ok_or_else(|| {
                    RouteArtError::config(
                        "EXAMPLE_GPS_DATA_FILE_NAME",
                        "must be provided when using the file receiver",
                    )
                })?;
                let wait = parse_wait(vars.wait.as_deref().unwrap_or("3"))?;
                Ok(ReceiverConfig::File {
                    path: PathBuf::from(path),
                    wait,
                })
            }
            "socket" => Ok(ReceiverConfig::Socket {
                addr: parse_socket_addr(vars.ip.clone(), vars.port.clone())?,
            }),
            other => Err(RouteArtError::config(
                "RECEIVER_FUNC",
                format!("must be one of (\"file\", \"socket\"), got {other:?}"),
            )),
        }
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn check_dotenv(result: std::result::Result<(), dotenvy::Error>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(RouteArtError::config(".env", format!("could not be loaded: {err}"))),
    }
}

fn parse_log_level(raw: &str) -> Result<LevelFilter> {
    match raw.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warning" => Ok(LevelFilter::Warn),
        // `log` has no level above error
        "error" | "critical" => Ok(LevelFilter::Error),
        _ => Err(RouteArtError::config(
            "LOG_LEVEL",
            format!("must be one of {LOG_LEVELS:?}, got {raw:?}"),
        )),
    }
}

fn parse_wait(raw: &str) -> Result<Duration> {
    let seconds: f64 = raw.trim().parse().map_err(|_| {
        RouteArtError::config("PRETEND_SOCKET_WAIT_TIME", format!("must be a number, got {raw:?}"))
    })?;
    if !(0.1..=1000.0).contains(&seconds) {
        return Err(RouteArtError::config(
            "PRETEND_SOCKET_WAIT_TIME",
            format!("must be between 0.1 & 1000, got {seconds}"),
        ));
    }
    Ok(Duration::from_secs_f64(seconds))
}

fn parse_socket_addr(ip: Option<String>, port: Option<String>) -> Result<SocketAddr> {
    let ip = ip.ok_or_else(|| {
        RouteArtError::config("SOCKET_HOST_IP", "must be provided when using the socket receiver")
    })?;
    let port = port.ok_or_else(|| {
        RouteArtError::config("SOCKET_HOST_PORT", "must be provided when using the socket receiver")
    })?;

    let ip: IpAddr = ip
        .trim()
        .parse()
        .map_err(|_| RouteArtError::config("SOCKET_HOST_IP", format!("is not an IP address: {ip:?}")))?;
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|_| RouteArtError::config("SOCKET_HOST_PORT", format!("is not a port: {port:?}")))?;
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn file_receiver_defaults() {
        let cfg = config(&[("EXAMPLE_GPS_DATA_FILE_NAME", "walk.txt")]).unwrap();
        assert_eq!(cfg.log_level, LevelFilter::Warn);
        assert_eq!(
            cfg.receiver().unwrap(),
            ReceiverConfig::File {
                path: PathBuf::from("walk.txt"),
                wait: Duration::from_secs(3),
            }
        );
        assert_eq!(cfg.map.base_url, DEFAULT_MAP_BASE_URL);
        assert_eq!(cfg.map.style, "osm-carto");
        assert_eq!(cfg.session_file, PathBuf::from("state.json"));
        assert_eq!(cfg.line_thickness, 3);
    }

    #[test]
    fn file_receiver_requires_path() {
        assert!(matches!(
            config(&[]).unwrap().receiver(),
            Err(RouteArtError::Config { key: "EXAMPLE_GPS_DATA_FILE_NAME", .. })
        ));
    }

    #[test]
    fn wait_time_is_bounded() {
        let base = ("EXAMPLE_GPS_DATA_FILE_NAME", "walk.txt");
        let receiver = |raw: &'static str| {
            config(&[base, ("PRETEND_SOCKET_WAIT_TIME", raw)]).unwrap().receiver()
        };
        assert!(receiver("0.05").is_err());
        assert!(receiver("1001").is_err());
        assert!(receiver("soon").is_err());
        assert!(matches!(receiver("0.1").unwrap(), ReceiverConfig::File { wait, .. } if (wait.as_secs_f64() - 0.1).abs() < 1e-9));
    }

    #[test]
    fn socket_receiver() {
        let cfg = config(&[
            ("RECEIVER_FUNC", "socket"),
            ("SOCKET_HOST_IP", "127.0.0.1"),
            ("SOCKET_HOST_PORT", "5050"),
        ])
        .unwrap();
        assert_eq!(
            cfg.receiver().unwrap(),
            ReceiverConfig::Socket {
                addr: "127.0.0.1:5050".parse().unwrap()
            }
        );

        assert!(matches!(
            config(&[("RECEIVER_FUNC", "socket"), ("SOCKET_HOST_IP", "127.0.0.1")])
                .unwrap()
                .receiver(),
            Err(RouteArtError::Config { key: "SOCKET_HOST_PORT", .. })
        ));
    }

    #[test]
    fn rejects_unknown_choices() {
        assert!(matches!(
            config(&[("RECEIVER_FUNC", "bluetooth")]).unwrap().receiver(),
            Err(RouteArtError::Config { key: "RECEIVER_FUNC", .. })
        ));
        assert!(matches!(
            config(&[("EXAMPLE_GPS_DATA_FILE_NAME", "w"), ("LOG_LEVEL", "loud")]),
            Err(RouteArtError::Config { key: "LOG_LEVEL", .. })
        ));
    }

    #[test]
    fn log_levels_map_onto_log_crate() {
        let base = ("EXAMPLE_GPS_DATA_FILE_NAME", "walk.txt");
        let level = |raw: &'static str| config(&[base, ("LOG_LEVEL", raw)]).unwrap().log_level;
        assert_eq!(level("DEBUG"), LevelFilter::Debug);
        assert_eq!(level("info"), LevelFilter::Info);
        assert_eq!(level("critical"), LevelFilter::Error);
    }

    #[test]
    fn empty_environment_configures_everything_but_the_receiver() {
        let cfg = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.log_level, LevelFilter::Warn);
        assert_eq!(cfg.map.style, "osm-carto");
        assert_eq!(cfg.cache_dir, PathBuf::from("cache"));
        assert_eq!(cfg.line_thickness, 3);
        assert!(matches!(
            cfg.receiver(),
            Err(RouteArtError::Config { key: "EXAMPLE_GPS_DATA_FILE_NAME", .. })
        ));
    }

    #[test]
    fn only_a_missing_dotenv_is_ignored() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(check_dotenv(Err(dotenvy::Error::Io(missing))).is_ok());
        assert!(check_dotenv(Ok(())).is_ok());

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            check_dotenv(Err(dotenvy::Error::Io(denied))),
            Err(RouteArtError::Config { key: ".env", .. })
        ));
        assert!(matches!(
            check_dotenv(Err(dotenvy::Error::LineParse("KEY=\"open".into(), 4))),
            Err(RouteArtError::Config { key: ".env", .. })
        ));
    }
}
