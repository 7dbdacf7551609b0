use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::receivers::GpsReceiver;
use crate::session::SessionStore;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStop {
    Cancelled,
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub recorded: usize,
    pub total: usize,
    pub stop: WalkStop,
}

/// Record fixes into `store` until cancelled or `max_fixes` new fixes are in.
///
/// The session is checkpointed after every fix. Receiver and parse errors
/// end the walk and are returned as-is; fixes recorded before the error
/// are already on disk.
pub async fn record_walk(
    receiver: &mut GpsReceiver,
    store: &mut SessionStore,
    cancel_token: CancellationToken,
    max_fixes: Option<usize>,
) -> Result<WalkSummary> {
    if store.reference_center().is_none() {
        log_warn!("Walking without a reference center; renders will need one");
    }

    let mut recorded = 0;
    let stop = loop {
        if max_fixes.is_some_and(|max| recorded >= max) {
            break WalkStop::LimitReached;
        }

        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("walk loop shutting down");
                break WalkStop::Cancelled;
            }
            fix = receiver.next_fix() => {
                let fix = fix?;
                store.append_fix(fix);
                store.checkpoint()?;
                recorded += 1;
                log_debug!(
                    "Recorded fix #{} at ({}, {})",
                    store.fixes().len(),
                    fix.latitude,
                    fix.longitude
                );
            }
        }
    };

    let summary = WalkSummary {
        recorded,
        total: store.fixes().len(),
        stop,
    };
    log_info!(
        "Walk stopped ({:?}) after {} new fixes, {} total",
        summary.stop,
        summary.recorded,
        summary.total
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteArtError;
    use crate::geo::GeoFix;
    use crate::receivers::FileReceiver;
    use crate::utils::scratch_dir;
    use std::path::PathBuf;
    use std::time::Duration;

    fn replay(lines: &[&str]) -> (GpsReceiver, PathBuf) {
        let dir = scratch_dir();
        let replay = dir.join("walk.txt");
        std::fs::write(&replay, lines.join("\n")).unwrap();
        (
            GpsReceiver::File(FileReceiver::new(replay, Duration::ZERO)),
            dir.join("state.json"),
        )
    }

    const LINES: [&str; 3] = [
        "{'network': {'latitude': 10.0, 'longitude': 20.0}}",
        "{'network': {'latitude': 10.0001, 'longitude': 20.0}}",
        "{'network': {'latitude': 10.0002, 'longitude': 20.0001}}",
    ];

    #[tokio::test]
    async fn stops_at_limit() {
        let (mut receiver, state) = replay(&LINES);
        let mut store = SessionStore::start(&state).unwrap();

        let summary = record_walk(&mut receiver, &mut store, CancellationToken::new(), Some(2))
            .await
            .unwrap();
        assert_eq!(summary.stop, WalkStop::LimitReached);
        assert_eq!(summary.recorded, 2);
        assert_eq!(
            SessionStore::open(&state).unwrap().fixes(),
            &[GeoFix::new(10.0, 20.0), GeoFix::new(10.0001, 20.0)]
        );
    }

    #[tokio::test]
    async fn exhausted_replay_surfaces_error_after_saving() {
        let (mut receiver, state) = replay(&LINES);
        let mut store = SessionStore::start(&state).unwrap();

        let result = record_walk(&mut receiver, &mut store, CancellationToken::new(), None).await;
        assert!(matches!(result, Err(RouteArtError::DataExhausted { line: 3, .. })));
        assert_eq!(SessionStore::open(&state).unwrap().fixes().len(), 3);
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_reading() {
        let (mut receiver, state) = replay(&LINES);
        let mut store = SessionStore::start(&state).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let summary = record_walk(&mut receiver, &mut store, token, None).await.unwrap();
        assert_eq!(summary.stop, WalkStop::Cancelled);
        assert_eq!(summary.recorded, 0);
        assert!(store.fixes().is_empty());
    }

    #[tokio::test]
    async fn malformed_line_ends_walk() {
        let (mut receiver, state) = replay(&[LINES[0], "garbage"]);
        let mut store = SessionStore::start(&state).unwrap();

        let result = record_walk(&mut receiver, &mut store, CancellationToken::new(), None).await;
        assert!(matches!(result, Err(RouteArtError::MalformedFix { .. })));
        assert_eq!(store.fixes().len(), 1);
    }

    #[tokio::test]
    async fn resumes_existing_session() {
        let (mut receiver, state) = replay(&LINES);
        let mut store = SessionStore::start(&state).unwrap();
        store.append_fix(GeoFix::new(0.0, 0.0));

        let summary = record_walk(&mut receiver, &mut store, CancellationToken::new(), Some(1))
            .await
            .unwrap();
        assert_eq!(summary.recorded, 1);
        assert_eq!(summary.total, 2);
    }
}
