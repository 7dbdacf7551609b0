pub mod fingerprint;
pub mod logging;

pub use fingerprint::Fingerprint;

/// Fresh, empty scratch directory for tests touching the filesystem.
#[cfg(test)]
pub(crate) fn scratch_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("routeart-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
