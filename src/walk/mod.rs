pub mod loop_worker;

pub use loop_worker::{record_walk, WalkStop, WalkSummary};
