//! Offline replay of a recorded session.

use cogniscript_common::clock::TimestampMs;
use cogniscript_common::error::CogniscriptResult;

use crate::session::AnalysisSession;
use crate::sources::HandPoseSource;

/// Feed every observation from `source` through `session`.
///
/// Frames are processed at their recorded timestamps. Each detection
/// request is awaited before the next frame, so a replay produces the same
/// scene sequence every run. Returns the number of frames processed; the
/// session is left open for overlay and export.
pub async fn replay_observations(
    session: &mut AnalysisSession,
    source: &mut dyn HandPoseSource,
) -> CogniscriptResult<u64> {
    tracing::info!(source = %source.name(), "Replay started");

    let mut frames = 0u64;
    let mut last_t: Option<TimestampMs> = None;

    while let Some(observation) = source.poll()? {
        let t = observation.timestamp_ms;
        if last_t.is_some_and(|last| t <= last) {
            tracing::warn!(t, previous = ?last_t, "Non-increasing observation timestamp");
        }

        session.process_observation(&observation, t);
        session.settle_detection(t).await;

        frames += 1;
        last_t = Some(t);
    }

    tracing::info!(frames, "Replay finished");
    Ok(frames)
}
