//! Show recording statistics.

use std::path::PathBuf;

use cogniscript_common::clock::SessionClock;
use cogniscript_scene_model::landmark::parse_observations;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let observations = parse_observations(&content)?;

    let frames = observations.len();
    let hand_frames = observations.iter().filter(|o| o.has_hand()).count();
    let first = observations.first().map(|o| o.timestamp_ms).unwrap_or(0);
    let last = observations.last().map(|o| o.timestamp_ms).unwrap_or(0);
    let duration_ms = last.saturating_sub(first);
    let out_of_order = observations
        .windows(2)
        .filter(|w| w[1].timestamp_ms <= w[0].timestamp_ms)
        .count();

    println!("Recording: {}", path.display());
    println!("  Frames: {frames}");
    println!(
        "  Hand visible: {hand_frames} ({:.1}%)",
        if frames == 0 {
            0.0
        } else {
            hand_frames as f64 * 100.0 / frames as f64
        }
    );
    println!("  Duration: {:.2}s", SessionClock::ms_to_secs(duration_ms));
    if duration_ms > 0 && frames > 1 {
        println!(
            "  Mean frame rate: {:.1} fps",
            (frames - 1) as f64 / SessionClock::ms_to_secs(duration_ms)
        );
    }
    if out_of_order > 0 {
        println!("  Non-increasing timestamps: {out_of_order}");
    }

    Ok(())
}
