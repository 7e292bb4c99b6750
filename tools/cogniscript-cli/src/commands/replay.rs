//! Replay a recorded session.

use std::path::PathBuf;
use std::sync::Arc;

use cogniscript_analysis_engine::{
    replay_observations, AnalysisSession, DetectionScheduler, JsonlHandSource, ReplayDetector,
};
use cogniscript_common::clock::SessionClock;
use cogniscript_common::config::AppConfig;
use cogniscript_render_engine::export::{export_surface, ExportLayers};
use cogniscript_render_engine::overlay::render_overlay;
use cogniscript_scene_model::geometry::FrameSize;

pub struct ReplayArgs {
    pub observations: PathBuf,
    pub detections: Option<PathBuf>,
    pub source: (u32, u32),
    pub surface: (u32, u32),
    pub output: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

pub async fn run(config: AppConfig, args: ReplayArgs) -> anyhow::Result<()> {
    let clock = SessionClock::start();
    let mut source = JsonlHandSource::open(&args.observations)?;

    let mut session = AnalysisSession::new(config.analysis.clone());
    if let Some(path) = &args.detections {
        let detector = ReplayDetector::open(path)?;
        tracing::info!(records = detector.len(), "Replaying recorded detections");
        let scheduler = DetectionScheduler::on_current_runtime(
            Arc::new(detector),
            config.analysis.detection_interval_ms,
        )?;
        session = session.with_scheduler(scheduler);
    }

    let surface_size = FrameSize::new(args.surface.0, args.surface.1);
    session.set_source_size(FrameSize::new(args.source.0, args.source.1));
    session.resize_surface(surface_size);

    let frames = replay_observations(&mut session, &mut source).await?;

    let overlay = session
        .overlay_frame(&config.overlay)
        .map(|frame| render_overlay(&frame, surface_size));

    if let Some(path) = &args.output {
        export_surface(session.surface(), None, ExportLayers::InkOnly, path)?;
        println!("Ink written to {}", path.display());
    }
    if let Some(path) = &args.overlay {
        export_surface(
            session.surface(),
            overlay.as_ref(),
            ExportLayers::InkOverOverlay,
            path,
        )?;
        println!("Overlay written to {}", path.display());
    }

    let summary = session.end_session();

    println!("Replayed {frames} frames in {} ms (started {})", clock.elapsed_ms(), clock.epoch_wall());
    println!("  Duration: {:.2}s", SessionClock::ms_to_secs(summary.duration_ms()));
    println!("  Hand coverage: {:.1}%", summary.hand_coverage() * 100.0);
    println!("  Engaged frames: {}", summary.engaged_frames);
    println!("  Segments drawn: {}", summary.segments_drawn);
    println!("  Hesitations: {}", summary.hesitation_count);
    println!(
        "  Detection refreshes: {} ({} failed)",
        summary.detection_refreshes, summary.failed_detections
    );
    println!("  Tool: {}", summary.scene.tool_label);

    if let Some(path) = &args.summary {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
