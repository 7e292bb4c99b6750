//! Throttled, non-blocking object detection.
//!
//! At most one detector call is in flight. Its result is picked up by a
//! later `poll` from the tracking loop; the loop never waits on it. A
//! finished result is accepted even if the scene has moved on since the
//! request was made.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use cogniscript_common::clock::{IntervalGate, TimestampMs};
use cogniscript_common::error::{CogniscriptError, CogniscriptResult};
use cogniscript_scene_model::detection::DetectedObject;

use crate::sources::{FrameRef, ObjectDetector};

/// A completed detection request.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRefresh {
    /// When the request was launched.
    pub requested_ms: TimestampMs,
    /// Detected objects; empty when the call failed.
    pub objects: Vec<DetectedObject>,
    pub failed: bool,
}

type DetectionResult = CogniscriptResult<Vec<DetectedObject>>;

struct InFlight {
    requested_ms: TimestampMs,
    rx: oneshot::Receiver<DetectionResult>,
}

/// Launches detector calls no more often than a minimum interval.
pub struct DetectionScheduler {
    detector: Arc<dyn ObjectDetector>,
    runtime: Handle,
    gate: IntervalGate,
    in_flight: Option<InFlight>,
    launched: u64,
    failures: u64,
}

impl DetectionScheduler {
    pub fn new(detector: Arc<dyn ObjectDetector>, interval_ms: u64, runtime: Handle) -> Self {
        Self {
            detector,
            runtime,
            gate: IntervalGate::new(interval_ms),
            in_flight: None,
            launched: 0,
            failures: 0,
        }
    }

    /// Build a scheduler that spawns onto the Tokio runtime of the caller.
    pub fn on_current_runtime(
        detector: Arc<dyn ObjectDetector>,
        interval_ms: u64,
    ) -> CogniscriptResult<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            CogniscriptError::detection(format!("detection needs a Tokio runtime: {e}"))
        })?;
        Ok(Self::new(detector, interval_ms, runtime))
    }

    /// Collect a finished request, then launch a new one if due.
    ///
    /// Never blocks. A new request only starts when nothing is in flight
    /// and the interval has elapsed since the previous launch.
    pub fn poll(&mut self, now_ms: TimestampMs, frame: FrameRef) -> Option<DetectionRefresh> {
        let completed = self.take_completed();
        if self.in_flight.is_none() && self.gate.try_fire(now_ms) {
            self.launch(now_ms, frame);
        }
        completed
    }

    /// Wait for the in-flight request, if there is one.
    pub async fn settle(&mut self) -> Option<DetectionRefresh> {
        let in_flight = self.in_flight.take()?;
        let result = in_flight
            .rx
            .await
            .unwrap_or_else(|_| Err(CogniscriptError::detection("detection task ended without a result")));
        Some(self.finish(in_flight.requested_ms, result))
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Requests launched so far.
    pub fn requests_launched(&self) -> u64 {
        self.launched
    }

    /// Requests that came back as errors.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn interval_ms(&self) -> u64 {
        self.gate.interval_ms()
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    fn take_completed(&mut self) -> Option<DetectionRefresh> {
        let in_flight = self.in_flight.as_mut()?;
        let result = match in_flight.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(CogniscriptError::detection(
                "detection task ended without a result",
            )),
        };
        let requested_ms = in_flight.requested_ms;
        self.in_flight = None;
        Some(self.finish(requested_ms, result))
    }

    fn launch(&mut self, now_ms: TimestampMs, frame: FrameRef) {
        let (tx, rx) = oneshot::channel();
        let detector = Arc::clone(&self.detector);
        self.runtime.spawn(async move {
            let result = detector.detect(frame).await;
            // The receiver is gone only if the scheduler was dropped.
            let _ = tx.send(result);
        });
        self.in_flight = Some(InFlight {
            requested_ms: now_ms,
            rx,
        });
        self.launched += 1;
        tracing::debug!(
            detector = %self.detector.name(),
            t = now_ms,
            "Detection request launched"
        );
    }

    fn finish(&mut self, requested_ms: TimestampMs, result: DetectionResult) -> DetectionRefresh {
        match result {
            Ok(objects) => {
                tracing::debug!(t = requested_ms, objects = objects.len(), "Detection completed");
                DetectionRefresh {
                    requested_ms,
                    objects,
                    failed: false,
                }
            }
            Err(e) => {
                self.failures += 1;
                tracing::warn!(
                    detector = %self.detector.name(),
                    t = requested_ms,
                    error = %e,
                    "Detection failed, continuing with no objects"
                );
                DetectionRefresh {
                    requested_ms,
                    objects: Vec::new(),
                    failed: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cogniscript_scene_model::geometry::{BoundingBox, FrameSize};
    use tokio::sync::Notify;

    /// Counts calls; blocks each call until released when gated.
    struct TestDetector {
        calls: AtomicUsize,
        release: Option<Arc<Notify>>,
        fail: bool,
    }

    impl TestDetector {
        fn immediate() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                release: None,
                fail: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl ObjectDetector for TestDetector {
        async fn detect(&self, _frame: FrameRef) -> CogniscriptResult<Vec<DetectedObject>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(release) = &self.release {
                release.notified().await;
            }
            if self.fail {
                return Err(CogniscriptError::detection("model unavailable"));
            }
            Ok(vec![DetectedObject::new(
                "pen",
                0.9,
                BoundingBox::new(0.0, 0.0, 4.0, 4.0),
            )])
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    fn frame(t: TimestampMs) -> FrameRef {
        FrameRef::new(t, FrameSize::new(640, 480))
    }

    #[tokio::test]
    async fn test_first_poll_launches() {
        let detector = Arc::new(TestDetector::immediate());
        let mut scheduler = DetectionScheduler::on_current_runtime(detector, 500).unwrap();

        assert!(scheduler.poll(0, frame(0)).is_none());
        assert!(scheduler.is_in_flight());
        assert_eq!(scheduler.requests_launched(), 1);

        let refresh = scheduler.settle().await.unwrap();
        assert_eq!(refresh.requested_ms, 0);
        assert_eq!(refresh.objects.len(), 1);
        assert!(!refresh.failed);
        assert!(!scheduler.is_in_flight());
    }

    #[tokio::test]
    async fn test_interval_limits_launches() {
        let detector = Arc::new(TestDetector::immediate());
        let mut scheduler =
            DetectionScheduler::on_current_runtime(detector.clone(), 500).unwrap();

        for t in (0..=1_000).step_by(33) {
            scheduler.poll(t, frame(t));
            scheduler.settle().await;
        }
        // Launches at 0, 528, and nothing else before 1056
        assert_eq!(scheduler.requests_launched(), 2);
        assert_eq!(detector.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_second_request_while_in_flight() {
        let release = Arc::new(Notify::new());
        let detector = Arc::new(TestDetector {
            calls: AtomicUsize::new(0),
            release: Some(release.clone()),
            fail: false,
        });
        let mut scheduler = DetectionScheduler::on_current_runtime(detector, 500).unwrap();

        scheduler.poll(0, frame(0));
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        // Well past the interval, but the first call has not returned
        assert!(scheduler.poll(2_000, frame(2_000)).is_none());
        assert_eq!(scheduler.requests_launched(), 1);

        release.notify_one();
        let refresh = scheduler.settle().await.unwrap();
        assert_eq!(refresh.requested_ms, 0);
    }

    #[tokio::test]
    async fn test_completed_result_is_picked_up_by_poll() {
        let detector = Arc::new(TestDetector::immediate());
        let mut scheduler = DetectionScheduler::on_current_runtime(detector, 500).unwrap();
        scheduler.poll(0, frame(0));

        let mut picked = None;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            if let Some(refresh) = scheduler.poll(10, frame(10)) {
                picked = Some(refresh);
                break;
            }
        }
        let refresh = picked.expect("detection never completed");
        assert_eq!(refresh.objects[0].label, "pen");
        // Still inside the interval, so nothing new was launched
        assert!(!scheduler.is_in_flight());
    }

    #[tokio::test]
    async fn test_failure_becomes_empty_refresh() {
        let detector = Arc::new(TestDetector {
            calls: AtomicUsize::new(0),
            release: None,
            fail: true,
        });
        let mut scheduler = DetectionScheduler::on_current_runtime(detector, 500).unwrap();
        scheduler.poll(0, frame(0));

        let refresh = scheduler.settle().await.unwrap();
        assert!(refresh.failed);
        assert!(refresh.objects.is_empty());
        assert_eq!(scheduler.failures(), 1);
    }

    #[test]
    fn test_requires_runtime() {
        let detector = Arc::new(TestDetector::immediate());
        assert!(DetectionScheduler::on_current_runtime(detector, 500).is_err());
    }
}
