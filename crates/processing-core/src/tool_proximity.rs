//! Associate a detected object with the hand: which one is the pen?
//!
//! The detector runs far less often than hand tracking, so this runs once
//! per detection refresh and the result is held until the next one.

use cogniscript_common::config::DEFAULT_TOOL_CLASSES;
use cogniscript_scene_model::detection::DetectedObject;
use cogniscript_scene_model::geometry::Point2D;

/// Allow-list of detector classes treated as writing tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolClassSet {
    classes: Vec<String>,
}

impl ToolClassSet {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive match against the detector's label.
    pub fn contains(&self, label: &str) -> bool {
        self.classes.iter().any(|c| c == label)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl Default for ToolClassSet {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL_CLASSES.iter().copied())
    }
}

/// The object chosen as the held tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolMatch<'a> {
    /// Position in the detection set.
    pub index: usize,
    pub object: &'a DetectedObject,
    /// From the reference point to the box center, in source pixels.
    pub distance: f64,
}

/// Nearest allow-listed object to `reference` (source-frame pixels).
///
/// Distance is measured to the bounding-box center. On ties the object that
/// comes first in `objects` wins. `None` when nothing qualifies.
pub fn find_nearest_tool<'a>(
    objects: &'a [DetectedObject],
    reference: Point2D,
    classes: &ToolClassSet,
) -> Option<ToolMatch<'a>> {
    let mut best: Option<ToolMatch<'a>> = None;

    for (index, object) in objects.iter().enumerate() {
        if !classes.contains(&object.label) {
            continue;
        }
        let distance = object.bbox.center().distance_to(&reference);
        // Strict comparison keeps the first-seen object on ties.
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(ToolMatch {
                index,
                object,
                distance,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogniscript_scene_model::geometry::BoundingBox;

    fn obj(label: &str, x: f64, y: f64) -> DetectedObject {
        DetectedObject::new(label, 0.9, BoundingBox::new(x, y, 10.0, 10.0))
    }

    #[test]
    fn test_empty_set_has_no_tool() {
        assert!(find_nearest_tool(&[], Point2D::new(0.0, 0.0), &ToolClassSet::default()).is_none());
    }

    #[test]
    fn test_non_tool_classes_are_ignored() {
        let objects = vec![obj("person", 0.0, 0.0), obj("cup", 5.0, 5.0)];
        assert!(
            find_nearest_tool(&objects, Point2D::new(5.0, 5.0), &ToolClassSet::default())
                .is_none()
        );
    }

    #[test]
    fn test_pencil_under_the_wrist() {
        let objects = vec![obj("pencil", 0.0, 0.0)];
        let found = find_nearest_tool(&objects, Point2D::new(5.0, 5.0), &ToolClassSet::default())
            .unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.object.label, "pencil");
        assert_eq!(found.distance, 0.0);
    }

    #[test]
    fn test_nearest_of_several_wins() {
        let objects = vec![
            obj("scissors", 300.0, 0.0),
            obj("person", 100.0, 100.0),
            obj("remote", 40.0, 0.0),
            obj("pencil", 120.0, 0.0),
        ];
        let found = find_nearest_tool(&objects, Point2D::new(0.0, 5.0), &ToolClassSet::default())
            .unwrap();
        assert_eq!(found.object.label, "remote");
        assert_eq!(found.index, 2);
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let objects = vec![obj("fork", 10.0, -5.0), obj("spoon", -20.0, -5.0)];
        // Both centers are 15 px from (0, 0) along x
        let found = find_nearest_tool(&objects, Point2D::new(0.0, 0.0), &ToolClassSet::default())
            .unwrap();
        assert_eq!(found.object.label, "fork");
    }

    #[test]
    fn test_custom_allow_list() {
        let classes = ToolClassSet::new(["stylus"]);
        let objects = vec![obj("pencil", 0.0, 0.0), obj("stylus", 500.0, 500.0)];
        let found = find_nearest_tool(&objects, Point2D::new(0.0, 0.0), &classes).unwrap();
        assert_eq!(found.object.label, "stylus");
        assert!(classes.contains("stylus"));
        assert!(!classes.contains("Stylus"));
    }
}
