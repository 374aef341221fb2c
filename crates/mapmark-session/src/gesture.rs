use mapmark_core::MarkerId;
use mapmark_geometry::PercentPoint;

/// State for dragging a marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub marker: MarkerId,
    /// Marker position when the gesture began, restored on cancel
    pub origin: PercentPoint,
    /// Accumulated pointer position before snapping
    pub raw: PercentPoint,
    /// Move events applied so far
    pub moves: usize,
}

/// Pointer gesture state: `Idle -> Dragging -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
}

impl Gesture {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::Dragging(_))
    }

    pub fn active_marker(&self) -> Option<MarkerId> {
        match self {
            Gesture::Dragging(drag) => Some(drag.marker),
            Gesture::Idle => None,
        }
    }
}
