/// Horizontal drag distance, in pixels, a card must travel before release commits it.
pub const SWIPE_THRESHOLD_PX: f32 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,  // pass
    Right, // save
}

impl SwipeDirection {
    /// Resolves a drag released at `offset_px` from its start. Anything inside the threshold
    /// snaps back and changes nothing.
    pub fn from_drag(offset_px: f32, threshold_px: f32) -> Option<Self> {
        if offset_px > threshold_px {
            Some(SwipeDirection::Right)
        } else if offset_px < -threshold_px {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_past_threshold_commits() {
        assert_eq!(
            SwipeDirection::from_drag(111.0, SWIPE_THRESHOLD_PX),
            Some(SwipeDirection::Right)
        );
        assert_eq!(
            SwipeDirection::from_drag(-111.0, SWIPE_THRESHOLD_PX),
            Some(SwipeDirection::Left)
        );
        assert_eq!(
            SwipeDirection::from_drag(420.0, SWIPE_THRESHOLD_PX),
            Some(SwipeDirection::Right)
        );
    }

    #[test]
    fn test_drag_at_or_inside_threshold_snaps_back() {
        assert_eq!(SwipeDirection::from_drag(110.0, SWIPE_THRESHOLD_PX), None);
        assert_eq!(SwipeDirection::from_drag(-110.0, SWIPE_THRESHOLD_PX), None);
        assert_eq!(SwipeDirection::from_drag(0.0, SWIPE_THRESHOLD_PX), None);
        assert_eq!(SwipeDirection::from_drag(f32::NAN, SWIPE_THRESHOLD_PX), None);
    }

    #[test]
    fn test_custom_threshold() {
        assert_eq!(
            SwipeDirection::from_drag(60.0, 50.0),
            Some(SwipeDirection::Right)
        );
        assert_eq!(SwipeDirection::from_drag(60.0, 80.0), None);
    }
}
