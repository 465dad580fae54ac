//! Before/after comparison slider state.

/// Slider position a new comparison starts at.
pub const DEFAULT_POSITION: f32 = 50.0;

/// "Before" is shown while the divider is right of this position.
const BEFORE_LABEL_THRESHOLD: f32 = 25.0;

/// "After" is shown while the divider is left of this position.
const AFTER_LABEL_THRESHOLD: f32 = 75.0;

/// Divider position on a 0 (left edge) to 100 (right edge) scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonState {
    position: f32,
}

impl Default for ComparisonState {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
        }
    }
}

impl ComparisonState {
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Store `position` clamped to `[0, 100]`. NaN is ignored.
    pub fn set_position(&mut self, position: f32) {
        if position.is_nan() {
            return;
        }
        self.position = position.clamp(0.0, 100.0);
    }

    /// Both labels are derived independently; in the 25..75 band both show.
    pub fn before_label_visible(&self) -> bool {
        self.position > BEFORE_LABEL_THRESHOLD
    }

    pub fn after_label_visible(&self) -> bool {
        self.position < AFTER_LABEL_THRESHOLD
    }

    /// Position as a 0..1 fraction.
    pub fn fraction(&self) -> f32 {
        self.position / 100.0
    }
}

/// Comparison view. Holds state only while a successful result exists.
#[derive(Default)]
pub struct ComparisonView {
    state: Option<ComparisonState>,
}

impl ComparisonView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&ComparisonState> {
        self.state.as_ref()
    }

    /// Start a fresh comparison at the default position.
    pub fn activate(&mut self) {
        self.state = Some(ComparisonState::default());
    }

    pub fn discard(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Discarded comparison state");
        }
    }

    /// Move the divider. Inert while no comparison is active.
    pub fn set_position(&mut self, position: f32) -> bool {
        match self.state.as_mut() {
            Some(state) => {
                state.set_position(position);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        let mut state = ComparisonState::default();
        assert_eq!(state.position(), 50.0);

        state.set_position(-10.0);
        assert_eq!(state.position(), 0.0);

        state.set_position(150.0);
        assert_eq!(state.position(), 100.0);

        state.set_position(50.0);
        assert_eq!(state.position(), 50.0);

        state.set_position(f32::NAN);
        assert_eq!(state.position(), 50.0);

        state.set_position(f32::INFINITY);
        assert_eq!(state.position(), 100.0);
    }

    #[test]
    fn test_label_visibility() {
        let mut state = ComparisonState::default();

        let cases = [
            (0.0, false, true),
            (25.0, false, true),
            (25.5, true, true),
            (50.0, true, true),
            (74.9, true, true),
            (75.0, true, false),
            (100.0, true, false),
        ];
        for (position, before, after) in cases {
            state.set_position(position);
            assert_eq!(state.before_label_visible(), before, "before at {position}");
            assert_eq!(state.after_label_visible(), after, "after at {position}");
        }
    }

    #[test]
    fn test_inactive_view_ignores_input() {
        let mut view = ComparisonView::new();
        assert!(!view.set_position(30.0));
        assert!(view.state().is_none());

        view.activate();
        assert!(view.set_position(30.0));
        assert_eq!(view.state().map(|s| s.position()), Some(30.0));

        view.activate();
        assert_eq!(view.state().map(|s| s.position()), Some(DEFAULT_POSITION));

        view.discard();
        assert!(!view.is_active());
    }
}
