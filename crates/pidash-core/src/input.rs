//! Directional input state and the wire command encoder.
//!
//! Two independent sources (keyboard, gamepad) each produce a
//! [`DirectionalState`]; the combined state is their per-direction logical
//! OR with no priority between sources. The encoder collapses the combined
//! state to a single token with a fixed priority order, so at most one
//! command goes on the wire per tick even when several directions are held.

/// Analog stick magnitude below which input is treated as noise.
pub const AXIS_DEADZONE: f32 = 0.5;

/// Four-way directional intent. Each direction is independent — there is no
/// cross-key exclusivity, so opposing directions may be asserted at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionalState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionalState {
    /// The all-false state.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Per-direction logical OR of two states.
    pub fn merge(self, other: Self) -> Self {
        Self {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }

    /// True if any direction is asserted.
    pub fn any(self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Map an analog stick position to directions. A direction asserts when
    /// the axis exceeds `deadzone` in its half of the range; +y is up.
    pub fn from_stick(x: f32, y: f32, deadzone: f32) -> Self {
        Self {
            up: y > deadzone,
            down: y < -deadzone,
            left: x < -deadzone,
            right: x > deadzone,
        }
    }
}

/// One outbound command token. First asserted direction wins, in the order
/// up > right > left > down; `None` when nothing is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveCommand {
    Up,
    Right,
    Left,
    Down,
    #[default]
    None,
}

impl DriveCommand {
    /// Encode a combined directional state. Pure, total, exactly one token.
    pub fn from_state(state: DirectionalState) -> Self {
        if state.up {
            Self::Up
        } else if state.right {
            Self::Right
        } else if state.left {
            Self::Left
        } else if state.down {
            Self::Down
        } else {
            Self::None
        }
    }

    /// The literal UTF-8 text frame sent to the server.
    pub fn token(self) -> &'static str {
        match self {
            Self::Up => "key:up",
            Self::Right => "key:right",
            Self::Left => "key:left",
            Self::Down => "key:down",
            Self::None => "key:none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(up: bool, down: bool, left: bool, right: bool) -> DirectionalState {
        DirectionalState {
            up,
            down,
            left,
            right,
        }
    }

    #[test]
    fn encoder_priority_up_beats_down() {
        let s = state(true, true, false, false);
        assert_eq!(DriveCommand::from_state(s), DriveCommand::Up);
        assert_eq!(DriveCommand::from_state(s).token(), "key:up");
    }

    #[test]
    fn encoder_priority_right_beats_left() {
        let s = state(false, false, true, true);
        assert_eq!(DriveCommand::from_state(s).token(), "key:right");
    }

    #[test]
    fn encoder_priority_left_beats_down() {
        let s = state(false, true, true, false);
        assert_eq!(DriveCommand::from_state(s).token(), "key:left");
    }

    #[test]
    fn encoder_all_false_is_none() {
        assert_eq!(
            DriveCommand::from_state(DirectionalState::NONE).token(),
            "key:none"
        );
    }

    #[test]
    fn encoder_emits_exactly_one_defined_token() {
        const TOKENS: [&str; 5] = ["key:up", "key:right", "key:left", "key:down", "key:none"];
        for bits in 0..16u8 {
            let s = state(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let token = DriveCommand::from_state(s).token();
            assert!(TOKENS.contains(&token), "unknown token {token}");
        }
    }

    #[test]
    fn merge_is_per_direction_or() {
        let keyboard = state(true, false, false, false);
        let gamepad = state(false, false, true, false);
        let merged = keyboard.merge(gamepad);
        assert!(merged.up && merged.left);
        assert!(!merged.down && !merged.right);
    }

    #[test]
    fn merge_requires_both_sources_released() {
        let keyboard = state(false, true, false, false);
        let gamepad = state(false, true, false, false);
        assert!(keyboard.merge(gamepad).down);
        assert!(keyboard.merge(DirectionalState::NONE).down);
        assert!(DirectionalState::NONE.merge(gamepad).down);
        assert!(!DirectionalState::NONE.merge(DirectionalState::NONE).down);
    }

    #[test]
    fn stick_inside_deadzone_is_silent() {
        let s = DirectionalState::from_stick(0.4, -0.49, AXIS_DEADZONE);
        assert_eq!(s, DirectionalState::NONE);
    }

    #[test]
    fn stick_past_deadzone_asserts() {
        let s = DirectionalState::from_stick(-0.9, 0.0, AXIS_DEADZONE);
        assert!(s.left && !s.right && !s.up && !s.down);
        let s = DirectionalState::from_stick(0.0, 0.51, AXIS_DEADZONE);
        assert!(s.up && !s.down);
        let s = DirectionalState::from_stick(0.0, -0.8, AXIS_DEADZONE);
        assert!(s.down);
    }

    #[test]
    fn stick_diagonal_asserts_both_axes() {
        let s = DirectionalState::from_stick(0.7, 0.7, AXIS_DEADZONE);
        assert!(s.up && s.right);
        // Encoder still collapses to a single token.
        assert_eq!(DriveCommand::from_state(s).token(), "key:up");
    }

    #[test]
    fn any_reflects_assertion() {
        assert!(!DirectionalState::NONE.any());
        assert!(state(false, false, false, true).any());
    }
}
