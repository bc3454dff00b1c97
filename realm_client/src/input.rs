//! Input snapshot.
//!
//! Device polling lives in the windowing layer; the core consumes one
//! immutable snapshot per frame, refreshed before the network poll.

use realm_shared::math::Vec2;

/// User input state at a moment in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputSnapshot {
    /// Raw movement axis; y grows downward to match the render space.
    pub fn movement_axis(self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let input = InputSnapshot {
            left: true,
            right: true,
            up: true,
            ..Default::default()
        };
        assert_eq!(input.movement_axis(), Vec2::new(0.0, -1.0));
    }
}
