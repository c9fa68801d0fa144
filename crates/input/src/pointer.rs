use glam::Vec2;

/// Raw pointer input in screen pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Move { x: f32, y: f32 },
}

impl PointerEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            Self::Down { x, y } | Self::Up { x, y } | Self::Move { x, y } => Vec2::new(x, y),
        }
    }
}
