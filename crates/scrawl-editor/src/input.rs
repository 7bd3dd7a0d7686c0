//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` enum.
//! Each device type implements `PointerSource` once; nothing downstream
//! inspects the event type again.

use scrawl_core::Point;

/// A device-independent pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub is_touch: bool,
}

impl PointerSample {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Anything that can report a pointer position.
///
/// Returns `None` when the event carries no usable position
/// (e.g. a touch event whose touch list is already empty).
pub trait PointerSource {
    fn sample(&self) -> Option<PointerSample>;
}

/// A mouse (or pen-as-mouse) event position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseSample {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerSource for MouseSample {
    fn sample(&self) -> Option<PointerSample> {
        Some(PointerSample {
            x: self.client_x,
            y: self.client_y,
            is_touch: false,
        })
    }
}

/// A touch event's active touches. Only the first touch draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchSample {
    pub touches: Vec<(f64, f64)>,
}

impl PointerSource for TouchSample {
    fn sample(&self) -> Option<PointerSample> {
        let &(x, y) = self.touches.first()?;
        Some(PointerSample {
            x,
            y,
            is_touch: true,
        })
    }
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f64, y: f64, is_touch: bool },

    /// Pointer moved (mouse move, touch move).
    PointerMove { x: f64, y: f64, is_touch: bool },

    /// Pointer released (mouse up, touch end).
    PointerUp,

    /// Pointer left the surface (mouse out). Cancels the active stroke.
    PointerLeave,
}

impl InputEvent {
    pub fn down(source: &impl PointerSource) -> Option<Self> {
        source.sample().map(|s| Self::PointerDown {
            x: s.x,
            y: s.y,
            is_touch: s.is_touch,
        })
    }

    pub fn moved(source: &impl PointerSource) -> Option<Self> {
        source.sample().map(|s| Self::PointerMove {
            x: s.x,
            y: s.y,
            is_touch: s.is_touch,
        })
    }

    /// Extract position if this is a positional event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. } | Self::PointerMove { x, y, .. } => {
                Some(Point::new(*x, *y))
            }
            Self::PointerUp | Self::PointerLeave => None,
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { is_touch: true, .. } | Self::PointerMove { is_touch: true, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mouse_and_touch_normalize_to_same_shape() {
        let mouse = InputEvent::down(&MouseSample {
            client_x: 4.0,
            client_y: 9.0,
        });
        let touch = InputEvent::down(&TouchSample {
            touches: vec![(4.0, 9.0), (100.0, 100.0)],
        });
        assert_eq!(mouse.and_then(|e| e.position()), Some(Point::new(4.0, 9.0)));
        assert_eq!(touch.and_then(|e| e.position()), Some(Point::new(4.0, 9.0)));
        assert!(!mouse.is_some_and(|e| e.is_touch()));
        assert!(touch.is_some_and(|e| e.is_touch()));
    }

    #[test]
    fn empty_touch_list_yields_no_event() {
        assert_eq!(InputEvent::moved(&TouchSample::default()), None);
    }

    #[test]
    fn release_events_have_no_position() {
        assert_eq!(InputEvent::PointerUp.position(), None);
        assert_eq!(InputEvent::PointerLeave.position(), None);
    }
}
