//! Browser event → `PointerSource` adapters.

use scrawl_editor::{MouseSample, TouchSample};
use web_sys::{MouseEvent, TouchEvent};

pub fn mouse_sample(event: &MouseEvent) -> MouseSample {
    MouseSample {
        client_x: event.client_x() as f64,
        client_y: event.client_y() as f64,
    }
}

/// Active touches in list order. `touchend` events carry none.
pub fn touch_sample(event: &TouchEvent) -> TouchSample {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| (t.client_x() as f64, t.client_y() as f64))
        .collect();
    TouchSample { touches }
}
