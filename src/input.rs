//! Keyboard/mouse state tracking.
//!
//! State is kept as two snapshots: the table being filled by the
//! current poll and the table from the previous poll. A "pressed"
//! edge is down now and not down in the previous snapshot, so it
//! reads true for exactly one poll.

use vec_map::VecMap;

pub use glutin::MouseButton;
pub use glutin::VirtualKeyCode as Key;

fn button_index(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        MouseButton::Other(n) => 3 + n as usize,
    }
}

/// Two-snapshot keyboard/mouse/scroll state.
pub struct Input {
    keys: VecMap<bool>,
    last_keys: VecMap<bool>,
    buttons: VecMap<bool>,
    last_buttons: VecMap<bool>,
    cursor: (f64, f64),
    scroll: (f32, f32),
}

impl Input {
    /// Constructor.
    pub(crate) fn new() -> Self {
        Input {
            keys: VecMap::new(),
            last_keys: VecMap::new(),
            buttons: VecMap::new(),
            last_buttons: VecMap::new(),
            cursor: (0.0, 0.0),
            scroll: (0.0, 0.0),
        }
    }

    /// Rotates the snapshots and zeroes the scroll accumulator.
    ///
    /// Call before pumping the event queue.
    pub(crate) fn begin_poll(&mut self) {
        self.last_keys = self.keys.clone();
        self.last_buttons = self.buttons.clone();
        self.scroll = (0.0, 0.0);
    }

    /// Records a key state change delivered by the event queue.
    pub(crate) fn record_key(&mut self, key: Key, down: bool) {
        self.keys.insert(key as usize, down);
    }

    /// Records a mouse button state change.
    pub(crate) fn record_button(&mut self, button: MouseButton, down: bool) {
        self.buttons.insert(button_index(button), down);
    }

    /// Records the cursor position in surface pixels.
    pub(crate) fn record_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    /// Accumulates scroll motion delivered during the current poll.
    pub(crate) fn record_scroll(&mut self, dx: f32, dy: f32) {
        self.scroll.0 += dx;
        self.scroll.1 += dy;
    }

    /// Returns true while the key is held.
    pub fn key_down(&self, key: Key) -> bool {
        self.keys.get(key as usize).cloned().unwrap_or(false)
    }

    /// Returns true for the one poll in which the key went down.
    pub fn key_pressed(&self, key: Key) -> bool {
        let down = self.key_down(key);
        let was = self.last_keys.get(key as usize).cloned().unwrap_or(false);
        down && !was
    }

    /// Returns true while the mouse button is held.
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons.get(button_index(button)).cloned().unwrap_or(false)
    }

    /// Returns true for the one poll in which the button went down.
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        let down = self.button_down(button);
        let was = self
            .last_buttons
            .get(button_index(button))
            .cloned()
            .unwrap_or(false);
        down && !was
    }

    /// Returns the last reported cursor position in surface pixels.
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    /// Returns the scroll motion accumulated during the last poll.
    pub fn scroll(&self) -> (f32, f32) {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::{Input, Key, MouseButton};

    #[test]
    fn press_edge_is_consumed_after_one_poll() {
        let mut input = Input::new();

        input.begin_poll();
        input.record_key(Key::Space, true);
        assert!(input.key_down(Key::Space));
        assert!(input.key_pressed(Key::Space));

        input.begin_poll();
        assert!(input.key_down(Key::Space));
        assert!(!input.key_pressed(Key::Space));
    }

    #[test]
    fn release_and_repress_yields_a_new_edge() {
        let mut input = Input::new();

        input.begin_poll();
        input.record_key(Key::A, true);
        input.begin_poll();
        input.record_key(Key::A, false);
        assert!(!input.key_down(Key::A));

        input.begin_poll();
        input.record_key(Key::A, true);
        assert!(input.key_pressed(Key::A));
    }

    #[test]
    fn button_edges_mirror_key_edges() {
        let mut input = Input::new();

        input.begin_poll();
        input.record_button(MouseButton::Left, true);
        assert!(input.button_down(MouseButton::Left));
        assert!(input.button_pressed(MouseButton::Left));
        assert!(!input.button_down(MouseButton::Right));

        input.begin_poll();
        assert!(!input.button_pressed(MouseButton::Left));
    }

    #[test]
    fn scroll_resets_each_poll_and_accumulates_within_one() {
        let mut input = Input::new();

        input.begin_poll();
        input.record_scroll(0.0, 1.0);
        input.record_scroll(0.5, 2.0);
        assert_eq!((0.5, 3.0), input.scroll());

        input.begin_poll();
        assert_eq!((0.0, 0.0), input.scroll());
    }

    #[test]
    fn cursor_reports_last_position() {
        let mut input = Input::new();
        input.begin_poll();
        input.record_cursor(12.0, 34.0);
        input.record_cursor(56.0, 78.0);
        assert_eq!((56.0, 78.0), input.cursor());
    }
}
