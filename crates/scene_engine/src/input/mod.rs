//! Input management system
//!
//! The core never polls input itself. Input hooks receive a `&dyn Input` and
//! query it; hosts feed key events into an [`InputManager`] (or implement
//! [`Input`] over their own backend).

use std::collections::HashSet;

/// Read-only keyboard state queried by input hooks
pub trait Input {
    /// Whether `key` is currently held
    fn is_key_down(&self, key: KeyCode) -> bool;
}

/// Input manager
#[derive(Debug, Default, Clone)]
pub struct InputManager {
    keys_down: HashSet<KeyCode>,
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Release every key (focus loss)
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }
}

impl Input for InputManager {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }
}

/// Input state with nothing pressed
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl Input for NoInput {
    fn is_key_down(&self, _key: KeyCode) -> bool {
        false
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Shift key
    Shift,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}
