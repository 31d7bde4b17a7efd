//! Keyboard and mouse state with level-triggered and edge-triggered queries.
//!
//! `is_held` answers "is the key down right now" and drives walking.
//! `is_just_pressed` answers "did it go down since the last consumed step" and
//! drives discrete actions: jump, escape-to-menu, menu clicks. Edges are
//! cleared by `end_frame()`, which the game loop calls only after a fixed step
//! has consumed them, so a press never falls between two steps.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    Escape,
    F3,
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,

    /// Cursor position in window pixels.
    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse_held.remove(&btn);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    /// Keys pressed since the last `end_frame`, in a stable order so that
    /// dispatch does not depend on hash iteration.
    pub fn pressed_keys(&self) -> Vec<Key> {
        const ORDER: [Key; 6] = [Key::Left, Key::Right, Key::Space, Key::Escape, Key::F3, Key::R];
        ORDER
            .into_iter()
            .filter(|key| self.just_pressed.contains(key))
            .collect()
    }

    /// Drop all held state, e.g. when the window loses focus and key-up
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.mouse_held.clear();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_just_pressed.clear();
    }
}
