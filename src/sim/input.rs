//! Logical input actions
//!
//! The core never sees keys. It asks whether an action is held right now,
//! once per logical tick.

/// Actions the player model polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Thrust,
}

/// "Is this action currently held" capability supplied by the host
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;
}

/// Snapshot of held actions for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
}

impl TickInput {
    pub fn thrust() -> Self {
        Self {
            thrust: true,
            ..Default::default()
        }
    }
}

impl InputSource for TickInput {
    fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Thrust => self.thrust,
        }
    }
}
