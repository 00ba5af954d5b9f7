//! Swipe handling for a single swimmer card.
//!
//! A horizontal drag is turned into one of three outcomes: delete, reset or
//! revert. Offsets are measured in the logical frame, where a negative value
//! always points toward delete, so right-to-left layouts mirror the raw
//! pointer delta before any decision is made.
//!
//! ```text
//! Idle --begin--> Dragging --drag--> Dragging
//!                    |
//!                   end ---- offset < -100 ---> Committed(Delete) --settle--> Idle
//!                    |  \--- offset > +100 ---> Committed(Reset)  --settle--> Idle
//!                    \------ otherwise -------> Reverting         --settle--> Idle
//! ```
//!
//! The controller never touches the store. Callers map a committed outcome to
//! an [`Intent`] and dispatch it themselves.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::domain::SwimmerId;

use crate::intent::Intent;

/// Logical distance past which a release commits an action.
pub const COMMIT_THRESHOLD: f64 = 100.0;
/// Largest logical offset the card is translated by while dragging.
pub const MAX_DRAG_OFFSET: f64 = 150.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

impl LayoutDirection {
    /// Maps a physical pointer delta into the logical frame.
    pub fn adjust(self, raw_offset: f64) -> f64 {
        match self {
            LayoutDirection::Ltr => raw_offset,
            LayoutDirection::Rtl => -raw_offset,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutDirection::Ltr => "ltr",
            LayoutDirection::Rtl => "rtl",
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(LayoutDirection::Ltr),
            "rtl" => Ok(LayoutDirection::Rtl),
            other => Err(format!("unknown layout direction '{other}' (expected ltr or rtl)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    Delete,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    /// `offset` is the direction-adjusted, unclamped distance from `start`.
    Dragging { start: f64, offset: f64 },
    Committed(SwipeAction),
    Reverting,
}

/// What the card should look like for the current pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwipeFrame {
    /// Clamped logical offset. Negative slides toward the delete indicator.
    pub offset: f64,
    /// Opacity of the delete indicator, `0.0..=1.0`.
    pub delete_reveal: f64,
    /// Opacity of the reset indicator, `0.0..=1.0`.
    pub reset_reveal: f64,
}

impl SwipeFrame {
    pub fn at_rest() -> Self {
        Self::default()
    }

    fn for_offset(offset: f64) -> Self {
        let clamped = offset.clamp(-MAX_DRAG_OFFSET, MAX_DRAG_OFFSET);
        let reveal = (clamped.abs() / COMMIT_THRESHOLD).min(1.0);
        if clamped < 0.0 {
            Self {
                offset: clamped,
                delete_reveal: reveal,
                reset_reveal: 0.0,
            }
        } else if clamped > 0.0 {
            Self {
                offset: clamped,
                delete_reveal: 0.0,
                reset_reveal: reveal,
            }
        } else {
            Self::at_rest()
        }
    }

    /// Physical translation for a renderer laid out in `direction`.
    pub fn translate_x(&self, direction: LayoutDirection) -> f64 {
        direction.adjust(self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    CommitDelete,
    CommitReset,
    Reverted,
}

impl GestureOutcome {
    /// The store intent a committed outcome stands for. Reverts produce none.
    pub fn intent(self, id: SwimmerId) -> Option<Intent> {
        match self {
            GestureOutcome::CommitDelete => Some(Intent::Remove(id)),
            GestureOutcome::CommitReset => Some(Intent::Reset(id)),
            GestureOutcome::Reverted => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SwipeGesture {
    direction: LayoutDirection,
    phase: GesturePhase,
}

impl SwipeGesture {
    pub fn new(direction: LayoutDirection) -> Self {
        Self {
            direction,
            phase: GesturePhase::Idle,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Applies from the next pointer move.
    pub fn set_direction(&mut self, direction: LayoutDirection) {
        self.direction = direction;
    }

    /// Pointer down. Ignored unless idle.
    pub fn begin(&mut self, x: f64) -> bool {
        if self.phase != GesturePhase::Idle {
            return false;
        }
        self.phase = GesturePhase::Dragging {
            start: x,
            offset: 0.0,
        };
        true
    }

    /// Pointer move. Returns the frame to render, or `None` when not dragging.
    pub fn drag(&mut self, x: f64) -> Option<SwipeFrame> {
        let GesturePhase::Dragging { start, .. } = self.phase else {
            return None;
        };
        let offset = self.direction.adjust(x - start);
        self.phase = GesturePhase::Dragging { start, offset };
        Some(SwipeFrame::for_offset(offset))
    }

    /// Pointer up. Decides the outcome from the unclamped offset.
    pub fn end(&mut self) -> Option<GestureOutcome> {
        let GesturePhase::Dragging { offset, .. } = self.phase else {
            return None;
        };
        let outcome = if offset < -COMMIT_THRESHOLD {
            self.phase = GesturePhase::Committed(SwipeAction::Delete);
            GestureOutcome::CommitDelete
        } else if offset > COMMIT_THRESHOLD {
            self.phase = GesturePhase::Committed(SwipeAction::Reset);
            GestureOutcome::CommitReset
        } else {
            self.phase = GesturePhase::Reverting;
            GestureOutcome::Reverted
        };
        Some(outcome)
    }

    /// Pointer cancel (focus loss, touch interrupted). Always reverts.
    pub fn cancel(&mut self) -> Option<GestureOutcome> {
        if let GesturePhase::Dragging { .. } = self.phase {
            self.phase = GesturePhase::Reverting;
            return Some(GestureOutcome::Reverted);
        }
        None
    }

    /// Finishes a committed or reverting gesture and returns the resting frame.
    ///
    /// Callers settle after the store has handled a committed intent, or after
    /// deciding to snap the card back because that intent failed.
    pub fn settle(&mut self) -> SwipeFrame {
        if !matches!(self.phase, GesturePhase::Dragging { .. }) {
            self.phase = GesturePhase::Idle;
        }
        SwipeFrame::at_rest()
    }
}

impl Default for SwipeGesture {
    fn default() -> Self {
        Self::new(LayoutDirection::default())
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
