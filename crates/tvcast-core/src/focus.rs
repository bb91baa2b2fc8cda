//! Focus tracking for list-bearing screens and the left-edge escape hatch.
//!
//! Directional focus movement itself belongs to the platform. This module
//! only sees moves the platform could not handle, and turns exactly one
//! of them (left at the first item) into opening the global menu.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::input::Direction;
use crate::navigation::Navigator;

/// Identity of a focusable list, e.g. `"home/recent"` or `"series/Romans"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListId(String);

impl ListId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which item of which list currently holds focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusCursor {
    pub list: ListId,
    pub index: usize,
}

/// What happened to a move the platform could not perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move triggered navigation; stop propagating it.
    Consumed,
    /// Nothing happened; let the platform keep propagating it.
    Propagated,
}

impl MoveOutcome {
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Shared focus-boundary logic for every screen that shows a list.
pub struct FocusBoundaryCoordinator {
    cursor: FocusCursor,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for FocusBoundaryCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusBoundaryCoordinator")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl FocusBoundaryCoordinator {
    pub fn new(list: impl Into<ListId>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            cursor: FocusCursor {
                list: list.into(),
                index: 0,
            },
            navigator,
        }
    }

    pub fn cursor(&self) -> &FocusCursor {
        &self.cursor
    }

    /// Point the coordinator at `list`. A different list resets the cursor
    /// to its first item; the same list keeps it.
    pub fn attach(&mut self, list: impl Into<ListId>) {
        let list = list.into();
        if list != self.cursor.list {
            debug!(from = %self.cursor.list, to = %list, "focus list changed, cursor reset");
            self.cursor = FocusCursor { list, index: 0 };
        }
    }

    /// Record that item `index` of `list` gained focus.
    pub fn focus(&mut self, list: impl Into<ListId>, index: usize) {
        self.attach(list);
        self.cursor.index = index;
    }

    /// Handle a directional move the platform found no target for.
    pub fn on_unhandled_move(&self, direction: Direction) -> MoveOutcome {
        if direction == Direction::Left && self.cursor.index == 0 {
            debug!(list = %self.cursor.list, "left edge reached, opening global menu");
            self.navigator.open_global_menu();
            MoveOutcome::Consumed
        } else {
            MoveOutcome::Propagated
        }
    }
}
