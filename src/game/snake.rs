use std::collections::VecDeque;

use super::grid::Cell;

/// The cells occupied by the snake, head first.
///
/// Never empty. `advance` trusts the caller to pass a head one unit step
/// away from the current one; it only does the prepend/trim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeBody {
    segments: VecDeque<Cell>,
}

impl SnakeBody {
    /// A snake of length one
    pub fn new(head: Cell) -> Self {
        Self {
            segments: VecDeque::from([head]),
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_segments(segments: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let segments: VecDeque<Cell> = segments.into_iter().collect();
        (!segments.is_empty()).then_some(Self { segments })
    }

    /// Get the head cell
    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    /// Get the tail cell (last segment)
    pub fn tail(&self) -> Cell {
        self.segments[self.segments.len() - 1]
    }

    /// Move one step: prepend `new_head`, dropping the tail unless `grow`
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.segments.push_front(new_head);
        if !grow {
            self.segments.pop_back();
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Whether moving the head onto `new_head` runs into the body.
    ///
    /// The tail is left out of the check when the snake is not growing,
    /// since it vacates its cell in the same step.
    pub fn would_collide(&self, new_head: Cell, grow: bool) -> bool {
        let blocking = if grow {
            self.segments.len()
        } else {
            self.segments.len() - 1
        };
        self.segments.iter().take(blocking).any(|&c| c == new_head)
    }

    /// Read-only view of the segments, head first
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.segments.iter()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the snake is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
