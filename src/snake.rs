use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_GROWTH_PER_PELLET, GridSize};
use crate::food::Pellet;
use crate::input::{Direction, KeyMap};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the point lies on or beyond the arena walls.
    ///
    /// Rows and columns `0` and `width`/`height` are walls, so the playable
    /// interior is `1..width` x `1..height`.
    #[must_use]
    pub fn is_out_of_bound(self, grid: GridSize) -> bool {
        self.x <= 0
            || self.y <= 0
            || self.x >= i32::from(grid.width)
            || self.y >= i32::from(grid.height)
    }

    /// Samples an interior point uniformly, one independent draw per axis.
    ///
    /// Nothing already on the board is avoided.
    #[must_use]
    pub fn new_random<R: Rng + ?Sized>(rng: &mut R, grid: GridSize) -> Self {
        Self {
            x: rng.gen_range(1..i32::from(grid.width)),
            y: rng.gen_range(1..i32::from(grid.height)),
        }
    }

    /// Returns the neighbouring point one step in `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body, heading and growth bookkeeping.
///
/// `direction` is the heading of the last committed move; `pending_direction`
/// is what the next [`Snake::advance`] commits. Input only ever touches the
/// pending slot.
#[derive(Debug, Clone)]
pub struct Snake {
    segments: VecDeque<Point>,
    direction: Direction,
    pending_direction: Direction,
    pending_growth: u32,
    growth_increment: u32,
    keymap: KeyMap,
}

impl Snake {
    /// Creates a one-segment snake at `start` heading `direction`.
    #[must_use]
    pub fn new(start: Point, direction: Direction, keymap: KeyMap) -> Self {
        Self::from_segments(vec![start], direction, keymap)
    }

    /// Creates a snake from explicit segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Point>, direction: Direction, keymap: KeyMap) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            segments: VecDeque::from(segments),
            direction,
            pending_direction: direction,
            pending_growth: 0,
            growth_increment: DEFAULT_GROWTH_PER_PELLET,
            keymap,
        }
    }

    /// Sets how many segments each eaten pellet is worth.
    #[must_use]
    pub fn with_growth_increment(mut self, growth_increment: u32) -> Self {
        self.growth_increment = growth_increment;
        self
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Point {
        *self
            .segments
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the head position the next [`Snake::advance`] would produce.
    #[must_use]
    pub fn next_head(&self) -> Point {
        self.head().stepped(self.pending_direction)
    }

    /// Returns true if any segment occupies `point`.
    #[must_use]
    pub fn occupies(&self, point: Point) -> bool {
        self.segments.contains(&point)
    }

    /// Returns true when the current or the prospective head is off the arena.
    #[must_use]
    pub fn will_crash_into_wall(&self, grid: GridSize) -> bool {
        self.head().is_out_of_bound(grid) || self.next_head().is_out_of_bound(grid)
    }

    /// Returns true when the next move would land on the body.
    ///
    /// The tail is exempt when it is about to be vacated, i.e. when no growth is
    /// owed. With growth pending the tail stays put and counts as body.
    #[must_use]
    pub fn will_crash_into_self(&self) -> bool {
        let next = self.next_head();
        let vacated = usize::from(self.pending_growth == 0);
        let solid = self.segments.len().saturating_sub(vacated);

        self.segments.iter().take(solid).any(|segment| *segment == next)
    }

    /// Commits the pending direction and pushes the new head.
    pub fn advance(&mut self) {
        let next = self.next_head();
        self.direction = self.pending_direction;
        self.segments.push_front(next);
    }

    /// Drops the tail unless growth is owed, in which case one unit is paid.
    ///
    /// Must run after [`Snake::advance`] in the same tick.
    pub fn apply_growth(&mut self) {
        if self.pending_growth == 0 {
            let _ = self.segments.pop_back();
        } else {
            self.pending_growth -= 1;
        }

        debug_assert!(!self.segments.is_empty());
    }

    /// Queues `direction` for the next move.
    ///
    /// A direct reversal of the committed heading is ignored once the snake has
    /// a neck to run into.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if self.segments.len() > 1 && direction == self.direction.opposite() {
            return;
        }

        self.pending_direction = direction;
    }

    /// Applies a key press through the keymap. Returns whether the key is mapped.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(direction) = self.keymap.direction_for(key) else {
            return false;
        };

        self.set_pending_direction(direction);
        true
    }

    /// Returns the first pellet lying under the head.
    #[must_use]
    pub fn consumes_food<'a>(&self, food: &'a [Pellet]) -> Option<&'a Pellet> {
        let head = self.head();
        food.iter().find(|pellet| pellet.point == head)
    }

    /// Owes the snake one pellet's worth of segments.
    pub fn grow(&mut self) {
        self.pending_growth = self.pending_growth.saturating_add(self.growth_increment);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    #[must_use]
    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    /// Iterates over segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.segments.iter()
    }
}
