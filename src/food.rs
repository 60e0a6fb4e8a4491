use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Point, Snake};

/// Food item lying on one grid cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Pellet {
    pub point: Point,
}

impl Pellet {
    #[must_use]
    pub fn new(point: Point) -> Self {
        Self { point }
    }

    /// Creates a pellet at an independently sampled interior point.
    #[must_use]
    pub fn new_random<R: Rng + ?Sized>(rng: &mut R, grid: GridSize) -> Self {
        Self::new(Point::new_random(rng, grid))
    }
}

/// Live pellets and the count the board is kept topped up to.
#[derive(Debug, Clone)]
pub struct FoodSupply {
    pellets: Vec<Pellet>,
    target: usize,
}

impl FoodSupply {
    /// Creates an empty supply; the first replenish fills it.
    #[must_use]
    pub fn new(target: usize) -> Self {
        Self {
            pellets: Vec::new(),
            target,
        }
    }

    /// Creates a supply holding `pellets`.
    #[must_use]
    pub fn with_pellets(pellets: Vec<Pellet>, target: usize) -> Self {
        Self { pellets, target }
    }

    /// Adds random pellets until the target count is reached.
    ///
    /// Without `avoid`, pellets may land on the snake or on each other. With
    /// `avoid`, each new pellet goes to a free interior cell, and filling stops
    /// early when none is left.
    pub fn replenish<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        grid: GridSize,
        avoid: Option<&Snake>,
    ) -> usize {
        let before = self.pellets.len();

        while self.pellets.len() < self.target {
            let pellet = match avoid {
                None => Pellet::new_random(rng, grid),
                Some(snake) => match free_position(rng, grid, snake, &self.pellets) {
                    Some(point) => Pellet::new(point),
                    None => break,
                },
            };
            self.pellets.push(pellet);
        }

        self.pellets.len() - before
    }

    /// Removes the first pellet lying at the eaten pellet's position.
    pub fn remove(&mut self, eaten: Pellet) -> bool {
        let Some(index) = self
            .pellets
            .iter()
            .position(|pellet| pellet.point == eaten.point)
        else {
            return false;
        };

        self.pellets.remove(index);
        true
    }

    #[must_use]
    pub fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pellets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pellets.is_empty()
    }

    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }
}

/// Picks a uniformly random interior cell covered by neither the snake nor a pellet.
#[must_use]
pub fn free_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSize,
    snake: &Snake,
    pellets: &[Pellet],
) -> Option<Point> {
    let mut candidates = Vec::new();

    for y in 1..i32::from(grid.height) {
        for x in 1..i32::from(grid.width) {
            let point = Point::new(x, y);
            if !snake.occupies(point) && !pellets.iter().any(|pellet| pellet.point == point) {
                candidates.push(point);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
