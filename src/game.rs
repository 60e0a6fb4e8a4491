use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::canvas::RenderSurface;
use crate::config::{GameConfig, GridSize, THEME_CLASSIC, Theme};
use crate::food::FoodSupply;
use crate::snake::Snake;

/// Lifecycle of one game. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Stopped,
}

/// What ended the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Result of one call to [`Game::tick`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The snake moved; `ate` tells whether a pellet was consumed.
    Moved { ate: bool },
    /// A collision was detected this tick and the game stopped.
    Collided(DeathReason),
    /// The game had already stopped; nothing happened.
    Halted,
}

/// Fixed-rate periodic timer driven by the caller's clock.
#[derive(Debug, Clone, Copy)]
pub struct TickTimer {
    period: Duration,
    next_fire: Option<Instant>,
}

impl TickTimer {
    /// Creates a timer that has not been started.
    #[must_use]
    pub fn idle(period: Duration) -> Self {
        Self {
            period,
            next_fire: None,
        }
    }

    /// Arms the timer; the first fire is one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_fire = Some(now + self.period);
    }

    /// Returns true once per elapsed period.
    ///
    /// A caller that fell more than a period behind gets a single fire, and the
    /// schedule restarts from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.next_fire else {
            return false;
        };
        if now < deadline {
            return false;
        }

        let next = deadline + self.period;
        self.next_fire = Some(if next <= now { now + self.period } else { next });
        true
    }

    pub fn cancel(&mut self) {
        self.next_fire = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.next_fire.is_some()
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns how long until the next fire, or `None` when cancelled.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_fire
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// Handle for the key listener; key presses reach the snake only while attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyListener {
    attached: bool,
}

impl KeyListener {
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// One game session: a snake, its food, the render surface, and the timer and
/// key listener that drive it.
pub struct Game<S: RenderSurface> {
    snake: Snake,
    food: FoodSupply,
    grid: GridSize,
    avoid_occupied_cells: bool,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    tick_count: u64,
    timer: TickTimer,
    listener: KeyListener,
    surface: S,
    theme: &'static Theme,
    rng: StdRng,
}

impl<S: RenderSurface> Game<S> {
    /// Creates a game seeded from OS entropy.
    #[must_use]
    pub fn new(config: &GameConfig, surface: S) -> Self {
        Self::with_rng(config, surface, StdRng::from_entropy())
    }

    /// Creates a deterministic game for tests and reproducible runs.
    #[must_use]
    pub fn with_seed(config: &GameConfig, surface: S, seed: u64) -> Self {
        Self::with_rng(config, surface, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, surface: S, rng: StdRng) -> Self {
        let snake = Snake::new(config.start, config.start_direction, config.keymap.clone())
            .with_growth_increment(config.growth_per_pellet);

        Self {
            snake,
            food: FoodSupply::new(config.food_target),
            grid: config.grid(),
            avoid_occupied_cells: config.avoid_occupied_cells,
            status: GameStatus::Running,
            death_reason: None,
            tick_count: 0,
            timer: TickTimer::idle(config.tick_interval()),
            listener: KeyListener::default(),
            surface,
            theme: &THEME_CLASSIC,
            rng,
        }
    }

    /// Replaces the snake, e.g. to set up a scenario.
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Replaces the food supply, e.g. to set up a scenario.
    pub fn set_food(&mut self, food: FoodSupply) {
        self.food = food;
    }

    /// Attaches the key listener and starts the tick timer.
    pub fn play(&mut self, now: Instant) {
        if self.status == GameStatus::Stopped {
            return;
        }

        self.listener.attach();
        self.timer.start(now);
        info!(
            width = self.grid.width,
            height = self.grid.height,
            period = ?self.timer.period(),
            "game started"
        );
    }

    /// Forwards a key press to the snake while the listener is attached.
    pub fn handle_key(&mut self, key: &str) {
        if !self.listener.is_attached() {
            return;
        }

        if !self.snake.handle_key(key) {
            trace!(key, "ignored unmapped key");
        }
    }

    /// Runs one tick if the timer has fired. Returns the outcome when it did.
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        if !self.timer.poll(now) {
            return None;
        }

        Some(self.tick())
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status == GameStatus::Stopped {
            return TickOutcome::Halted;
        }

        self.tick_count += 1;
        trace!(tick = self.tick_count, "tick");

        if let Some(reason) = self.detect_collision() {
            self.stop(reason);
            return TickOutcome::Collided(reason);
        }

        self.surface.clear();
        for pellet in self.food.pellets() {
            self.surface.draw_circle(pellet.point, self.theme.pellet);
        }

        self.snake.advance();
        self.snake.apply_growth();
        for segment in self.snake.segments() {
            self.surface.draw_circle(*segment, self.theme.snake);
        }

        let eaten = self.snake.consumes_food(self.food.pellets()).copied();
        if let Some(pellet) = eaten {
            self.food.remove(pellet);
            self.snake.grow();
            debug!(
                x = pellet.point.x,
                y = pellet.point.y,
                owed = self.snake.pending_growth(),
                "pellet eaten"
            );
        }

        let avoid = self.avoid_occupied_cells.then_some(&self.snake);
        self.food.replenish(&mut self.rng, self.grid, avoid);

        TickOutcome::Moved {
            ate: eaten.is_some(),
        }
    }

    fn detect_collision(&self) -> Option<DeathReason> {
        if self.snake.will_crash_into_wall(self.grid) {
            return Some(DeathReason::WallCollision);
        }
        if self.snake.will_crash_into_self() {
            return Some(DeathReason::SelfCollision);
        }

        None
    }

    fn stop(&mut self, reason: DeathReason) {
        self.timer.cancel();
        self.listener.detach();
        self.status = GameStatus::Stopped;
        self.death_reason = Some(reason);
        info!(
            ?reason,
            ticks = self.tick_count,
            length = self.snake.len(),
            "game over"
        );
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> &FoodSupply {
        &self.food
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    #[must_use]
    pub fn listener(&self) -> &KeyListener {
        &self.listener
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn theme(&self) -> &'static Theme {
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use ratatui::style::Color;

    use crate::canvas::RenderSurface;
    use crate::config::{GameConfig, THEME_CLASSIC};
    use crate::food::{FoodSupply, Pellet};
    use crate::input::{Direction, KeyMap};
    use crate::snake::{Point, Snake};

    use super::{DeathReason, Game, GameStatus, TickOutcome, TickTimer};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Circle(Point, Color),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl RenderSurface for Recorder {
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn draw_circle(&mut self, at: Point, color: Color) {
            self.calls.push(Call::Circle(at, color));
        }
    }

    fn game_with(snake: Snake, pellets: Vec<Pellet>) -> Game<Recorder> {
        let config = GameConfig::default();
        let mut game = Game::with_seed(&config, Recorder::default(), 17);
        game.set_snake(snake);
        game.set_food(FoodSupply::with_pellets(pellets, config.food_target));
        game
    }

    #[test]
    fn tick_renders_food_before_moved_snake() {
        let snake = Snake::new(Point::new(5, 5), Direction::Right, KeyMap::default());
        let pellet = Pellet::new(Point::new(10, 10));
        let mut game = game_with(snake, vec![pellet]);

        game.tick();

        let calls = &game.surface().calls;
        assert_eq!(calls[0], Call::Clear);
        assert_eq!(calls[1], Call::Circle(Point::new(10, 10), THEME_CLASSIC.pellet));
        assert_eq!(calls[2], Call::Circle(Point::new(6, 5), THEME_CLASSIC.snake));
        assert_eq!(calls.len(), 3);
        assert_eq!(game.food().len(), 3);
    }

    #[test]
    fn eating_removes_pellet_and_owes_growth() {
        let snake = Snake::new(Point::new(5, 5), Direction::Right, KeyMap::default());
        let mut game = game_with(snake, vec![Pellet::new(Point::new(6, 5))]);

        assert_eq!(game.tick(), TickOutcome::Moved { ate: true });
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().pending_growth(), 2);
        assert_eq!(game.food().len(), 3);

        // Clear the board so no fresh pellet sits on the path.
        game.set_food(FoodSupply::new(0));
        game.tick();
        assert_eq!(game.snake().len(), 2);
        game.tick();
        assert_eq!(game.snake().len(), 3);
        game.tick();
        assert_eq!(game.snake().len(), 3);
    }

    #[test]
    fn wall_collision_stops_without_moving() {
        let snake = Snake::new(Point::new(29, 3), Direction::Right, KeyMap::default());
        let mut game = game_with(snake, Vec::new());
        game.play(Instant::now());

        assert_eq!(
            game.tick(),
            TickOutcome::Collided(DeathReason::WallCollision)
        );
        assert_eq!(game.status(), GameStatus::Stopped);
        assert_eq!(game.snake().head(), Point::new(29, 3));
        assert!(!game.timer().is_active());
        assert!(!game.listener().is_attached());
        assert!(game.surface().calls.is_empty());
    }

    #[test]
    fn no_tick_runs_after_stop() {
        let snake = Snake::new(Point::new(1, 3), Direction::Left, KeyMap::default());
        let mut game = game_with(snake, Vec::new());

        game.tick();
        let ticks = game.tick_count();

        assert_eq!(game.tick(), TickOutcome::Halted);
        assert_eq!(game.tick_count(), ticks);
    }

    #[test]
    fn keys_are_ignored_until_play() {
        let snake = Snake::new(Point::new(5, 5), Direction::Right, KeyMap::default());
        let mut game = game_with(snake, Vec::new());

        game.handle_key("ArrowUp");
        assert_eq!(game.snake().pending_direction(), Direction::Right);

        game.play(Instant::now());
        game.handle_key("ArrowUp");
        assert_eq!(game.snake().pending_direction(), Direction::Up);
    }

    #[test]
    fn poll_ticks_only_when_the_timer_fires() {
        let snake = Snake::new(Point::new(5, 5), Direction::Right, KeyMap::default());
        let mut game = game_with(snake, Vec::new());
        let start = Instant::now();
        game.play(start);

        assert_eq!(game.poll(start + Duration::from_millis(399)), None);
        assert!(game.poll(start + Duration::from_millis(400)).is_some());
        assert_eq!(game.poll(start + Duration::from_millis(401)), None);
        assert_eq!(game.snake().head(), Point::new(6, 5));
    }

    #[test]
    fn timer_fires_at_fixed_rate_and_resyncs_after_stall() {
        let start = Instant::now();
        let period = Duration::from_millis(100);
        let mut timer = TickTimer::idle(period);
        assert!(!timer.poll(start + period));

        timer.start(start);
        assert!(timer.poll(start + Duration::from_millis(120)));
        assert_eq!(
            timer.time_until_next(start + Duration::from_millis(120)),
            Some(Duration::from_millis(80))
        );

        assert!(timer.poll(start + Duration::from_millis(900)));
        assert!(!timer.poll(start + Duration::from_millis(950)));
        assert!(timer.poll(start + Duration::from_millis(1000)));

        timer.cancel();
        assert!(!timer.poll(start + Duration::from_secs(10)));
        assert_eq!(timer.time_until_next(start), None);
    }
}
