use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::time::Duration;

use super::{
    config::GameConfig,
    direction::Direction,
    error::GameError,
    food::{BoardFull, FoodSpawner},
    grid::{Cell, Grid},
    snake::SnakeBody,
    snapshot::RenderSnapshot,
};

/// Lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, not started yet
    Idle,
    /// Ticks are being processed
    Running,
    /// Stopped until `restart`
    Ended,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake filled the whole board
    BoardCleared,
}

/// Information about a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether the tick interval shrank this tick
    pub sped_up: bool,
    /// Set when this tick ended the game
    pub ended: Option<EndReason>,
}

/// The snake simulation: owns the body, the food and the progression scalars,
/// and advances them one tick at a time.
///
/// All mutation goes through `&mut self`, so callers serialize input, ticks
/// and snapshot reads by owning the state in a single event loop.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    grid: Grid,
    spawner: FoodSpawner,
    rng: StdRng,
    snake: SnakeBody,
    food: Option<Cell>,
    direction: Direction,
    pending_direction: Direction,
    score: u32,
    tick_interval_ms: u64,
    ticks: u64,
    phase: Phase,
    end_reason: Option<EndReason>,
}

impl GameState {
    /// Create an idle game with an OS-seeded random source
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create an idle game whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self, GameError> {
        config.validate()?;
        let grid = config.grid();

        Ok(Self {
            grid,
            spawner: FoodSpawner::new(),
            rng,
            snake: SnakeBody::new(grid.center()),
            food: None,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            score: 0,
            tick_interval_ms: config.base_interval_ms,
            ticks: 0,
            phase: Phase::Idle,
            end_reason: None,
            config,
        })
    }

    /// `Idle -> Running`
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Idle {
            return Err(self.invalid_transition("start"));
        }
        self.reset()?;
        info!(
            "Game started on a {}x{} board",
            self.grid.cell_count().0,
            self.grid.cell_count().1
        );
        Ok(())
    }

    /// `Ended -> Running`, with the same effect as `start`
    pub fn restart(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Ended {
            return Err(self.invalid_transition("restart"));
        }
        self.reset()?;
        info!("Game restarted");
        Ok(())
    }

    fn invalid_transition(&self, action: &'static str) -> GameError {
        warn!("Rejected {} while {:?}", action, self.phase);
        GameError::InvalidTransition {
            from: self.phase,
            action,
        }
    }

    fn reset(&mut self) -> Result<(), GameError> {
        self.snake = SnakeBody::new(self.grid.center());
        self.food = Some(self.place_food()?);
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.tick_interval_ms = self.config.base_interval_ms;
        self.ticks = 0;
        self.end_reason = None;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Buffer a steering request for the next tick.
    ///
    /// Reversals of the current direction are dropped, and so is anything
    /// sent while the game is not running. The last accepted request before
    /// a tick wins.
    pub fn set_intent(&mut self, direction: Direction) {
        if self.phase != Phase::Running || self.direction.is_opposite(direction) {
            return;
        }
        self.pending_direction = direction;
    }

    /// Advance the simulation by one step.
    ///
    /// A crash leaves the snake untouched and moves the game to `Ended`.
    /// Calling this outside `Running` is a contract violation.
    pub fn tick(&mut self) -> Result<TickResult, GameError> {
        if self.phase != Phase::Running {
            return Err(self.invalid_transition("tick"));
        }

        self.direction = self.pending_direction;
        self.ticks += 1;

        let new_head = self.snake.head().step(self.direction);

        if !self.grid.in_bounds(new_head) {
            return Ok(self.end(EndReason::Wall));
        }

        let ate_food = self.food == Some(new_head);

        if self.snake.would_collide(new_head, ate_food) {
            return Ok(self.end(EndReason::SelfCollision));
        }

        self.snake.advance(new_head, ate_food);

        let mut result = TickResult {
            ate_food,
            ..TickResult::default()
        };

        if ate_food {
            self.score += 1;
            result.sped_up = self.maybe_speed_up();

            match self.place_food() {
                Ok(food) => self.food = Some(food),
                Err(BoardFull) => {
                    self.food = None;
                    result.ended = self.end(EndReason::BoardCleared).ended;
                }
            }
        }

        Ok(result)
    }

    fn maybe_speed_up(&mut self) -> bool {
        if self.score % self.config.speedup_every != 0
            || self.tick_interval_ms <= self.config.interval_floor_ms
        {
            return false;
        }

        self.tick_interval_ms = self
            .tick_interval_ms
            .saturating_sub(self.config.interval_step_ms)
            .max(self.config.interval_floor_ms);
        debug!(
            "Score {} reached, tick interval now {}ms",
            self.score, self.tick_interval_ms
        );
        true
    }

    fn end(&mut self, reason: EndReason) -> TickResult {
        self.phase = Phase::Ended;
        self.end_reason = Some(reason);
        info!(
            "Game ended ({:?}) with score {} after {} ticks",
            reason, self.score, self.ticks
        );
        TickResult {
            ended: Some(reason),
            ..TickResult::default()
        }
    }

    fn place_food(&mut self) -> Result<Cell, BoardFull> {
        let occupied: HashSet<Cell> = self.snake.segments().copied().collect();
        self.spawner.place(&self.grid, &occupied, &mut self.rng)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            segments: self.snake.segments().copied().collect(),
            food: self.food,
            score: self.score,
            speed_level: self.speed_level(),
            phase: self.phase,
            end_reason: self.end_reason,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn speed_level(&self) -> u32 {
        self.config.speed_level(self.tick_interval_ms)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Put a running game into an exact layout
    #[cfg(test)]
    pub(crate) fn arrange(&mut self, body: &[(i32, i32)], direction: Direction, food: (i32, i32)) {
        self.snake = SnakeBody::from_segments(body.iter().map(|&(x, y)| Cell::new(x, y)))
            .expect("test layout needs at least one segment");
        self.direction = direction;
        self.pending_direction = direction;
        self.food = Some(Cell::new(food.0, food.1));
        self.phase = Phase::Running;
        self.end_reason = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn running(config: GameConfig) -> GameState {
        let mut state = GameState::with_seed(config, 11).unwrap();
        state.start().unwrap();
        state
    }

    /// 10x10 cells
    fn small() -> GameState {
        running(GameConfig::small())
    }

    fn cells(state: &GameState) -> Vec<Cell> {
        state.snake().segments().copied().collect()
    }

    #[test]
    fn test_new_game_is_idle() {
        let state = GameState::with_seed(GameConfig::default(), 1).unwrap();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.food(), None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = GameState::new(GameConfig::new(10, 10));
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_start_initializes_game() {
        for (w, h) in [(200, 200), (20, 10), (10, 20), (70, 30), (600, 590)] {
            let state = running(GameConfig::new(w, h));
            let grid = *state.grid();

            assert_eq!(state.phase(), Phase::Running);
            assert_eq!(state.snake().len(), 1);
            assert!(grid.in_bounds(state.snake().head()));
            assert_eq!(state.snake().head(), grid.center());
            assert_eq!(state.direction(), Direction::Right);
            assert_eq!(state.score(), 0);
            assert_eq!(state.tick_interval_ms(), 100);

            let food = state.food().unwrap();
            assert!(grid.in_bounds(food));
            assert!(!state.snake().contains(food));
        }
    }

    #[test]
    fn test_start_twice_is_a_contract_violation() {
        let mut state = small();
        assert_eq!(
            state.start(),
            Err(GameError::InvalidTransition {
                from: Phase::Running,
                action: "start"
            })
        );
    }

    #[test]
    fn test_tick_before_start_fails() {
        let mut state = GameState::with_seed(GameConfig::small(), 1).unwrap();
        assert!(matches!(
            state.tick(),
            Err(GameError::InvalidTransition {
                from: Phase::Idle,
                ..
            })
        ));
    }

    #[test]
    fn test_rejected_tick_leaves_state_untouched() {
        let mut state = GameState::with_seed(GameConfig::small(), 1).unwrap();
        for _ in 0..3 {
            assert!(state.tick().is_err());
        }
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.score(), 0);
        assert_eq!(state.food(), None);

        assert!(state.restart().is_err());
        assert!(state.start().is_ok());
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn test_oversized_board_is_rejected() {
        let config = GameConfig {
            board_width: u32::MAX,
            board_height: 200,
            cell_size: 1,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_basic_movement() {
        let mut state = small();
        state.arrange(&[(5, 5)], Direction::Right, (0, 0));

        let result = state.tick().unwrap();

        assert_eq!(result, TickResult::default());
        assert_eq!(state.snake().head(), Cell::new(6, 5));
        assert_eq!(state.ticks(), 1);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut state = small();
        state.arrange(&[(5, 5), (4, 5)], Direction::Right, (0, 0));

        state.set_intent(Direction::Left);
        state.tick().unwrap();

        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.snake().head(), Cell::new(6, 5));
    }

    #[test]
    fn test_last_intent_before_tick_wins() {
        let mut state = small();
        state.arrange(&[(5, 5)], Direction::Right, (0, 0));

        state.set_intent(Direction::Up);
        state.set_intent(Direction::Down);
        state.tick().unwrap();

        assert_eq!(state.direction(), Direction::Down);
        assert_eq!(state.snake().head(), Cell::new(5, 6));
    }

    #[test]
    fn test_quick_turn_cannot_reverse_within_one_tick() {
        let mut state = small();
        state.arrange(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (0, 0));

        // Up is accepted, then Left is checked against the committed
        // direction (Right) and dropped
        state.set_intent(Direction::Up);
        state.set_intent(Direction::Left);
        let result = state.tick().unwrap();

        assert_eq!(result.ended, None);
        assert_eq!(state.snake().head(), Cell::new(5, 4));
    }

    #[test]
    fn test_intent_ignored_when_not_running() {
        let mut state = GameState::with_seed(GameConfig::small(), 1).unwrap();
        state.set_intent(Direction::Up);
        assert_eq!(state.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_food_consumption() {
        let mut state = small();
        state.arrange(&[(5, 5), (4, 5)], Direction::Right, (6, 5));

        let result = state.tick().unwrap();

        assert!(result.ate_food);
        assert_eq!(result.ended, None);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.snake().tail(), Cell::new(4, 5));

        let food = state.food().unwrap();
        assert!(state.grid().in_bounds(food));
        assert!(!state.snake().contains(food));
    }

    #[test]
    fn test_wall_collision_leaves_snake_untouched() {
        let mut state = small();
        state.arrange(&[(9, 3), (8, 3), (7, 3)], Direction::Right, (0, 0));
        let before = cells(&state);

        let result = state.tick().unwrap();

        assert_eq!(result.ended, Some(EndReason::Wall));
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(state.end_reason(), Some(EndReason::Wall));
        assert_eq!(cells(&state), before);
    }

    #[test]
    fn test_wall_collision_on_every_edge() {
        let cases = [
            ((0, 4), Direction::Left),
            ((4, 0), Direction::Up),
            ((4, 9), Direction::Down),
            ((9, 4), Direction::Right),
        ];

        for ((x, y), dir) in cases {
            let mut state = small();
            state.arrange(&[(x, y)], dir, (5, 5));
            assert_eq!(state.tick().unwrap().ended, Some(EndReason::Wall));
        }
    }

    #[test]
    fn test_self_collision() {
        let mut state = small();
        // Head (2,1) moving Up lands on (2,0), a body segment that is not the tail
        state.arrange(
            &[(2, 1), (1, 1), (1, 0), (2, 0), (3, 0)],
            Direction::Right,
            (8, 8),
        );
        let before = cells(&state);

        state.set_intent(Direction::Up);
        let result = state.tick().unwrap();

        assert_eq!(result.ended, Some(EndReason::SelfCollision));
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(cells(&state), before);
    }

    #[test]
    fn test_moving_into_vacating_tail_is_allowed() {
        let mut state = small();
        state.arrange(&[(1, 1), (0, 1), (0, 0), (1, 0)], Direction::Right, (8, 8));

        state.set_intent(Direction::Up);
        let result = state.tick().unwrap();

        assert_eq!(result.ended, None);
        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(
            cells(&state),
            vec![Cell::new(1, 0), Cell::new(1, 1), Cell::new(0, 1), Cell::new(0, 0)]
        );
    }

    #[test]
    fn test_terminated_game_rejects_ticks() {
        let mut state = small();
        state.arrange(&[(9, 0)], Direction::Right, (0, 0));
        state.tick().unwrap();
        let ticks = state.ticks();

        assert!(state.tick().is_err());
        assert_eq!(state.ticks(), ticks);
    }

    #[test]
    fn test_speed_up_every_five_points() {
        let mut state = small();

        for score in 1..=5 {
            state.arrange(&[(0, 0)], Direction::Down, (0, 1));
            let result = state.tick().unwrap();

            assert!(result.ate_food);
            assert_eq!(state.score(), score);
            assert_eq!(result.sped_up, score == 5);
        }

        assert_eq!(state.tick_interval_ms(), 90);
        assert_eq!(state.speed_level(), 2);
    }

    #[test]
    fn test_speed_never_drops_below_floor() {
        let mut state = small();

        for _ in 0..60 {
            state.arrange(&[(0, 0)], Direction::Down, (0, 1));
            state.tick().unwrap();
        }

        assert_eq!(state.score(), 60);
        assert_eq!(state.tick_interval_ms(), 20);
        assert_eq!(state.speed_level(), 9);
    }

    #[test]
    fn test_floor_clamps_partial_step() {
        let config = GameConfig {
            base_interval_ms: 100,
            interval_step_ms: 30,
            interval_floor_ms: 50,
            speedup_every: 1,
            ..GameConfig::small()
        };
        let mut state = running(config);

        let mut intervals = Vec::new();
        for _ in 0..4 {
            state.arrange(&[(0, 0)], Direction::Down, (0, 1));
            state.tick().unwrap();
            intervals.push(state.tick_interval_ms());
        }

        assert_eq!(intervals, vec![70, 50, 50, 50]);
    }

    #[test]
    fn test_filling_board_is_a_win() {
        // 2x1 board: the snake starts at (1,0), food can only be at (0,0)
        let mut state = running(GameConfig::new(20, 10));
        assert_eq!(state.snake().head(), Cell::new(1, 0));
        assert_eq!(state.food(), Some(Cell::new(0, 0)));

        // Left is the reverse of Right, so point the snake at the food directly
        state.arrange(&[(1, 0)], Direction::Left, (0, 0));
        let result = state.tick().unwrap();

        assert!(result.ate_food);
        assert_eq!(result.ended, Some(EndReason::BoardCleared));
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(state.end_reason(), Some(EndReason::BoardCleared));
        assert_eq!(state.snake().len(), 2);
        assert_eq!(state.food(), None);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = small();
        for _ in 0..10 {
            state.arrange(&[(0, 0)], Direction::Down, (0, 1));
            state.tick().unwrap();
        }
        state.arrange(&[(9, 9), (8, 9)], Direction::Right, (0, 0));
        state.tick().unwrap();
        assert_eq!(state.phase(), Phase::Ended);

        state.restart().unwrap();

        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().head(), state.grid().center());
        assert_eq!(state.score(), 0);
        assert_eq!(state.tick_interval_ms(), 100);
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.end_reason(), None);
        assert!(!state.snake().contains(state.food().unwrap()));
    }

    #[test]
    fn test_restart_only_from_ended() {
        let mut state = small();
        assert!(matches!(
            state.restart(),
            Err(GameError::InvalidTransition {
                from: Phase::Running,
                ..
            })
        ));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(99);

        for seed in 0..20 {
            let mut state = running(GameConfig::small());
            let grid = *state.grid();

            for _ in 0..500 {
                let dir = Direction::ALL[rng.random_range(0..4)];
                if !state.direction().is_opposite(dir) {
                    state.set_intent(dir);
                }

                let len_before = state.snake().len();
                let result = state.tick().unwrap();

                if result.ended.is_some() && !result.ate_food {
                    break;
                }

                let body = cells(&state);
                let unique: HashSet<Cell> = body.iter().copied().collect();
                assert_eq!(unique.len(), body.len(), "seed {seed}: duplicate cell");
                assert!(body.iter().all(|c| grid.in_bounds(*c)));

                if result.ate_food {
                    assert_eq!(body.len(), len_before + 1);
                } else {
                    assert_eq!(body.len(), len_before);
                }

                match state.food() {
                    Some(food) => assert!(!unique.contains(&food)),
                    None => assert_eq!(state.phase(), Phase::Ended),
                }

                if state.phase() == Phase::Ended {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = small();
        state.arrange(&[(3, 3), (2, 3)], Direction::Right, (4, 3));
        state.tick().unwrap();

        let snapshot = state.snapshot();

        assert_eq!(snapshot.segments, cells(&state));
        assert_eq!(snapshot.food, state.food());
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.speed_level, 1);
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.end_reason, None);
    }
}
