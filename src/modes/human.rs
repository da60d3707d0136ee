use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::clock::SimulationClock;
use crate::game::{GameConfig, GameState, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, ViewOptions};

/// Keyboard-driven play in the terminal.
///
/// Owns the game state outright: key events, clock fires and frame draws are
/// all handled by one task, one at a time.
pub struct HumanMode {
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    view: ViewOptions,
    should_quit: bool,
}

impl HumanMode {
    /// Build a session and start the first game. `seed` makes food
    /// placement reproducible.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let view = ViewOptions {
            show_grid: config.show_grid,
        };
        let mut state = match seed {
            Some(seed) => GameState::with_seed(config, seed)?,
            None => GameState::new(config)?,
        };
        state.start()?;

        let mut metrics = GameMetrics::new();
        metrics.on_game_start();

        Ok(Self {
            state,
            metrics,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            view,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut clock = SimulationClock::new(self.state.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            let running = self.state.phase() == Phase::Running;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event)? {
                            clock.set_interval(self.state.tick_interval());
                            clock.rearm();
                        }
                    }
                }

                // Simulation tick; the interval may have changed, so it is
                // re-read before arming the next one
                _ = clock.tick(), if running => {
                    self.update_game()?;
                    clock.set_interval(self.state.tick_interval());
                    clock.rearm();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.state.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            &snapshot,
                            self.state.grid(),
                            self.view,
                            &self.metrics,
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("Quitting after {} games", self.metrics.games_played);
                break;
            }
        }

        Ok(())
    }

    /// Returns true when a new game was started
    fn handle_event(&mut self, event: Event) -> Result<bool> {
        let Event::Key(key) = event else {
            return Ok(false);
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => self.state.set_intent(direction),
            KeyAction::ToggleGrid => {
                self.view.show_grid = !self.view.show_grid;
                debug!("Grid overlay {}", if self.view.show_grid { "on" } else { "off" });
            }
            KeyAction::Restart if self.state.phase() == Phase::Ended => {
                self.restart_game()?;
                return Ok(true);
            }
            KeyAction::Restart => {}
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }

        Ok(false)
    }

    fn update_game(&mut self) -> Result<()> {
        let result = self.state.tick()?;

        if let Some(reason) = result.ended {
            self.metrics.on_game_over(self.state.score(), reason);
        }

        Ok(())
    }

    fn restart_game(&mut self) -> Result<()> {
        self.state.restart()?;
        self.metrics.on_game_start();
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
