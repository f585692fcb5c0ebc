use std::time::Duration;

use blockfall_engine::{DropOutcome, GameEngine, GameSnapshot, GameState, PieceSeed};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    tui::{App, RenderMode, Tui},
    ui::widgets::GameDisplay,
};

const FPS: f64 = 60.0;

/// Returns the gravity interval for a level: one second at level 1, 100 ms faster
/// per level, never below 100 ms.
fn gravity_interval(level: usize) -> Duration {
    let speedup = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    let millis = 1000_u64.saturating_sub(speedup.saturating_mul(100)).max(100);
    Duration::from_millis(millis)
}

#[derive(Debug)]
pub struct PlayApp {
    engine: GameEngine,
    seed: PieceSeed,
    show_ghost: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(seed: PieceSeed, show_ghost: bool) -> Self {
        Self {
            engine: GameEngine::with_seed(seed),
            seed,
            show_ghost,
            is_exiting: false,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.engine.snapshot()
    }

    fn is_playing(&self) -> bool {
        !self.is_exiting && self.engine.state().is_playing()
    }

    fn apply_gravity_speed(&self, tui: &mut Tui) {
        let interval = self
            .is_playing()
            .then(|| gravity_interval(self.engine.level()));
        tui.set_tick_interval(interval);
    }

    fn handle_key(&mut self, tui: &mut Tui, code: KeyCode) {
        let is_playing = self.is_playing();
        match code {
            KeyCode::Left if is_playing => _ = self.engine.move_left(),
            KeyCode::Right if is_playing => _ = self.engine.move_right(),
            KeyCode::Up | KeyCode::Char('x') if is_playing => _ = self.engine.rotate(),
            KeyCode::Down if is_playing => {
                if let Ok(DropOutcome::Locked(_)) = self.engine.move_down() {
                    tui.reset_tick();
                }
            }
            KeyCode::Char(' ') if is_playing => {
                if self.engine.hard_drop().is_ok() {
                    tui.reset_tick();
                }
            }
            KeyCode::Char('p') => self.engine.toggle_pause(),
            KeyCode::Char('n') => {
                self.engine.new_game();
                tui.reset_tick();
            }
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.apply_gravity_speed(tui);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(event) = event.as_key_event() {
            self.handle_key(tui, event.code);
        }
        self.apply_gravity_speed(tui);
    }

    fn draw(&self, frame: &mut Frame) {
        let game_display = GameDisplay::new(&self.engine, self.seed, self.show_ghost);
        let help_text = match self.engine.state() {
            GameState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | Space (Hard Drop) | ↑ X (Rotate) | P (Pause) | N (New) | Q (Quit)"
            }
            GameState::Paused => "Controls: P (Resume) | N (New) | Q (Quit)",
            GameState::GameOver => "Controls: N (New) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(game_display.height()), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        if self.is_playing() {
            _ = self.engine.move_down();
        }
        self.apply_gravity_speed(tui);
    }
}
