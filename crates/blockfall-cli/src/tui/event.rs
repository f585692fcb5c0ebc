use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Gravity timing (based on `tick_interval`).
    Tick,
    /// Screen render timing.
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}
