use serde::Serialize;

use crate::{
    CommandError, NotPlayingError, PieceCollisionError,
    core::{
        field::Field,
        piece::{Piece, PieceKind},
    },
};

use super::{
    game_stats::GameStats,
    random::{PieceRng, PieceSeed, RandomSource},
    snapshot::GameSnapshot,
};

/// Overall state of a game.
///
/// The engine enters `GameOver` on its own when a new piece cannot spawn.
/// `Paused` is only ever entered through [`GameEngine::toggle_pause`], which is
/// left for the input layer to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant, Serialize)]
pub enum GameState {
    #[display("playing")]
    Playing,
    #[display("paused")]
    Paused,
    #[display("over")]
    GameOver,
}

/// What happened when a piece was locked into the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    /// Number of lines removed by this lock.
    pub cleared_lines: usize,
    /// Points awarded for those lines.
    pub points: usize,
    /// Whether the next piece failed to spawn.
    pub game_over: bool,
}

/// Result of a successful [`GameEngine::move_down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved one row down and is still falling.
    Moved,
    /// The piece could not move; it was locked and the next piece spawned.
    Locked(LockReport),
}

/// The rules engine: owns the field, the falling piece and the statistics.
///
/// All commands except [`Self::new_game`] and [`Self::toggle_pause`] fail with
/// [`NotPlayingError`] unless the game is [`GameState::Playing`]; a failed
/// command never changes any state.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameEngine, GameState};
///
/// let mut engine = GameEngine::new();
/// assert_eq!(engine.state(), GameState::Playing);
///
/// engine.move_left().ok();
/// engine.rotate().ok();
///
/// let report = engine.hard_drop().unwrap();
/// assert_eq!(report.cleared_lines, 0);
/// assert_eq!(engine.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine<R = PieceRng> {
    field: Field,
    current: Option<Piece>,
    stats: GameStats,
    state: GameState,
    random: R,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Starts a game with a randomly seeded piece generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_random(PieceRng::new())
    }

    /// Starts a game whose piece sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_random(PieceRng::with_seed(seed))
    }
}

impl<R> GameEngine<R>
where
    R: RandomSource,
{
    /// Starts a game that draws piece kinds from `random`.
    #[must_use]
    pub fn with_random(random: R) -> Self {
        let mut engine = Self {
            field: Field::INITIAL,
            current: None,
            stats: GameStats::new(),
            state: GameState::Playing,
            random,
        };
        engine.new_game();
        engine
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Returns the piece in play, or `None` once the game is over.
    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Returns where the current piece would lock if hard-dropped now.
    #[must_use]
    pub fn drop_preview(&self) -> Option<Piece> {
        let mut piece = self.current?;
        while self.field.can_place(&piece, 0, 1) {
            piece.shift(0, 1);
        }
        Some(piece)
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::new(
            &self.field,
            self.current.as_ref(),
            &self.stats,
            self.state,
        )
    }

    /// Resets the field and statistics and spawns the first piece.
    ///
    /// Callable in any state.
    pub fn new_game(&mut self) {
        self.field.clear();
        self.stats = GameStats::new();
        self.state = GameState::Playing;
        self.spawn();
    }

    /// Switches between `Playing` and `Paused`; a finished game stays over.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            GameState::GameOver => GameState::GameOver,
        };
    }

    pub fn move_left(&mut self) -> Result<(), CommandError> {
        self.shift_piece(-1, 0)
    }

    pub fn move_right(&mut self) -> Result<(), CommandError> {
        self.shift_piece(1, 0)
    }

    /// Moves the piece one row down, locking it if it cannot move.
    pub fn move_down(&mut self) -> Result<DropOutcome, NotPlayingError> {
        let (field, piece) = self.piece_in_play()?;
        if field.can_place(piece, 0, 1) {
            piece.shift(0, 1);
            return Ok(DropOutcome::Moved);
        }
        Ok(DropOutcome::Locked(self.lock_piece()))
    }

    /// Rotates the piece clockwise in place.
    ///
    /// There are no wall kicks: if the rotated piece does not fit at its current
    /// anchor, the rotation is undone and the command fails.
    pub fn rotate(&mut self) -> Result<(), CommandError> {
        let (field, piece) = self.piece_in_play()?;
        piece.rotate_clockwise();
        if field.can_place(piece, 0, 0) {
            return Ok(());
        }
        for _ in 0..3 {
            piece.rotate_clockwise();
        }
        Err(PieceCollisionError.into())
    }

    /// Drops the piece to its resting position and locks it.
    pub fn hard_drop(&mut self) -> Result<LockReport, NotPlayingError> {
        loop {
            if let DropOutcome::Locked(report) = self.move_down()? {
                return Ok(report);
            }
        }
    }

    fn piece_in_play(&mut self) -> Result<(&Field, &mut Piece), NotPlayingError> {
        match (self.state, &mut self.current) {
            (GameState::Playing, Some(piece)) => Ok((&self.field, piece)),
            (state, _) => Err(NotPlayingError(state)),
        }
    }

    fn shift_piece(&mut self, dx: i32, dy: i32) -> Result<(), CommandError> {
        let (field, piece) = self.piece_in_play()?;
        if !field.can_place(piece, dx, dy) {
            return Err(PieceCollisionError.into());
        }
        piece.shift(dx, dy);
        Ok(())
    }

    fn spawn(&mut self) {
        let index = self.random.next_below(PieceKind::LEN) % PieceKind::LEN;
        let piece = Piece::new(PieceKind::ALL[index]);
        if self.field.can_place(&piece, 0, 0) {
            self.current = Some(piece);
        } else {
            self.current = None;
            self.state = GameState::GameOver;
        }
    }

    fn lock_piece(&mut self) -> LockReport {
        if let Some(piece) = self.current.take() {
            self.field.place(&piece);
        }
        let cleared_lines = self.clear_completed_lines();
        let points = self.stats.complete_piece_drop(cleared_lines);
        self.spawn();
        LockReport {
            cleared_lines,
            points,
            game_over: self.state.is_game_over(),
        }
    }

    /// Removes full rows, scanning from the bottom up.
    ///
    /// After a removal the same row index is tested again, since the row above
    /// has moved into it.
    fn clear_completed_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = Field::HEIGHT;
        while y > 0 {
            if self.field.is_row_full(y - 1) {
                self.field.remove_line(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Block;

    /// Hands out a fixed, repeating sequence of piece kinds.
    #[derive(Debug, Clone)]
    struct ScriptedKinds {
        kinds: Vec<PieceKind>,
        next: usize,
    }

    impl ScriptedKinds {
        fn new(kinds: &[PieceKind]) -> Self {
            Self {
                kinds: kinds.to_vec(),
                next: 0,
            }
        }
    }

    impl RandomSource for ScriptedKinds {
        fn next_below(&mut self, upper: usize) -> usize {
            assert_eq!(upper, PieceKind::LEN);
            let kind = self.kinds[self.next % self.kinds.len()];
            self.next += 1;
            kind as usize
        }
    }

    fn engine_with(kinds: &[PieceKind]) -> GameEngine<ScriptedKinds> {
        GameEngine::with_random(ScriptedKinds::new(kinds))
    }

    /// Vertical I-piece occupying column 0, rows 16..=19.
    fn vertical_i_in_left_column() -> Piece {
        let mut piece = Piece::new(PieceKind::I);
        piece.rotate_clockwise();
        piece.shift(-5, 16);
        piece
    }

    fn piece(engine: &GameEngine<ScriptedKinds>) -> Piece {
        *engine.current_piece().expect("piece in play")
    }

    #[test]
    fn test_new_game_initial_state() {
        let engine = engine_with(&[PieceKind::T]);
        assert_eq!(engine.state(), GameState::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.total_cleared_lines(), 0);
        assert_eq!(engine.field(), &Field::INITIAL);
        assert_eq!(piece(&engine), Piece::new(PieceKind::T));
    }

    #[test]
    fn test_first_spawn_always_fits() {
        for kind in PieceKind::ALL {
            let engine = engine_with(&[kind]);
            let piece = piece(&engine);
            assert_eq!(piece.kind(), kind);
            assert!(engine.field().can_place(&piece, 0, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_move_left_and_right() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.move_left().unwrap();
        assert_eq!(piece(&engine).position(), (2, 0));
        engine.move_right().unwrap();
        engine.move_right().unwrap();
        assert_eq!(piece(&engine).position(), (4, 0));
    }

    #[test]
    fn test_move_against_wall_fails_without_mutation() {
        let mut engine = engine_with(&[PieceKind::O]);
        // O occupies mask columns 1..=2, so the anchor stops at x = -1.
        while engine.move_left().is_ok() {}
        let before = piece(&engine);
        assert_eq!(before.x(), -1);
        assert_eq!(
            engine.move_left(),
            Err(CommandError::Collision(PieceCollisionError))
        );
        assert_eq!(piece(&engine), before);

        while engine.move_right().is_ok() {}
        assert_eq!(piece(&engine).x(), Field::WIDTH as i32 - 3);
    }

    #[test]
    fn test_move_down_moves_then_locks() {
        let mut engine = engine_with(&[PieceKind::O, PieceKind::T]);
        assert_eq!(engine.move_down(), Ok(DropOutcome::Moved));
        assert_eq!(piece(&engine).y(), 1);

        let mut moves = 1;
        let report = loop {
            match engine.move_down().unwrap() {
                DropOutcome::Moved => moves += 1,
                DropOutcome::Locked(report) => break report,
            }
        };
        // O sits in mask rows 1..=2, so it rests with its anchor at y = 17.
        assert_eq!(moves, 17);
        assert_eq!(
            report,
            LockReport {
                cleared_lines: 0,
                points: 0,
                game_over: false,
            }
        );
        assert_eq!(engine.field().occupied_count(), 4);
        assert_eq!(engine.field().get_cell(4, 19), Block::Piece(PieceKind::O));
        assert_eq!(piece(&engine), Piece::new(PieceKind::T));
    }

    #[test]
    fn test_hard_drop_lands_on_drop_preview() {
        let mut engine = engine_with(&[PieceKind::J, PieceKind::S]);
        engine.field = Field::from_ascii(
            "
            ...ZZ.....
            ....ZZ....
            ",
        );
        let preview = engine.drop_preview().unwrap();
        let report = engine.hard_drop().unwrap();
        assert_eq!(report.cleared_lines, 0);
        for (x, y) in preview.occupied_cells() {
            assert_eq!(engine.field().get_cell(x, y), Block::Piece(PieceKind::J));
        }
        assert_eq!(engine.field().occupied_count(), 8);
        assert_eq!(piece(&engine).kind(), PieceKind::S);
    }

    #[test]
    fn test_rotate_restores_mask_at_right_wall() {
        let mut engine = engine_with(&[PieceKind::I]);
        engine.rotate().unwrap();
        while engine.move_right().is_ok() {}
        let before = piece(&engine);
        assert_eq!(before.occupied_cells()[0].0, Field::WIDTH as i32 - 1);

        assert_eq!(
            engine.rotate(),
            Err(CommandError::Collision(PieceCollisionError))
        );
        assert_eq!(piece(&engine), before);
    }

    #[test]
    fn test_rotate_blocked_by_settled_blocks() {
        let mut engine = engine_with(&[PieceKind::T]);
        // T rotated clockwise needs mask cell (2, 3), i.e. field cell (5, 3).
        engine.field = Field::from_ascii(
            "
            .....L....
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ",
        );
        assert_eq!(engine.field().get_cell(5, 3), Block::Piece(PieceKind::L));
        let before = piece(&engine);
        assert!(engine.rotate().is_err());
        assert_eq!(piece(&engine), before);
    }

    #[test]
    fn test_single_line_clear() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.field = Field::from_ascii(".IIIIIIIII");
        engine.current = Some(vertical_i_in_left_column());

        let outcome = engine.move_down().unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Locked(LockReport {
                cleared_lines: 1,
                points: 100,
                game_over: false,
            })
        );
        assert_eq!(engine.total_cleared_lines(), 1);
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.level(), 1);
        // The three upper cells of the I remain, shifted down by one row.
        assert_eq!(engine.field().occupied_count(), 3);
        for y in 17..20 {
            assert_eq!(engine.field().get_cell(0, y), Block::Piece(PieceKind::I));
        }
    }

    #[test]
    fn test_multi_line_clears_score_by_table() {
        let full_but_first = ".ZZZZZZZZZ";
        let partial = ".ZZZZZZZZ.";
        for cleared in 0..=4 {
            let mut engine = engine_with(&[PieceKind::O]);
            let rows: Vec<&str> = (0..4)
                .map(|i| if i < 4 - cleared { partial } else { full_but_first })
                .collect();
            engine.field = Field::from_ascii(&rows.join("\n"));
            engine.current = Some(vertical_i_in_left_column());

            let report = engine.hard_drop().unwrap();
            assert_eq!(report.cleared_lines, cleared);
            assert_eq!(report.points, GameStats::base_points(cleared));
            assert_eq!(engine.total_cleared_lines(), cleared);
            assert_eq!(engine.score(), [0, 100, 300, 500, 800][cleared]);
        }
    }

    #[test]
    fn test_non_adjacent_full_rows_are_all_cleared() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.field = Field::from_ascii(
            "
            .SSSSSSSSS
            .SSSSS.SSS
            .SSSSSSSSS
            .SSSSSSS.S
            ",
        );
        engine.current = Some(vertical_i_in_left_column());
        let report = engine.hard_drop().unwrap();
        assert_eq!(report.cleared_lines, 2);
        assert_eq!(report.points, 300);
        let rows: Vec<String> = engine.field().row_strings().collect();
        assert_eq!(rows[18], "ISSSSS.SSS");
        assert_eq!(rows[19], "ISSSSSSS.S");
        assert_eq!(engine.field().occupied_count(), 18);
    }

    #[test]
    fn test_points_scale_with_level_before_clear() {
        let mut engine = engine_with(&[PieceKind::O]);
        for _ in 0..9 {
            engine.stats.complete_piece_drop(1);
        }
        let score_before = engine.score();
        engine.field = Field::from_ascii(".IIIIIIIII\n.IIIIIIIII");
        engine.current = Some(vertical_i_in_left_column());

        let report = engine.hard_drop().unwrap();
        assert_eq!(report.points, 300);
        assert_eq!(engine.score(), score_before + 300);
        assert_eq!(engine.total_cleared_lines(), 11);
        assert_eq!(engine.level(), 2);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut engine = engine_with(&[PieceKind::T]);
        engine.field.clear();
        engine.field.place(&Piece::new(PieceKind::T));
        engine.current = None;

        engine.spawn();
        assert_eq!(engine.state(), GameState::GameOver);
        assert_eq!(engine.current_piece(), None);

        let field_before = engine.field().clone();
        let not_playing = NotPlayingError(GameState::GameOver);
        assert_eq!(engine.move_left(), Err(not_playing.into()));
        assert_eq!(engine.move_right(), Err(not_playing.into()));
        assert_eq!(engine.rotate(), Err(not_playing.into()));
        assert_eq!(engine.move_down(), Err(not_playing));
        assert_eq!(engine.hard_drop(), Err(not_playing));
        assert_eq!(engine.field(), &field_before);
        assert_eq!(engine.current_piece(), None);
    }

    #[test]
    fn test_lock_reports_game_over() {
        let mut engine = engine_with(&[PieceKind::O]);
        let mut stack = Piece::new(PieceKind::O);
        for _ in 0..9 {
            stack.shift(0, 2);
            engine.field.place(&stack);
        }
        // Column 4..=5 is filled from row 3 down; the next O fits only at spawn.
        let report = engine.hard_drop().unwrap();
        assert!(report.game_over);
        assert!(engine.state().is_game_over());
        assert_eq!(engine.current_piece(), None);
        assert_eq!(engine.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_new_game_recovers_from_game_over() {
        let mut engine = engine_with(&[PieceKind::L]);
        engine.state = GameState::GameOver;
        engine.current = None;
        engine.field = Field::from_ascii("LLLLL.....");
        engine.stats.complete_piece_drop(3);

        engine.new_game();
        assert_eq!(engine.state(), GameState::Playing);
        assert_eq!(engine.field(), &Field::INITIAL);
        assert_eq!(engine.stats(), &GameStats::new());
        assert_eq!(piece(&engine), Piece::new(PieceKind::L));
    }

    #[test]
    fn test_toggle_pause() {
        let mut engine = engine_with(&[PieceKind::S]);
        engine.toggle_pause();
        assert_eq!(engine.state(), GameState::Paused);

        let before = piece(&engine);
        let paused = NotPlayingError(GameState::Paused);
        assert_eq!(engine.move_left(), Err(paused.into()));
        assert_eq!(engine.move_down(), Err(paused));
        assert_eq!(engine.hard_drop(), Err(paused));
        assert_eq!(piece(&engine), before);

        engine.toggle_pause();
        assert_eq!(engine.state(), GameState::Playing);
        assert!(engine.move_left().is_ok());

        engine.state = GameState::GameOver;
        engine.toggle_pause();
        assert_eq!(engine.state(), GameState::GameOver);
    }

    #[test]
    fn test_drop_preview_does_not_move_piece() {
        let mut engine = engine_with(&[PieceKind::Z]);
        let before = piece(&engine);
        let preview = engine.drop_preview().unwrap();
        assert_eq!(preview.mask(), before.mask());
        assert_eq!(preview.x(), before.x());
        assert_eq!(preview.y(), 17);
        assert_eq!(piece(&engine), before);

        engine.state = GameState::GameOver;
        engine.current = None;
        assert_eq!(engine.drop_preview(), None);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let seed = PieceSeed::from_bytes([7; 16]);
        let mut first = GameEngine::with_seed(seed);
        let mut second = GameEngine::with_seed(seed);
        for _ in 0..30 {
            assert_eq!(first.current_piece(), second.current_piece());
            if first.hard_drop().is_err() {
                break;
            }
            second.hard_drop().unwrap();
        }
        assert_eq!(first.field(), second.field());
    }
}
