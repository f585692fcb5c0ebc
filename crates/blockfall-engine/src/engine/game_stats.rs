use serde::Serialize;

/// Base points for line clears, indexed by the number of lines cleared at once.
///
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
pub const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Cumulative lines needed per level.
pub const LINES_PER_LEVEL: usize = 10;

/// Score, line and level bookkeeping for one game.
///
/// - **Score**: base points of each clear multiplied by the level before the clear
/// - **Level**: derived from total lines cleared, `total / 10 + 1`
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: number of locks that cleared 0, 1, 2, 3 or 4 lines
///
/// The level is never stored or incremented; it is recomputed from the line
/// count, so a single clear may skip levels if it crosses several boundaries.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.level(), 1);
///
/// let points = stats.complete_piece_drop(4);
/// assert_eq!(points, 800);
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new tracker: score 0, no lines, level 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level, starting at 1 and rising every 10 lines.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / LINES_PER_LEVEL + 1
    }

    /// Returns the total number of pieces that have been locked.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by the number of lines they cleared.
    ///
    /// - `[0]`: locks that cleared nothing
    /// - `[1]`..`[4]`: singles, doubles, triples and four-line clears
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Returns the base points for clearing `cleared_lines` lines at once.
    ///
    /// Counts outside the table earn nothing.
    #[must_use]
    pub fn base_points(cleared_lines: usize) -> usize {
        SCORE_TABLE.get(cleared_lines).copied().unwrap_or(0)
    }

    /// Records a locked piece and returns the points it earned.
    ///
    /// Scoring only runs when at least one line was cleared.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        self.completed_pieces += 1;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        if cleared_lines == 0 {
            return 0;
        }
        self.score_line_clear(cleared_lines)
    }

    fn score_line_clear(&mut self, cleared_lines: usize) -> usize {
        let points = Self::base_points(cleared_lines) * self.level();
        self.score += points;
        self.total_cleared_lines += cleared_lines;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.completed_pieces(), 0);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_base_points() {
        let points: Vec<_> = (0..=6).map(GameStats::base_points).collect();
        assert_eq!(points, [0, 100, 300, 500, 800, 0, 0]);
    }

    #[test]
    fn test_level_boundaries() {
        let mut stats = GameStats::new();
        let mut levels = vec![(0, stats.level())];
        for _ in 0..20 {
            stats.complete_piece_drop(1);
            levels.push((stats.total_cleared_lines(), stats.level()));
        }
        for (lines, expected) in [(0, 1), (9, 1), (10, 2), (19, 2), (20, 3)] {
            assert_eq!(levels[lines], (lines, expected), "after {lines} lines");
        }
    }

    #[test]
    fn test_points_use_level_before_clear() {
        let mut stats = GameStats::new();
        for _ in 0..9 {
            stats.complete_piece_drop(1);
        }
        assert_eq!(stats.score(), 900);
        assert_eq!(stats.level(), 1);

        // 9 -> 13 lines crosses into level 2, but this clear is still scored at level 1.
        assert_eq!(stats.complete_piece_drop(4), 800);
        assert_eq!(stats.level(), 2);

        assert_eq!(stats.complete_piece_drop(2), 600);
        assert_eq!(stats.score(), 900 + 800 + 600);
    }

    #[test]
    fn test_points_per_clear_size() {
        for (cleared, expected) in [(0, 0), (1, 100), (2, 300), (3, 500), (4, 800)] {
            let mut stats = GameStats::new();
            assert_eq!(stats.complete_piece_drop(cleared), expected);
            assert_eq!(stats.score(), expected);
            assert_eq!(stats.total_cleared_lines(), cleared);
        }
    }

    #[test]
    fn test_oversized_clear_counts_lines_without_points() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(25), 0);
        assert_eq!(stats.total_cleared_lines(), 25);
        assert_eq!(stats.level(), 3);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_counter_and_pieces() {
        let mut stats = GameStats::new();
        for cleared in [0, 0, 1, 2, 4, 1] {
            stats.complete_piece_drop(cleared);
        }
        assert_eq!(stats.completed_pieces(), 6);
        assert_eq!(stats.line_cleared_counter(), &[2, 2, 1, 0, 1]);
    }
}
