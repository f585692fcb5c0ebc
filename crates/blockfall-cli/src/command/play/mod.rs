use std::io::{self, Write as _};

use blockfall_engine::{GameSnapshot, PieceSeed};
use rand::Rng as _;
use serde::Serialize;

use crate::{command::play::app::PlayApp, tui::Tui};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence, as 32 hex digits (random if omitted)
    #[clap(long, value_name = "HEX")]
    pub(crate) seed: Option<PieceSeed>,
    /// Do not draw the landing preview of the falling piece
    #[clap(long)]
    pub(crate) no_ghost: bool,
    /// Print the final game state as JSON instead of a text summary
    #[clap(long)]
    pub(crate) json_summary: bool,
}

/// Final report printed after the terminal is restored.
#[derive(Debug, Serialize)]
struct Summary {
    seed: PieceSeed,
    #[serde(flatten)]
    snapshot: GameSnapshot,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        no_ghost,
        json_summary,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut app = PlayApp::new(seed, !*no_ghost);
    Tui::new().run(&mut app)?;

    let summary = Summary {
        seed,
        snapshot: app.snapshot(),
    };
    let mut stdout = io::stdout().lock();
    if *json_summary {
        serde_json::to_writer_pretty(&mut stdout, &summary)?;
        writeln!(stdout)?;
    } else {
        write_summary(&mut stdout, &summary)?;
    }
    Ok(())
}

fn write_summary<W>(mut writer: W, summary: &Summary) -> io::Result<()>
where
    W: io::Write,
{
    let Summary { seed, snapshot } = summary;
    writeln!(writer, "State:  {}", snapshot.state)?;
    writeln!(writer, "Score:  {}", snapshot.score)?;
    writeln!(writer, "Level:  {}", snapshot.level)?;
    writeln!(writer, "Lines:  {}", snapshot.lines)?;
    writeln!(writer, "Pieces: {}", snapshot.completed_pieces)?;
    writeln!(writer, "Seed:   {seed}")?;
    Ok(())
}
