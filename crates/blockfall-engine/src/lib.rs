pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the field")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("command ignored while the game is {_0}")]
pub struct NotPlayingError(#[error(not(source))] pub GameState);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum CommandError {
    #[display("{_0}")]
    NotPlaying(NotPlayingError),
    #[display("{_0}")]
    Collision(PieceCollisionError),
}
