use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinates outside the board")]
    InvalidCoords,
    #[error("mine count must be smaller than the board area")]
    TooManyMines,
    #[error("board must be at least one cell wide and tall")]
    EmptyBoard,
}

pub type Result<T> = core::result::Result<T, GameError>;
