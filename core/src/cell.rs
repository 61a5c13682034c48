use serde::{Deserialize, Serialize};

/// Player-visible marking of a single cell.
///
/// `Revealed` is terminal: once a cell is open, no action changes it again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellMark {
    Hidden,
    Flagged,
    Questioned,
    Revealed,
}

impl CellMark {
    /// Whether a reveal action may open this cell.
    pub const fn is_openable(self) -> bool {
        matches!(self, Self::Hidden | Self::Questioned)
    }

    /// Next step in the flag cycle: hidden, flagged, questioned, hidden.
    pub const fn cycled(self) -> Self {
        match self {
            Self::Hidden => Self::Flagged,
            Self::Flagged => Self::Questioned,
            Self::Questioned => Self::Hidden,
            Self::Revealed => Self::Revealed,
        }
    }
}

impl Default for CellMark {
    fn default() -> Self {
        Self::Hidden
    }
}
