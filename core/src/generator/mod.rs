use crate::*;
pub use random::*;

mod random;

/// Strategy for placing the mines of a new round.
pub trait MineLayoutGenerator {
    /// Build a layout for `config`. Relies on the `GameConfig` invariant
    /// `mines < total_cells`; a hand-rolled config violating it may spin.
    fn generate(self, config: GameConfig) -> MineLayout;
}
