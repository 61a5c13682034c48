use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of one round. `Win` and `GameOver` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Idle,
    /// Transient "entering a move" feedback; nothing currently produces it.
    MakingMove,
    Win,
    GameOver,
}

impl RoundStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::GameOver)
    }

    /// Status-bar face shown for this state.
    pub const fn face(self) -> &'static str {
        match self {
            Self::Idle => ":)",
            Self::MakingMove => ":O",
            Self::Win => "B)",
            Self::GameOver => "X(",
        }
    }
}

impl Default for RoundStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// One playthrough over a fixed mine layout: the per-cell marks, the
/// reveal expansion, and the win/loss scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    layout: MineLayout,
    marks: Array2<CellMark>,
    status: RoundStatus,
}

impl Round {
    pub fn new(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            marks: Array2::default(size.to_nd_index()),
            status: RoundStatus::default(),
        }
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn mark_at(&self, coords: Coord2) -> CellMark {
        self.marks[coords.to_nd_index()]
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.layout.contains_mine(coords)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> i8 {
        self.layout.adjacent_mine_count(coords)
    }

    pub fn flagged_cells(&self) -> CellCount {
        self.count_marks(CellMark::Flagged)
    }

    pub fn revealed_cells(&self) -> CellCount {
        self.count_marks(CellMark::Revealed)
    }

    /// Mines minus flags. Goes negative when the player over-flags; the
    /// value is reported as-is.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.layout.mine_count()) - i32::from(self.flagged_cells())
    }

    /// Advance the flag cycle at `coords`. Revealed cells and finished
    /// rounds are left untouched.
    pub fn flag(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.status.is_terminal() {
            return Ok(ActionOutcome::NoChange);
        }

        let mark = self.marks[coords.to_nd_index()];
        let next = mark.cycled();
        if next == mark {
            return Ok(ActionOutcome::NoChange);
        }
        self.marks[coords.to_nd_index()] = next;
        Ok(ActionOutcome::Changed)
    }

    /// Open the cell at `coords`, expanding across zero-count cells with
    /// a worklist instead of recursion.
    ///
    /// Flagged cells cannot be opened. Opening a mined cell records the
    /// mark like any other; the loss is picked up by the next `evaluate`
    /// pass, not here.
    pub fn reveal(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.status.is_terminal() || !self.marks[coords.to_nd_index()].is_openable() {
            return Ok(ActionOutcome::NoChange);
        }

        let mut frontier = VecDeque::from([coords]);
        let mut opened: CellCount = 0;
        while let Some(cell) = frontier.pop_front() {
            if !self.marks[cell.to_nd_index()].is_openable() {
                continue;
            }
            self.marks[cell.to_nd_index()] = CellMark::Revealed;
            opened += 1;
            if self.layout.adjacent_mine_count(cell) == 0 {
                frontier.extend(self.layout.iter_neighbors(cell));
            }
        }

        log::trace!("opened {} cells starting from {:?}", opened, coords);
        Ok(ActionOutcome::Changed)
    }

    /// Re-derive the round status from the board: any revealed mine loses
    /// the round, a full set of revealed safe cells wins it, anything
    /// else leaves the status alone. Idempotent, safe to call after
    /// every action including ones that changed nothing.
    pub fn evaluate(&mut self) -> RoundStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        let mut revealed: CellCount = 0;
        for (idx, &mark) in self.marks.indexed_iter() {
            if mark != CellMark::Revealed {
                continue;
            }
            let coords = (idx.0 as Coord, idx.1 as Coord);
            if self.layout.contains_mine(coords) {
                log::debug!("mine opened at {:?}, round lost", coords);
                self.status = RoundStatus::GameOver;
                return self.status;
            }
            revealed += 1;
        }

        if revealed == self.layout.safe_cell_count() {
            log::debug!("all {} safe cells opened, round won", revealed);
            self.status = RoundStatus::Win;
        }
        self.status
    }

    fn count_marks(&self, wanted: CellMark) -> CellCount {
        self.marks.iter().filter(|&&mark| mark == wanted).count() as CellCount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(size: Coord2, mines: &[Coord2]) -> Round {
        Round::new(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn reveal_floods_the_zero_region_and_its_border() {
        // Mine in one corner: everything else is a single zero region
        // plus the three numbered cells around the mine.
        let mut r = round((5, 5), &[(4, 4)]);

        r.reveal((0, 0)).unwrap();

        for x in 0..5 {
            for y in 0..5 {
                let expected = if (x, y) == (4, 4) {
                    CellMark::Hidden
                } else {
                    CellMark::Revealed
                };
                assert_eq!(r.mark_at((x, y)), expected, "at {:?}", (x, y));
            }
        }
        // Border cells carry counts, interior cells are zero.
        assert_eq!(r.adjacent_mine_count((3, 3)), 1);
        assert_eq!(r.adjacent_mine_count((0, 0)), 0);
    }

    #[test]
    fn flood_stops_at_numbered_cells() {
        // 5x1 strip with a mine in the middle: revealing the left end
        // must not spill past the numbered cell next to the mine.
        let mut r = round((5, 1), &[(2, 0)]);

        r.reveal((0, 0)).unwrap();

        assert_eq!(r.mark_at((0, 0)), CellMark::Revealed);
        assert_eq!(r.mark_at((1, 0)), CellMark::Revealed);
        assert_eq!(r.mark_at((2, 0)), CellMark::Hidden);
        assert_eq!(r.mark_at((3, 0)), CellMark::Hidden);
        assert_eq!(r.mark_at((4, 0)), CellMark::Hidden);
        assert_eq!(r.evaluate(), RoundStatus::Idle);
    }

    #[test]
    fn finishing_the_far_side_wins() {
        let mut r = round((5, 1), &[(2, 0)]);
        r.reveal((0, 0)).unwrap();
        r.evaluate();

        r.reveal((4, 0)).unwrap();

        assert_eq!(r.mark_at((3, 0)), CellMark::Revealed);
        assert_eq!(r.evaluate(), RoundStatus::Win);
        assert_eq!(r.mark_at((2, 0)), CellMark::Hidden);
    }

    #[test]
    fn revealing_a_mine_loses_on_the_next_evaluate() {
        let mut r = round((3, 3), &[(1, 1)]);

        r.reveal((1, 1)).unwrap();

        // The mark is recorded like any other reveal.
        assert_eq!(r.mark_at((1, 1)), CellMark::Revealed);
        assert_eq!(r.evaluate(), RoundStatus::GameOver);
    }

    #[test]
    fn flag_cycle_never_reaches_revealed() {
        let mut r = round((2, 2), &[(0, 0)]);

        for _ in 0..3 {
            assert_eq!(r.flag((0, 1)).unwrap(), ActionOutcome::Changed);
        }
        assert_eq!(r.mark_at((0, 1)), CellMark::Hidden);

        r.flag((0, 1)).unwrap();
        assert_eq!(r.mark_at((0, 1)), CellMark::Flagged);
    }

    #[test]
    fn flagged_cells_cannot_be_revealed() {
        let mut r = round((2, 2), &[(0, 0)]);
        r.flag((0, 0)).unwrap();

        assert_eq!(r.reveal((0, 0)).unwrap(), ActionOutcome::NoChange);
        assert_eq!(r.mark_at((0, 0)), CellMark::Flagged);
        assert_eq!(r.evaluate(), RoundStatus::Idle);
    }

    #[test]
    fn questioned_cells_can_be_revealed() {
        let mut r = round((2, 2), &[(0, 0)]);
        r.flag((1, 1)).unwrap();
        r.flag((1, 1)).unwrap();
        assert_eq!(r.mark_at((1, 1)), CellMark::Questioned);

        assert_eq!(r.reveal((1, 1)).unwrap(), ActionOutcome::Changed);
        assert_eq!(r.mark_at((1, 1)), CellMark::Revealed);
    }

    #[test]
    fn revealed_cells_ignore_both_actions() {
        let mut r = round((2, 2), &[(0, 0)]);
        r.reveal((1, 1)).unwrap();

        assert_eq!(r.flag((1, 1)).unwrap(), ActionOutcome::NoChange);
        assert_eq!(r.reveal((1, 1)).unwrap(), ActionOutcome::NoChange);
        assert_eq!(r.mark_at((1, 1)), CellMark::Revealed);
    }

    #[test]
    fn mines_left_goes_negative_when_over_flagged() {
        let mut r = round((3, 3), &[(0, 0)]);
        assert_eq!(r.mines_left(), 1);

        r.flag((0, 0)).unwrap();
        assert_eq!(r.mines_left(), 0);

        r.flag((1, 0)).unwrap();
        r.flag((2, 0)).unwrap();
        assert_eq!(r.mines_left(), -2);
    }

    #[test]
    fn finished_rounds_reject_further_actions() {
        let mut r = round((2, 2), &[(0, 0)]);
        r.reveal((0, 0)).unwrap();
        assert_eq!(r.evaluate(), RoundStatus::GameOver);

        assert_eq!(r.flag((1, 1)).unwrap(), ActionOutcome::NoChange);
        assert_eq!(r.reveal((1, 1)).unwrap(), ActionOutcome::NoChange);
        assert_eq!(r.evaluate(), RoundStatus::GameOver);
    }

    #[test]
    fn out_of_range_coords_are_an_error() {
        let mut r = round((2, 2), &[(0, 0)]);
        assert_eq!(r.reveal((2, 0)).unwrap_err(), GameError::InvalidCoords);
        assert_eq!(r.flag((0, 2)).unwrap_err(), GameError::InvalidCoords);
    }

    #[test]
    fn ten_by_ten_clear_sweep_wins() {
        // All ten mines in the top row, all flagged; one reveal from the
        // bottom floods everything up to the numbered border below them.
        let top_row: [Coord2; 10] = core::array::from_fn(|x| (x as Coord, 0));
        let mut r = round((10, 10), &top_row);

        for coords in top_row {
            r.flag(coords).unwrap();
        }
        assert_eq!(r.mines_left(), 0);

        r.reveal((0, 9)).unwrap();
        assert_eq!(r.evaluate(), RoundStatus::Win);
        assert_eq!(r.revealed_cells(), 90);
        assert_eq!(r.mines_left(), 0);
    }

    #[test]
    fn large_flood_reveals_only_the_connected_region() {
        // A solid wall of mines across row 5 cuts the board in half;
        // flooding from the bottom must stop at the wall's border row.
        let wall: [Coord2; 10] = core::array::from_fn(|x| (x as Coord, 5));
        let mut r = round((10, 10), &wall);
        assert_eq!(r.total_mines(), 10);

        r.reveal((0, 9)).unwrap();

        assert_eq!(r.evaluate(), RoundStatus::Idle);
        assert_eq!(r.revealed_cells(), 40);
        for x in 0..10 {
            for y in 0..5 {
                assert_eq!(r.mark_at((x, y)), CellMark::Hidden, "at {:?}", (x, y));
            }
        }
    }

    #[test]
    fn evaluate_is_a_no_op_without_reveals() {
        let mut r = round((3, 3), &[(1, 1)]);
        assert_eq!(r.evaluate(), RoundStatus::Idle);
        r.flag((0, 0)).unwrap();
        assert_eq!(r.evaluate(), RoundStatus::Idle);
    }

    #[test]
    fn faces_are_fixed_per_status() {
        assert_eq!(RoundStatus::Idle.face(), ":)");
        assert_eq!(RoundStatus::MakingMove.face(), ":O");
        assert_eq!(RoundStatus::Win.face(), "B)");
        assert_eq!(RoundStatus::GameOver.face(), "X(");
    }
}
