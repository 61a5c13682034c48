use ndarray::Array2;

use crate::*;

/// Uniform placement by rejection: sample a cell, retry on collision,
/// until the requested number of distinct cells is mined.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMineLayoutGenerator {
    seed: u64,
}

impl RandomMineLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineLayoutGenerator for RandomMineLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        debug_assert!(config.mines < config.total_cells());

        let (width, height) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut placed: CellCount = 0;
        while placed < config.mines {
            let coords: Coord2 = (rng.random_range(0..width), rng.random_range(0..height));
            let cell = &mut mine_mask[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                placed += 1;
            }
        }

        log::debug!(
            "placed {} mines on a {}x{} board (seed {:#018x})",
            placed,
            width,
            height,
            self.seed
        );
        MineLayout::from_mine_mask(mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mines() {
        for mines in [0, 1, 10, 50, 99] {
            let config = GameConfig::new((10, 10), mines).unwrap();
            let layout = RandomMineLayoutGenerator::new(7).generate(config);
            assert_eq!(layout.mine_count(), mines);
            assert_eq!(layout.safe_cell_count(), 100 - mines);
        }
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let config = GameConfig::new((8, 8), 12).unwrap();
        let a = RandomMineLayoutGenerator::new(42).generate(config);
        let b = RandomMineLayoutGenerator::new(42).generate(config);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let config = GameConfig::new((8, 8), 12).unwrap();
        let a = RandomMineLayoutGenerator::new(1).generate(config);
        let b = RandomMineLayoutGenerator::new(2).generate(config);
        assert_ne!(a, b);
    }

    #[test]
    fn near_full_board_terminates() {
        let config = GameConfig::new((4, 4), 15).unwrap();
        let layout = RandomMineLayoutGenerator::new(3).generate(config);
        assert_eq!(layout.mine_count(), 15);
        assert_eq!(layout.safe_cell_count(), 1);
    }
}
