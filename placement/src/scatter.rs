//! Starting positions for pieces, split between two side columns.

use pinpin_core::{Difficulty, Point, ScreenSize};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_SCATTER_SEED: u64 = 0x5049_4e50_494e_0001;

/// Tuning for where pieces are scattered before the puzzle starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterConfig {
    /// Distance between the screen edge and the outer side of each column.
    pub margin_x: f32,
    /// Distance between the screen edge and the inner side of each column.
    pub column_width: f32,
    /// Distance kept from the top and bottom screen edges.
    pub margin_y: f32,
    /// Seed for the scatter rng; equal seeds scatter identically.
    pub seed: u64,
}

impl ScatterConfig {
    /// Layout used by the magnetic map.
    #[must_use]
    pub const fn easy(seed: u64) -> Self {
        Self {
            margin_x: 50.0,
            column_width: 250.0,
            margin_y: 100.0,
            seed,
        }
    }

    /// Layout used by the precision map.
    #[must_use]
    pub const fn hard(seed: u64) -> Self {
        Self {
            margin_x: 50.0,
            column_width: 300.0,
            margin_y: 50.0,
            seed,
        }
    }

    /// Layout for the provided difficulty.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        match difficulty {
            Difficulty::Easy => Self::easy(seed),
            Difficulty::Hard => Self::hard(seed),
        }
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self::easy(DEFAULT_SCATTER_SEED)
    }
}

/// Even indices land in the left column, odd indices in the right one.
pub(crate) fn scatter_positions(count: usize, screen: ScreenSize, config: &ScatterConfig) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let width = screen.width();
    let height = screen.height();

    (0..count)
        .map(|index| {
            let x = if index % 2 == 0 {
                sample(&mut rng, config.margin_x, config.column_width)
            } else {
                sample(&mut rng, width - config.column_width, width - config.margin_x)
            };
            let y = sample(&mut rng, config.margin_y, height - config.margin_y);
            Point::new(x, y)
        })
        .collect()
}

fn sample(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
