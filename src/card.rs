use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 5;
pub const CELLS: usize = GRID_SIZE * GRID_SIZE;
/// Width of each column's number band (B: 1-15, I: 16-30, ... O: 61-75).
pub const BAND_WIDTH: u8 = 15;
/// Column-major index of the centre cell.
pub const FREE_POSITION: usize = 2 * GRID_SIZE + 2;
pub const LETTERS: [char; GRID_SIZE] = ['B', 'I', 'N', 'G', 'O'];

/// One 5x5 card, stored column-major: `values[col * 5 + row]`.
///
/// The centre cell still carries the number drawn for it so the embedded
/// literal keeps 25 entries, but it is never shown or called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    values: [u8; CELLS],
}

impl Card {
    pub fn from_values(values: [u8; CELLS]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[u8; CELLS] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.values[col * GRID_SIZE + row]
    }

    pub fn is_free(row: usize, col: usize) -> bool {
        col * GRID_SIZE + row == FREE_POSITION
    }

    /// Inclusive number band for a 0-indexed column.
    pub fn band(col: usize) -> (u8, u8) {
        let low = BAND_WIDTH * col as u8 + 1;
        (low, low + BAND_WIDTH - 1)
    }
}

/// Draws cards from an owned PRNG so callers decide how it is seeded.
pub struct CardGenerator {
    rng: StdRng,
}

impl CardGenerator {
    pub fn from_os_rng() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn generate_card(&mut self) -> Card {
        generate_card(&mut self.rng)
    }

    pub fn generate_sheet(&mut self) -> Sheet {
        Sheet { cards: std::array::from_fn(|_| self.generate_card()) }
    }
}

pub const CARDS_PER_SHEET: usize = 6;
/// Cards per printed row; a sheet is two rows of three.
pub const CARDS_PER_ROW: usize = 3;

/// The six cards of one output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    cards: [Card; CARDS_PER_SHEET],
}

impl Sheet {
    pub fn new(cards: [Card; CARDS_PER_SHEET]) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card; CARDS_PER_SHEET] {
        &self.cards
    }
}

/// Fills each column with 5 distinct numbers from its band.
pub fn generate_card<R: Rng + ?Sized>(rng: &mut R) -> Card {
    let mut values = [0u8; CELLS];
    for col in 0..GRID_SIZE {
        let (low, _) = Card::band(col);
        let picks = index::sample(rng, BAND_WIDTH as usize, GRID_SIZE);
        for (row, offset) in picks.into_iter().enumerate() {
            values[col * GRID_SIZE + row] = low + offset as u8;
        }
    }
    Card { values }
}
