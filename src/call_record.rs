use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::card::{CARDS_PER_ROW, CARDS_PER_SHEET, CELLS, Card, FREE_POSITION, GRID_SIZE, Sheet};
use crate::error::{BingoError, Result};

/// Cells per call-sheet row: three card rows with a spacer after the first two.
pub const RECORD_WIDTH: usize = CARDS_PER_ROW * (GRID_SIZE + 1) - 1;
pub const BLOCKS: usize = CARDS_PER_SHEET / CARDS_PER_ROW;
pub const SPACER_COLUMNS: [usize; 2] = [5, 11];
pub const FREE_COLUMNS: [usize; 3] = [2, 8, 14];
/// Row within each block that holds the free spaces.
pub const FREE_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallCell {
    Number(u8),
    Blank,
    /// The `*` sentinel standing in for a card's free space.
    Free,
}

pub type CallRow = [CallCell; RECORD_WIDTH];

/// A sheet's numbers laid out for call tracking: two blocks of three cards
/// side by side, one 17-cell row per card row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub sheet: usize,
    blocks: [[CallRow; GRID_SIZE]; BLOCKS],
}

impl CallRecord {
    pub fn from_sheet(index: usize, sheet: &Sheet) -> Self {
        let cards = sheet.cards();
        Self::from_cards(index, &std::array::from_fn(|k| Some(cards[k])))
    }

    /// Builds the record; a card that could not be recovered leaves its slice blank.
    pub fn from_cards(index: usize, cards: &[Option<Card>; CARDS_PER_SHEET]) -> Self {
        let mut blocks = [[[CallCell::Blank; RECORD_WIDTH]; GRID_SIZE]; BLOCKS];
        for (block, rows) in blocks.iter_mut().enumerate() {
            for (row, cells) in rows.iter_mut().enumerate() {
                for slot in 0..CARDS_PER_ROW {
                    let Some(card) = &cards[block * CARDS_PER_ROW + slot] else {
                        continue;
                    };
                    for col in 0..GRID_SIZE {
                        cells[slot * (GRID_SIZE + 1) + col] = CallCell::Number(card.get(row, col));
                    }
                }
                if row == FREE_ROW {
                    for col in FREE_COLUMNS {
                        cells[col] = CallCell::Free;
                    }
                }
            }
        }
        Self { sheet: index, blocks }
    }

    /// The ten card rows, cards 1-3 first.
    pub fn card_rows(&self) -> impl Iterator<Item = &CallRow> {
        self.blocks.iter().flatten()
    }

    pub fn blocks(&self) -> &[[CallRow; GRID_SIZE]; BLOCKS] {
        &self.blocks
    }

    /// A card's numbers back in column-major order; `None` at the free space
    /// and wherever the card was missing.
    pub fn card_values(&self, card: usize) -> [Option<u8>; CELLS] {
        let rows = &self.blocks[card / CARDS_PER_ROW];
        let offset = (card % CARDS_PER_ROW) * (GRID_SIZE + 1);
        std::array::from_fn(|p| {
            if p == FREE_POSITION {
                return None;
            }
            match rows[p % GRID_SIZE][offset + p / GRID_SIZE] {
                CallCell::Number(n) => Some(n),
                _ => None,
            }
        })
    }

    pub fn sidecar_path(dir: &Path, index: usize, colour_tag: &str) -> PathBuf {
        dir.join(format!("{index}-{colour_tag}.calls.json"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|source| BingoError::CallRecord { path: path.to_path_buf(), source })?;
        fs::write(path, json).map_err(|e| BingoError::io("failed to write", path, e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| BingoError::io("failed to read", path, e))?;
        serde_json::from_slice(&bytes)
            .map_err(|source| BingoError::CallRecord { path: path.to_path_buf(), source })
    }
}
