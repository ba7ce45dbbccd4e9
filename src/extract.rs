//! Recovers card numbers from rendered sheets.
//!
//! A sheet document carries each card as a `$cardN = [..];` line. Reading
//! those lines back is the only way to rebuild call records for sheets that
//! were generated by an earlier run.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::call_record::CallRecord;
use crate::card::{CARDS_PER_SHEET, CELLS, Card};
use crate::error::{BingoError, Result};
use crate::render::sheet_html_path;

static CARD_LITERAL_REGEX: OnceLock<Regex> = OnceLock::new();

fn card_literal_regex() -> &'static Regex {
    CARD_LITERAL_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\$card(\d+) = \[([^\]]*)\];").expect("invalid regex pattern")
    })
}

/// Finds each card literal in `document`. A slot stays `None` when its line
/// is absent or does not hold exactly 25 numbers.
pub fn parse_cards(document: &str) -> [Option<Card>; CARDS_PER_SHEET] {
    let mut cards = [None; CARDS_PER_SHEET];
    for caps in card_literal_regex().captures_iter(document) {
        let Some(slot) = caps[1].parse::<usize>().ok().filter(|k| (1..=CARDS_PER_SHEET).contains(k))
        else {
            warn!(card = &caps[1], "ignoring literal for unknown card");
            continue;
        };
        if cards[slot - 1].is_some() {
            warn!(card = slot, "duplicate card literal, keeping the first");
            continue;
        }
        match parse_values(&caps[2]) {
            Some(values) => cards[slot - 1] = Some(Card::from_values(values)),
            None => warn!(card = slot, "card literal does not hold 25 numbers"),
        }
    }
    cards
}

fn parse_values(list: &str) -> Option<[u8; CELLS]> {
    let values: Vec<u8> = list
        .split(',')
        .map(|v| v.trim().parse().ok())
        .collect::<Option<_>>()?;
    values.try_into().ok()
}

/// Rebuilds the call record for sheet `index` from its document text.
pub fn extract_call_record(index: usize, document: &str) -> CallRecord {
    let cards = parse_cards(document);
    let missing = cards.iter().filter(|c| c.is_none()).count();
    if missing > 0 {
        warn!(sheet = index, missing, "some cards could not be recovered; their rows stay blank");
    }
    CallRecord::from_cards(index, &cards)
}

/// Reads one sheet document from disk.
pub fn read_sheet(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BingoError::MissingSheet { path: path.to_path_buf() },
        _ => BingoError::io("failed to read", path, e),
    })
}

/// Extracts sheets `1..=count` of colour `colour_tag` in `dir` and writes
/// each record as a JSON sidecar. Returns the sidecar paths in sheet order.
///
/// Every sheet is read before any sidecar is written, so a missing sheet
/// leaves the directory as it was.
pub fn extract_sheet_files(dir: &Path, count: usize, colour_tag: &str) -> Result<Vec<PathBuf>> {
    info!("Extracting numbers from {count} {}", if count == 1 { "card" } else { "cards" });
    let records = (1..=count)
        .map(|index| {
            let path = sheet_html_path(dir, index, colour_tag);
            Ok(extract_call_record(index, &read_sheet(&path)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut sidecars = Vec::with_capacity(count);
    for record in &records {
        let sidecar = CallRecord::sidecar_path(dir, record.sheet, colour_tag);
        if let Err(e) = record.save(&sidecar) {
            remove_sidecars(&sidecars);
            return Err(e);
        }
        debug!(sidecar = %sidecar.display(), "extracted");
        sidecars.push(sidecar);
    }
    info!("Extraction complete");
    Ok(sidecars)
}

fn remove_sidecars(sidecars: &[PathBuf]) {
    for sidecar in sidecars {
        if let Err(e) = fs::remove_file(sidecar) {
            warn!(path = %sidecar.display(), error = %e, "failed to remove sidecar");
        }
    }
}
