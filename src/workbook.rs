//! Excel call sheet: a `CALL` sheet the caller types drawn numbers into, plus
//! one sheet per bingo sheet whose cells light up once their number is called.
//!
//! Card sheet layout (1-indexed, as Excel shows it):
//!
//! ```text
//!      A   B-F     G   H-L     M   N-R     S
//!  1   #   #####   #   #####   #   #####   #     border
//!  2       BINGO       BINGO       BINGO   #     header
//!  3-7 #   card 1  #   card 2  #   card 3  #
//!  8   #   #####   #   #####   #   #####   #     border
//!  9       BINGO       BINGO       BINGO   #     header
//! 10-14#   card 4  #   card 5  #   card 6  #
//! 15   #   #####   #   #####   #   #####   #     border
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, ConditionalFormatFormula, Format, FormatAlign, Workbook, Worksheet};
use tracing::{debug, info};

use crate::call_record::{CallCell, CallRecord, RECORD_WIDTH};
use crate::card::{CARDS_PER_ROW, GRID_SIZE, LETTERS};
use crate::error::{BingoError, Result};

pub const CALL_SHEET: &str = "CALL";
/// Numbers per letter in 75-ball bingo, so the most a CALL column can hold.
const CALLS_PER_LETTER: u32 = 15;

const LAST_COL: u16 = RECORD_WIDTH as u16 + 1;
const BORDER_COLUMNS: [u16; 4] = [0, 6, 12, LAST_COL];
const BORDER_ROWS: [u32; 3] = [0, 7, 14];
const HEADER_ROWS: [u32; 2] = [1, 8];
const BLOCK_FIRST_ROWS: [u32; 2] = [2, 9];

const AMBER: u32 = 0xFFC000;
const GREY: u32 = 0xB2B2B2;

struct Formats {
    border: Format,
    header: Format,
    number: Format,
    free: Format,
    called: Format,
    call_header: Format,
    call_column: Format,
}

impl Formats {
    fn new() -> Self {
        let centred =
            Format::new().set_align(FormatAlign::Center).set_align(FormatAlign::VerticalCenter);
        Self {
            border: centred.clone().set_background_color(Color::RGB(GREY)),
            header: centred.clone().set_bold().set_font_name("Arial").set_font_size(15),
            number: centred.clone(),
            free: centred.clone().set_background_color(Color::RGB(AMBER)),
            called: Format::new().set_background_color(Color::RGB(AMBER)),
            call_header: centred
                .clone()
                .set_bold()
                .set_font_name("Arial")
                .set_font_size(20)
                .set_font_color(Color::RGB(0xFF0000)),
            call_column: centred.set_bold().set_font_name("Arial").set_font_size(20),
        }
    }
}

/// Writes the CALL sheet plus one sheet per record to `path`.
pub fn build_workbook(records: &[CallRecord], path: &Path) -> Result<()> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    write_call_sheet(workbook.add_worksheet(), &formats)?;
    for record in records {
        let sheet = workbook.add_worksheet();
        sheet.set_name(record.sheet.to_string())?;
        write_card_sheet(sheet, record, &formats)?;
    }

    workbook.save(path)?;
    info!(path = %path.display(), sheets = records.len(), "wrote call sheet workbook");
    Ok(())
}

/// Builds the workbook from extraction sidecars, then deletes the sidecars
/// whether or not the workbook could be written.
pub fn assemble_from_sidecars(sidecars: &[PathBuf], path: &Path) -> Result<()> {
    let records = sidecars.iter().map(|p| CallRecord::load(p)).collect::<Result<Vec<_>>>()?;
    let built = build_workbook(&records, path);
    for sidecar in sidecars {
        fs::remove_file(sidecar).map_err(|e| BingoError::io("failed to remove", sidecar, e))?;
        debug!(path = %sidecar.display(), "removed sidecar");
    }
    built
}

fn write_call_sheet(sheet: &mut Worksheet, formats: &Formats) -> Result<()> {
    sheet.set_name(CALL_SHEET)?;
    for (col, letter) in LETTERS.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_format(col, &formats.call_column)?;
        sheet.set_column_width(col, 8)?;
        sheet.write_with_format(0, col, letter.to_string(), &formats.call_header)?;
    }
    for row in 0..=CALLS_PER_LETTER {
        sheet.set_row_height(row, 20)?;
    }
    Ok(())
}

fn write_card_sheet(sheet: &mut Worksheet, record: &CallRecord, formats: &Formats) -> Result<()> {
    for col in 0..=LAST_COL {
        sheet.set_column_width(col, 5)?;
    }
    for row in 0..=BORDER_ROWS[2] {
        sheet.set_row_height(row, 20)?;
        for col in 0..=LAST_COL {
            if BORDER_ROWS.contains(&row) || BORDER_COLUMNS.contains(&col) {
                sheet.write_blank(row, col, &formats.border)?;
            } else if HEADER_ROWS.contains(&row) {
                let letter = LETTERS[(col as usize - 1) % (GRID_SIZE + 1)];
                sheet.write_with_format(row, col, letter.to_string(), &formats.header)?;
            }
        }
    }

    for (block, rows) in record.blocks().iter().enumerate() {
        let first_row = BLOCK_FIRST_ROWS[block];
        for (offset, cells) in rows.iter().enumerate() {
            let row = first_row + offset as u32;
            for (c, cell) in cells.iter().enumerate() {
                let col = c as u16 + 1;
                match cell {
                    CallCell::Number(n) => {
                        sheet.write_with_format(row, col, f64::from(*n), &formats.number)?;
                    }
                    CallCell::Free => {
                        sheet.write_with_format(row, col, "*", &formats.free)?;
                    }
                    CallCell::Blank => {}
                }
            }
        }
        add_call_highlights(sheet, first_row, formats)?;
    }
    Ok(())
}

/// Highlights a card cell when its number appears in the CALL column of the
/// same letter.
fn add_call_highlights(sheet: &mut Worksheet, first_row: u32, formats: &Formats) -> Result<()> {
    let last_row = first_row + GRID_SIZE as u32 - 1;
    for slot in 0..CARDS_PER_ROW {
        for letter in 0..GRID_SIZE {
            let col = (slot * (GRID_SIZE + 1) + letter + 1) as u16;
            let rule = ConditionalFormatFormula::new()
                .set_rule(called_rule(col, first_row, letter).as_str())
                .set_format(&formats.called);
            sheet.add_conditional_format(first_row, col, last_row, col, &rule)?;
        }
    }
    Ok(())
}

/// `=NOT(ISNA(MATCH(B3,CALL!$A$2:$A$16,0)))` for the top-left cell of a range.
fn called_rule(col: u16, row: u32, letter: usize) -> String {
    let call_col = column_name(letter as u16);
    format!(
        "=NOT(ISNA(MATCH({}{},{CALL_SHEET}!${call_col}$2:${call_col}${},0)))",
        column_name(col),
        row + 1,
        CALLS_PER_LETTER + 1
    )
}

fn column_name(col: u16) -> char {
    (b'A' + col as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardGenerator;
    use std::io::Read;

    fn read_part(path: &Path, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    fn records(n: usize) -> Vec<CallRecord> {
        let mut generator = CardGenerator::seeded(42);
        (1..=n).map(|i| CallRecord::from_sheet(i, &generator.generate_sheet())).collect()
    }

    #[test]
    fn test_called_rule() {
        assert_eq!(called_rule(1, 2, 0), "=NOT(ISNA(MATCH(B3,CALL!$A$2:$A$16,0)))");
        assert_eq!(called_rule(17, 9, 4), "=NOT(ISNA(MATCH(R10,CALL!$E$2:$E$16,0)))");
    }

    #[test]
    fn test_workbook_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BLUE-cards.xlsx");
        build_workbook(&records(2), &path).unwrap();

        let workbook = read_part(&path, "xl/workbook.xml");
        let call = workbook.find("name=\"CALL\"").unwrap();
        let first = workbook.find("name=\"1\"").unwrap();
        let second = workbook.find("name=\"2\"").unwrap();
        assert!(call < first && first < second);
    }

    #[test]
    fn test_card_sheet_has_highlight_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.xlsx");
        let records = records(1);
        build_workbook(&records, &path).unwrap();

        let xml = read_part(&path, "xl/worksheets/sheet2.xml");
        assert_eq!(xml.matches("<cfRule").count(), 2 * CARDS_PER_ROW * GRID_SIZE);
        for letter in ['A', 'B', 'C', 'D', 'E'] {
            assert!(xml.contains(&format!("CALL!${letter}$2:${letter}$16")), "{letter}");
        }
        let first = record_first_number(&records[0]).expect("record has numbers");
        assert!(xml.contains(&format!("<v>{first}</v>")));
    }

    fn record_first_number(record: &CallRecord) -> Option<u8> {
        record.card_rows().flatten().find_map(|c| match c {
            CallCell::Number(n) => Some(*n),
            _ => None,
        })
    }

    #[test]
    fn test_assemble_removes_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let sidecars: Vec<PathBuf> = records(2)
            .iter()
            .map(|r| {
                let path = CallRecord::sidecar_path(dir.path(), r.sheet, "RED");
                r.save(&path).unwrap();
                path
            })
            .collect();
        let out = dir.path().join("RED-cards.xlsx");

        assemble_from_sidecars(&sidecars, &out).unwrap();
        assert!(out.exists());
        assert!(sidecars.iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_failed_assembly_still_removes_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let records = records(1);
        let sidecar = CallRecord::sidecar_path(dir.path(), 1, "RED");
        records[0].save(&sidecar).unwrap();

        let unwritable = dir.path().join("no-such-dir").join("RED-cards.xlsx");
        assert!(assemble_from_sidecars(&[sidecar.clone()], &unwritable).is_err());
        assert!(!sidecar.exists());
    }

    #[test]
    fn test_assemble_with_missing_sidecar_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = vec![dir.path().join("1-RED.calls.json")];
        let err = assemble_from_sidecars(&missing, &dir.path().join("x.xlsx")).unwrap_err();
        assert!(matches!(err, BingoError::Io { .. }));
    }
}
