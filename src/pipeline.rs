//! Ties the pieces together: generate sheets, optionally print them, and build
//! the call-sheet workbook either in the same pass or from sheets on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::call_record::CallRecord;
use crate::card::CardGenerator;
use crate::colour::Colour;
use crate::dauber::DauberShape;
use crate::error::{BingoError, Result};
use crate::extract::extract_sheet_files;
use crate::logo::{default_badge_uri, logo_data_uri};
use crate::pdf::Rasterizer;
use crate::render::{StyleOptions, sheet_stem, write_sheet};
use crate::workbook::{assemble_from_sidecars, build_workbook};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Write new sheets.
    Generate,
    /// Write new sheets, print them and build `{TAG}-cards.xlsx` in one pass.
    Everything,
    /// Build a workbook from sheets of colour `base` written by an earlier run.
    Extract { workbook: String, base: Colour },
}

impl Task {
    /// Picks the task from the `-x`, `-b` and `-e` flags. `-x` always needs
    /// `-b` and then reads existing sheets, whatever `-e` says.
    pub fn from_flags(excel: Option<String>, base: Option<&str>, everything: bool) -> Result<Self> {
        match (excel, base) {
            (Some(workbook), Some(base)) => {
                if everything {
                    warn!("--everything is ignored with --excel and --base-colour");
                }
                Ok(Task::Extract { workbook, base: parse_base(base)? })
            }
            (Some(_), None) => Err(BingoError::config(
                "The --excel option requires the --base-colour value as well",
            )),
            (None, base) => {
                if base.is_some() {
                    warn!("--base-colour is only used with --excel");
                }
                Ok(if everything { Task::Everything } else { Task::Generate })
            }
        }
    }
}

/// `-b` takes the colour tag of existing sheets, with or without `.html`.
fn parse_base(base: &str) -> Result<Colour> {
    let base = base.strip_suffix(".html").unwrap_or(base);
    base.parse()
}

#[derive(Debug, Clone)]
pub struct Job {
    pub count: usize,
    pub output_dir: PathBuf,
    pub pdf: bool,
    pub task: Task,
    pub style: StyleOptions,
}

impl Job {
    pub fn needs_rasterizer(&self) -> bool {
        self.count > 0 && (self.pdf || self.task == Task::Everything)
    }

    fn workbook_path(&self) -> Option<PathBuf> {
        let name = match &self.task {
            Task::Generate => return None,
            Task::Extract { workbook, .. } => workbook.clone(),
            Task::Everything => default_workbook_name(&self.style.card_colour),
        };
        Some(self.output_dir.join(name))
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Sheets rendered this run.
    pub written: usize,
    pub workbook: Option<PathBuf>,
}

pub fn default_workbook_name(colour: &Colour) -> String {
    format!("{}-cards.xlsx", colour.file_tag())
}

/// Data URI for the `logo` dauber: the user's image, or the built-in badge.
pub fn resolve_logo(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => logo_data_uri(path),
        None => default_badge_uri(),
    }
}

/// The logo dauber only shows on new sheets that use it or let the player pick it.
pub fn needs_logo(task: &Task, shape: DauberShape, allow_select: bool) -> bool {
    !matches!(task, Task::Extract { .. }) && (shape == DauberShape::Logo || allow_select)
}

/// Line printed once a run succeeds.
pub fn summary_message(task: &Task, summary: &Summary) -> String {
    match (task, &summary.workbook) {
        (Task::Extract { .. }, Some(path)) => format!("Call sheet written to {}", path.display()),
        _ => written_message(summary.written),
    }
}

pub fn written_message(count: usize) -> String {
    match count {
        1 => "1 card written".to_string(),
        n => format!("{n} cards written"),
    }
}

pub fn run(
    job: &Job,
    generator: &mut CardGenerator,
    rasterizer: Option<&Rasterizer>,
) -> Result<Summary> {
    if job.count == 0 {
        return Ok(Summary::default());
    }
    let workbook = job.workbook_path();

    if let Task::Extract { base, .. } = &job.task {
        let sidecars = extract_sheet_files(&job.output_dir, job.count, &base.file_tag())?;
        if let Some(path) = &workbook {
            assemble_from_sidecars(&sidecars, path)?;
        }
        return Ok(Summary { written: 0, workbook });
    }

    let print = job.pdf || job.task == Task::Everything;
    let rasterizer = match (print, rasterizer) {
        (true, None) => return Err(BingoError::RasterizerNotFound),
        (true, Some(r)) => Some(r),
        (false, _) => None,
    };

    fs::create_dir_all(&job.output_dir)
        .map_err(|e| BingoError::io("failed to create output directory", &job.output_dir, e))?;
    if rasterizer.is_some() {
        info!("Generating PDFs, please wait");
    }

    let tag = job.style.card_colour.file_tag();
    let mut records = Vec::new();
    for index in 1..=job.count {
        let sheet = generator.generate_sheet();
        let written = write_sheet(&job.output_dir, index, &sheet, &job.style)?;
        if let Some(rasterizer) = rasterizer {
            let pdf = job.output_dir.join(format!("{}.pdf", sheet_stem(index, &tag)));
            rasterizer.print(&written.html, &pdf)?;
        }
        if workbook.is_some() {
            records.push(CallRecord::from_sheet(index, &sheet));
        }
    }

    if let Some(path) = &workbook {
        build_workbook(&records, path)?;
    }
    Ok(Summary { written: job.count, workbook })
}
