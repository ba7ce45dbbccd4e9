//! PDF output through an external `wkhtmltopdf` process.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{BingoError, Result};
use crate::render::print_variant;

pub const PATH_ENV: &str = "BINGO_WKHTMLTOPDF";

/// Page setup handed to the rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub page_size: &'static str,
    pub orientation: &'static str,
    pub margin_top: &'static str,
    pub margin_right: &'static str,
    pub margin_bottom: &'static str,
    pub margin_left: &'static str,
}

impl Default for PageOptions {
    fn default() -> Self {
        // Other platforms' wkhtmltopdf builds print wider; keep the cards centred.
        let (left, right) =
            if cfg!(target_os = "linux") { ("0.25in", "0.25in") } else { ("0.1in", "0in") };
        Self {
            page_size: "Letter",
            orientation: "Landscape",
            margin_top: "0.5in",
            margin_right: right,
            margin_bottom: "0.25in",
            margin_left: left,
        }
    }
}

impl PageOptions {
    #[rustfmt::skip]
    fn args(&self) -> [&'static str; 12] {
        [
            "--page-size", self.page_size,
            "--orientation", self.orientation,
            "--margin-top", self.margin_top,
            "--margin-right", self.margin_right,
            "--margin-bottom", self.margin_bottom,
            "--margin-left", self.margin_left,
        ]
    }
}

pub struct Rasterizer {
    program: PathBuf,
    page: PageOptions,
}

impl Rasterizer {
    /// Locates `wkhtmltopdf`: explicit path, then `BINGO_WKHTMLTOPDF`, then `PATH`.
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        let program = find_program(configured)?;
        debug!(program = %program.display(), "using rasterizer");
        Ok(Self { program, page: PageOptions::default() })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), page: PageOptions::default() }
    }

    /// Prints the on-paper variant of `html` to `output`. The variant lives in
    /// a temporary file next to the output for the duration of the call.
    pub fn print(&self, html: &str, output: &Path) -> Result<()> {
        let dir = output.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let mut staged = tempfile::Builder::new()
            .prefix(".print-")
            .suffix(".html")
            .tempfile_in(dir)
            .map_err(|e| BingoError::io("failed to create temporary file in", dir, e))?;
        staged
            .write_all(print_variant(html).as_bytes())
            .and_then(|_| staged.flush())
            .map_err(|e| BingoError::io("failed to write", staged.path(), e))?;

        let result = Command::new(&self.program)
            .args(self.page.args())
            .arg("--quiet")
            .arg(staged.path())
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| BingoError::RasterizerSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(BingoError::RasterizerFailed {
                exit_code: result.status.code().unwrap_or(-1),
                output: output.to_path_buf(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        debug!(pdf = %output.display(), "printed");
        Ok(())
    }
}

fn find_program(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }
    if let Some(path) = std::env::var_os(PATH_ENV).map(PathBuf::from) {
        if path.exists() {
            return Ok(path);
        }
    }
    let names: &[&str] =
        if cfg!(windows) { &["wkhtmltopdf.exe", "wkhtmltopdf"] } else { &["wkhtmltopdf"] };
    for name in names {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }
    Err(BingoError::RasterizerNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_is_landscape_letter() {
        let page = PageOptions::default();
        assert_eq!(page.page_size, "Letter");
        assert_eq!(page.orientation, "Landscape");
        assert_eq!(page.args()[0..2], ["--page-size", "Letter"]);
    }

    #[test]
    fn test_configured_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("wkhtmltopdf");
        std::fs::write(&fake, "").unwrap();
        assert_eq!(find_program(Some(&fake)).unwrap(), fake);
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = Rasterizer::with_program(dir.path().join("no-such-rasterizer"));
        let err = rasterizer.print("<html></html>", &dir.path().join("1-BLUE.pdf")).unwrap_err();
        assert!(matches!(err, BingoError::RasterizerSpawn { .. }));
        // the staged print copy is cleaned up even on failure
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = Rasterizer::with_program("false");
        let err = rasterizer.print("<html></html>", &dir.path().join("1-BLUE.pdf")).unwrap_err();
        assert!(matches!(err, BingoError::RasterizerFailed { exit_code: 1, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_print_passes_stripped_copy() {
        use std::os::unix::fs::PermissionsExt;

        // stand-in rasterizer: copies its input (second to last arg) to the output
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("fake-wkhtmltopdf");
        let script = "#!/bin/sh\nwhile [ $# -gt 2 ]; do shift; done\ncp \"$1\" \"$2\"\n";
        std::fs::write(&stub, script).unwrap();
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

        let out = dir.path().join("1-BLUE.pdf");
        let html =
            "<button>CARD 1 - CLICK HERE TO CLEAR CARD</button><select id=\"dauber\"></select>";
        Rasterizer::with_program(&stub).print(html, &out).unwrap();

        let printed = std::fs::read_to_string(&out).unwrap();
        assert_eq!(printed, "<button>CARD 1</button><!-- <select id=\"dauber\"></select> -->");
    }
}
