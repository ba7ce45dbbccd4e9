use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BingoError>;

#[derive(Debug, Error)]
pub enum BingoError {
    /// Invalid combination of options or malformed option values.
    #[error("{0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A sheet that extraction expected to find is not on disk.
    #[error("sheet not found: {path}")]
    MissingSheet { path: PathBuf },

    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wkhtmltopdf not found. Install it and put it on PATH, or set BINGO_WKHTMLTOPDF")]
    RasterizerNotFound,

    #[error("failed to start {program}: {source}")]
    RasterizerSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wkhtmltopdf exited with status {exit_code} while writing {output}: {stderr}")]
    RasterizerFailed {
        exit_code: i32,
        output: PathBuf,
        stderr: String,
    },

    #[error("failed to process logo {path}: {source}")]
    Logo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode dauber badge: {0}")]
    Badge(#[source] image::ImageError),

    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("bad call record {path}: {source}")]
    CallRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BingoError {
    pub fn config(msg: impl Into<String>) -> Self {
        BingoError::Config(msg.into())
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BingoError::Io { action, path: path.into(), source }
    }

    /// True for errors caused by how the tool was invoked rather than by the environment.
    pub fn is_usage(&self) -> bool {
        matches!(self, BingoError::Config(_) | BingoError::ConfigFile { .. })
    }

    /// Process exit status. A usage error is reported and the run stops
    /// without output, which is not a failure.
    pub fn exit_status(&self) -> u8 {
        if self.is_usage() { 0 } else { 1 }
    }
}
