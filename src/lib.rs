//! Printable, clickable 75-ball bingo sheets with an Excel call sheet for the caller.

pub mod call_record;
pub mod card;
pub mod colour;
pub mod config;
pub mod dauber;
pub mod error;
pub mod extract;
pub mod logo;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod workbook;

pub use card::{Card, CardGenerator, Sheet};
pub use colour::Colour;
pub use dauber::DauberShape;
pub use error::{BingoError, Result};
pub use pipeline::{Job, Summary, Task};
