//! HTML rendering of a sheet: six clickable cards with their numbers embedded
//! as one `$cardN = [...]` literal per card, column-major.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::card::{CARDS_PER_ROW, Card, GRID_SIZE, LETTERS, Sheet};
use crate::colour::Colour;
use crate::dauber::DauberShape;
use crate::error::{BingoError, Result};

pub const CLEAR_LABEL: &str = " - CLICK HERE TO CLEAR CARD";

/// Everything about a sheet's appearance that the user chooses.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub card_colour: Colour,
    pub dauber_colour: Colour,
    pub dauber_shape: DauberShape,
    pub title: Option<String>,
    /// Lets the player pick a dauber shape before marking starts.
    pub allow_select: bool,
    /// Daubing a number marks it on every card of the sheet.
    pub easy: bool,
    /// Data URI for the `logo` dauber.
    pub logo_uri: String,
}

pub fn sheet_stem(index: usize, colour_tag: &str) -> String {
    format!("{index}-{colour_tag}")
}

pub fn sheet_html_path(dir: &Path, index: usize, colour_tag: &str) -> PathBuf {
    dir.join(format!("{}.html", sheet_stem(index, colour_tag)))
}

/// A sheet document and where it was written.
pub struct WrittenSheet {
    pub path: PathBuf,
    pub html: String,
}

/// Renders `sheet` as sheet number `index` and writes it into `dir`.
pub fn write_sheet(
    dir: &Path,
    index: usize,
    sheet: &Sheet,
    style: &StyleOptions,
) -> Result<WrittenSheet> {
    let path = sheet_html_path(dir, index, &style.card_colour.file_tag());
    let html = render_sheet(sheet, index, style);
    fs::write(&path, &html).map_err(|e| BingoError::io("failed to write", &path, e))?;
    debug!(path = %path.display(), "wrote sheet");
    Ok(WrittenSheet { path, html })
}

pub fn render_sheet(sheet: &Sheet, index: usize, style: &StyleOptions) -> String {
    let mut html = String::with_capacity(24 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>CARD {index}</title>\n<style>\n"
    );
    write_style(&mut html, style);
    html.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(
        html,
        "<div class=\"card-number\"><button id=\"clear-card\" class=\"button\">CARD {index}{CLEAR_LABEL}</button></div>"
    );
    if style.allow_select {
        write_selector(&mut html);
    }
    let title = style.title.as_deref().map(esc).unwrap_or_default();
    let _ = writeln!(html, "<div class=\"card-title\">{title}</div>");

    for (row, cards) in sheet.cards().chunks(CARDS_PER_ROW).enumerate() {
        html.push_str("<div class=\"grid-container\">\n");
        for (i, card) in cards.iter().enumerate() {
            write_card(&mut html, row * CARDS_PER_ROW + i + 1, card);
        }
        html.push_str("</div>\n");
    }

    html.push_str("<script>\n");
    for (i, card) in sheet.cards().iter().enumerate() {
        let _ = writeln!(html, "{}", card_literal(i + 1, card));
    }
    write_script(&mut html, style);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

/// The line that carries a card's numbers, e.g. `$card1 = [4, 11, ...];`.
pub fn card_literal(card_number: usize, card: &Card) -> String {
    let values: Vec<String> = card.values().iter().map(u8::to_string).collect();
    format!("$card{card_number} = [{}];", values.join(", "))
}

/// The document as it should look on paper: no clear prompt, no dauber selector.
pub fn print_variant(html: &str) -> String {
    html.replace(CLEAR_LABEL, "")
        .replace("<select", "<!-- <select")
        .replace("</select>", "</select> -->")
}

fn write_card(html: &mut String, card_number: usize, card: &Card) {
    html.push_str("<div class=\"grid-child\">\n<div class=\"card\">\n  <div class=\"headers\">\n");
    for letter in LETTERS {
        let _ = writeln!(html, "    <div><span>{letter}</span></div>");
    }
    html.push_str("  </div>\n");
    for col in 0..GRID_SIZE {
        html.push_str("  <div class=\"column\">\n");
        for row in 0..GRID_SIZE {
            let position = col * GRID_SIZE + row + 1;
            let id = format!("card{card_number}-c{position}");
            if Card::is_free(row, col) {
                let _ = writeln!(
                    html,
                    "    <div class=\"number free\" id=\"{id}\"><span>FREE</span></div>"
                );
            } else {
                let n = card.get(row, col);
                let _ = writeln!(
                    html,
                    "    <div class=\"number\" id=\"{id}\" data-number=\"{n}\"><span>{n}</span></div>"
                );
            }
        }
        html.push_str("  </div>\n");
    }
    html.push_str("</div>\n</div>\n");
}

fn write_selector(html: &mut String) {
    html.push_str(
        "<select id=\"dauber\" name=\"dauber\" class=\"selectpicker\">\n\
         <option value=\"\" selected disabled>Select a dauber</option>\n",
    );
    for shape in DauberShape::ALL {
        let _ = writeln!(html, "<option value=\"{}\">{}</option>", shape.class(), shape.label());
    }
    html.push_str("</select>\n");
}

fn write_style(html: &mut String, style: &StyleOptions) {
    let card = style.card_colour.as_css();
    let _ = write!(
        html,
        ":root {{ --logo: url({logo}); }}\n",
        logo = style.logo_uri
    );
    html.push_str(&BASE_CSS.replace(CARD_COLOUR, card));
    for shape in DauberShape::ALL {
        let _ = writeln!(
            html,
            ".number.{}::after {{ {} }}",
            shape.class(),
            shape.marker_css(&style.dauber_colour)
        );
    }
}

fn write_script(html: &mut String, style: &StyleOptions) {
    let shapes: Vec<String> =
        DauberShape::ALL.iter().map(|s| format!("\"{}\"", s.class())).collect();
    let _ = write!(
        html,
        "var easy = {easy};\nvar defaultDauber = \"{dauber}\";\nvar shapes = [{shapes}];\n",
        easy = style.easy,
        dauber = style.dauber_shape.class(),
        shapes = shapes.join(", ")
    );
    html.push_str(SCRIPT);
}

/// Escape text for HTML.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

const CARD_COLOUR: &str = "$CARD";

// Floats and literal colours: wkhtmltopdf's WebKit has no flex, grid or custom properties.
const BASE_CSS: &str = r#"body { font-family: "Roboto Condensed", Arial, sans-serif; }
.grid-container { overflow: hidden; width: 1300px; margin: 0 auto; }
.grid-child { float: left; padding: 5px; }
.card { margin-top: 25px; width: 400px; background-color: $CARD; border-radius: 5px; padding: 10px; overflow: hidden; }
.card-title { text-align: center; font-weight: bold; color: $CARD; font-size: 40px; margin-bottom: 10px; }
.card-number { text-align: center; font-weight: bold; }
.headers { overflow: hidden; }
.headers > div { float: left; width: 80px; text-align: center; }
.headers > div span { font-size: 30px; color: #fff; font-weight: bold; font-family: Arial, Helvetica, sans-serif; }
.column { float: left; width: 80px; text-align: center; }
.number { position: relative; padding: 20px 0; height: 16px; border: 2px solid $CARD; background-color: #fff; cursor: pointer; }
.number span { color: #000; font-size: 20px; }
.number:hover { opacity: 0.8; }
.number.free { cursor: default; }
.number.free span { color: $CARD; font-weight: bold; }
.number::after { position: absolute; top: 50%; left: 50%; width: 48px; height: 48px; margin: -24px 0 0 -24px; pointer-events: none; }
.button { background-color: $CARD; border: none; color: #fff; padding: 10px 24px; font-size: 16px; font-weight: bold; cursor: pointer; }
.selectpicker { display: block; margin: 10px auto; font-size: 16px; }
"#;

const SCRIPT: &str = r#"var cards = [$card1, $card2, $card3, $card4, $card5, $card6];
var selector = document.getElementById("dauber");

function activeDauber() {
  if (selector && selector.value) { return selector.value; }
  return defaultDauber;
}

function setMark(cell, shape, on) {
  if (on) { cell.classList.add(shape); } else { cell.classList.remove(shape); }
}

function daub(cell) {
  var shape = activeDauber();
  if (selector) { selector.disabled = true; }
  var on = !cell.classList.contains(shape);
  if (!easy) { setMark(cell, shape, on); return; }
  var same = document.querySelectorAll('.number[data-number="' + cell.getAttribute("data-number") + '"]');
  for (var i = 0; i < same.length; i++) { setMark(same[i], shape, on); }
}

var numbers = document.querySelectorAll(".number");
for (var n = 0; n < numbers.length; n++) {
  if (numbers[n].classList.contains("free")) { continue; }
  numbers[n].onclick = function () { daub(this); };
}

document.getElementById("clear-card").onclick = function () {
  for (var n = 0; n < numbers.length; n++) {
    for (var s = 0; s < shapes.length; s++) { numbers[n].classList.remove(shapes[s]); }
  }
  if (selector) { selector.disabled = false; }
};
"#;
