use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::colour::Colour;

/// Marker a player stamps on a called number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DauberShape {
    Checkmark,
    #[default]
    Circle,
    Clover,
    Heart,
    /// The custom image supplied with `--logo`, or the built-in badge.
    Logo,
    MapleLeaf,
    Moon,
    Square,
    Star,
    Unicorn,
    XMark,
}

// Rough maple leaf outline for clip-path, in percent of the marker box.
const MAPLE_LEAF: &str = "polygon(50% 0%, 60% 22%, 75% 15%, 70% 42%, 90% 30%, 88% 45%, \
100% 50%, 82% 65%, 86% 75%, 55% 72%, 53% 100%, 47% 100%, 45% 72%, 14% 75%, 18% 65%, 0% 50%, \
12% 45%, 10% 30%, 30% 42%, 25% 15%, 40% 22%)";

impl DauberShape {
    pub const ALL: [DauberShape; 11] = [
        DauberShape::Checkmark,
        DauberShape::Circle,
        DauberShape::Clover,
        DauberShape::Heart,
        DauberShape::Logo,
        DauberShape::MapleLeaf,
        DauberShape::Moon,
        DauberShape::Square,
        DauberShape::Star,
        DauberShape::Unicorn,
        DauberShape::XMark,
    ];

    /// CSS class toggled on a daubed cell.
    pub fn class(self) -> &'static str {
        match self {
            DauberShape::Checkmark => "checkmark",
            DauberShape::Circle => "circle",
            DauberShape::Clover => "clover",
            DauberShape::Heart => "heart",
            DauberShape::Logo => "logo",
            DauberShape::MapleLeaf => "maple-leaf",
            DauberShape::Moon => "moon",
            DauberShape::Square => "square",
            DauberShape::Star => "star",
            DauberShape::Unicorn => "unicorn",
            DauberShape::XMark => "x-mark",
        }
    }

    /// Label shown in the player's dauber selector.
    pub fn label(self) -> &'static str {
        match self {
            DauberShape::Checkmark => "&#9989; Checkmark",
            DauberShape::Circle => "&#128308; Circle",
            DauberShape::Clover => "&#127808; Clover",
            DauberShape::Heart => "&#10084; Heart",
            DauberShape::Logo => "&#127775; Custom Image",
            DauberShape::MapleLeaf => "&#127809; Maple Leaf",
            DauberShape::Moon => "&#127769; Moon",
            DauberShape::Square => "&#128998; Square",
            DauberShape::Star => "&#11088; Star",
            DauberShape::Unicorn => "&#129412; Unicorn",
            DauberShape::XMark => "&#10060; X Mark",
        }
    }

    /// Whether the dauber colour applies; the rest are fixed-colour glyphs.
    pub fn takes_colour(self) -> bool {
        matches!(
            self,
            DauberShape::Circle | DauberShape::Square | DauberShape::Heart | DauberShape::MapleLeaf
        )
    }

    /// Declarations for the `::after` marker drawn over a daubed cell.
    pub fn marker_css(self, colour: &Colour) -> String {
        let c = colour.as_css();
        let tint = self.takes_colour().then_some(c);
        let code = match self {
            DauberShape::Circle => {
                return format!("content: \"\"; border-radius: 50%; background: {c}; opacity: 0.6;");
            }
            DauberShape::Square => return format!("content: \"\"; background: {c}; opacity: 0.6;"),
            DauberShape::MapleLeaf => {
                return format!(
                    "content: \"\"; background: {c}; opacity: 0.7; \
                     -webkit-clip-path: {MAPLE_LEAF}; clip-path: {MAPLE_LEAF};"
                );
            }
            DauberShape::Logo => {
                return "content: \"\"; background: var(--logo) center / contain no-repeat;"
                    .to_string();
            }
            DauberShape::Heart => r"\2764",
            DauberShape::Checkmark => r"\2705",
            DauberShape::Clover => r"\1F340",
            DauberShape::Moon => r"\1F319",
            DauberShape::Star => r"\2B50",
            DauberShape::Unicorn => r"\1F984",
            DauberShape::XMark => r"\274C",
        };
        glyph(code, tint)
    }
}

fn glyph(code: &str, colour: Option<&str>) -> String {
    let mut css = format!(
        "content: \"{code}\"; font-size: 40px; line-height: 48px; text-align: center;"
    );
    if let Some(c) = colour {
        css.push_str(&format!(" color: {c};"));
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour;
    use clap::ValueEnum;

    #[test]
    fn test_cli_names() {
        assert_eq!(DauberShape::from_str("maple-leaf", false), Ok(DauberShape::MapleLeaf));
        assert_eq!(DauberShape::from_str("x-mark", false), Ok(DauberShape::XMark));
        assert!(DauberShape::from_str("triangle", false).is_err());
    }

    #[test]
    fn test_class_matches_cli_name() {
        for shape in DauberShape::ALL {
            let name = shape.to_possible_value().unwrap();
            assert_eq!(name.get_name(), shape.class());
        }
    }

    #[test]
    fn test_colour_only_on_colourable_shapes() {
        let blue = colour::blue();
        for shape in DauberShape::ALL {
            assert_eq!(shape.marker_css(&blue).contains("blue"), shape.takes_colour(), "{shape:?}");
        }
    }

    #[test]
    fn test_serde_names() {
        let shape: DauberShape = serde_json::from_str("\"maple-leaf\"").unwrap();
        assert_eq!(shape, DauberShape::MapleLeaf);
    }
}
