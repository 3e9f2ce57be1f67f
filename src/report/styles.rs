//! Typography and colors of the architecture report.

use genpdf::style::Color;

use crate::model::{CellPadding, GridLines, HorizontalAlignment, StyleSheet, TextStyle};

pub const COVER_TITLE: &str = "CoverTitle";
pub const COVER_SUBTITLE: &str = "CoverSubtitle";
pub const COVER_DESCRIPTION: &str = "CoverDesc";
pub const COVER_VERSION: &str = "CoverVersion";
pub const COVER_YEAR: &str = "CoverYear";
pub const HEADING_1: &str = "Heading1";
pub const HEADING_2: &str = "Heading2";
pub const BODY: &str = "Body";
pub const TABLE_HEADER: &str = "TableHeader";
pub const TABLE_CELL: &str = "TableCell";
pub const TABLE_CELL_LEFT: &str = "TableCellLeft";
pub const CAPTION: &str = "Caption";

pub const BLACK: Color = Color::Rgb(0, 0, 0);
pub const WHITE: Color = Color::Rgb(255, 255, 255);
pub const HEADING_1_COLOR: Color = Color::Rgb(0x1F, 0x4E, 0x79);
pub const HEADING_2_COLOR: Color = Color::Rgb(0x2E, 0x75, 0xB6);
pub const TABLE_HEADER_BACKGROUND: Color = Color::Rgb(0x1F, 0x4E, 0x79);
pub const TABLE_ROW_EVEN: Color = WHITE;
pub const TABLE_ROW_ODD: Color = Color::Rgb(0xF5, 0xF5, 0xF5);

/// Leading of styles that do not set one explicitly.
const DEFAULT_LEADING: f64 = 12.0;

/// 0.5pt grey lines around every cell.
pub fn table_grid() -> GridLines {
    GridLines {
        width: 0.5,
        color: Color::Rgb(128, 128, 128),
    }
}

/// 6pt above and below, 8pt left and right.
pub fn table_padding() -> CellPadding {
    CellPadding::symmetric(6.0, 8.0)
}

fn centered(name: &str, family: &str, size: f64, leading: f64) -> TextStyle {
    TextStyle::new(name, family, size)
        .with_leading(leading)
        .with_alignment(HorizontalAlignment::Center)
}

/// Every style the report uses, set in `family`.
pub fn stylesheet(family: &str) -> StyleSheet {
    StyleSheet::new()
        .with_style(centered(COVER_TITLE, family, 42.0, 50.0).with_space_after(36.0))
        .with_style(centered(COVER_SUBTITLE, family, 20.0, 28.0).with_space_after(48.0))
        .with_style(centered(COVER_DESCRIPTION, family, 16.0, 22.0).with_space_after(48.0))
        .with_style(centered(COVER_VERSION, family, 14.0, 22.0))
        .with_style(centered(COVER_YEAR, family, 14.0, 22.0))
        .with_style(
            TextStyle::new(HEADING_1, family, 18.0)
                .with_leading(24.0)
                .with_color(HEADING_1_COLOR)
                .with_space_before(18.0)
                .with_space_after(12.0),
        )
        .with_style(
            TextStyle::new(HEADING_2, family, 14.0)
                .with_leading(18.0)
                .with_color(HEADING_2_COLOR)
                .with_space_before(12.0)
                .with_space_after(8.0),
        )
        .with_style(
            TextStyle::new(BODY, family, 10.5)
                .with_leading(18.0)
                .with_alignment(HorizontalAlignment::Justified)
                .with_space_after(6.0),
        )
        .with_style(centered(TABLE_HEADER, family, 11.0, DEFAULT_LEADING).with_color(WHITE))
        .with_style(centered(TABLE_CELL, family, 10.0, DEFAULT_LEADING).with_color(BLACK))
        .with_style(
            TextStyle::new(TABLE_CELL_LEFT, family, 10.0)
                .with_leading(DEFAULT_LEADING)
                .with_color(BLACK),
        )
        .with_style(centered(CAPTION, family, 10.0, DEFAULT_LEADING))
}
