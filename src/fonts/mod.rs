//! Font loading utilities.
//!
//! The report uses a single TrueType file for every face.  `genpdf` expects a
//! family of four faces, so the same font data fills the regular, bold,
//! italic and bold-italic slots; bold spans therefore render in the regular
//! face.

use std::io;
use std::path::Path;

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, info};

/// Location of the serif font the report is typeset in.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/english/Times-New-Roman.ttf";

/// Family name every report style refers to.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Times New Roman";

/// A font family loaded from disk, ready to hand to `genpdf`.
#[derive(Clone, Debug)]
pub struct LoadedFont {
    name: String,
    family: FontFamily<FontData>,
}

impl LoadedFont {
    /// Family name styles must use to select this font.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_family(self) -> FontFamily<FontData> {
        self.family
    }
}

fn ensure_font_file(path: &Path) -> Result<(), Error> {
    if path.is_file() {
        return Ok(());
    }

    let kind = if path.exists() {
        io::ErrorKind::InvalidInput
    } else {
        io::ErrorKind::NotFound
    };
    Err(Error::new(
        format!("Font file missing at {}", path.display()),
        io::Error::new(kind, "font file not found"),
    ))
}

/// Loads the TrueType file at `path` and registers it under `name` for all
/// four faces of the family.
pub fn load_font_family(path: impl AsRef<Path>, name: &str) -> Result<LoadedFont, Error> {
    let path = path.as_ref();
    ensure_font_file(path)?;

    let data = FontData::load(path, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                name,
                path.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })?;
    debug!("Loaded font data for '{}' from {}", name, path.display());

    let family = FontFamily {
        regular: data.clone(),
        bold: data.clone(),
        italic: data.clone(),
        bold_italic: data,
    };
    info!("Using font family '{}' ({})", name, path.display());

    Ok(LoadedFont {
        name: name.to_owned(),
        family,
    })
}

/// Indicates whether a font file exists at `path`.
pub fn font_available(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Returns `true` when `err` means the font file is absent rather than broken.
pub fn is_missing_font(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err) if io_err.kind() == io::ErrorKind::NotFound
    )
}
