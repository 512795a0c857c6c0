//! Paginated export of the printable report.
//!
//! Export rasterises the print region into one tall image, slices it into fixed-height pages
//! and writes a single document named `ICU_Shift_Report_<YYYY-MM-DD>.<ext>`. The rasteriser is
//! pluggable; [`TextRasterizer`] is the built-in plain-text backend where one row is one line.

use crate::printable::PrintRegion;
use chrono::NaiveDate;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("page height must be greater than zero")]
    InvalidPageHeight,
    #[error("failed to rasterise report: {0}")]
    Rasterize(String),
    #[error("failed to create export directory: {0}")]
    DirCreation(std::io::Error),
    #[error("failed to write export file: {0}")]
    Write(std::io::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Turns a print region into a fixed-width image and encodes page slices of it.
pub trait Rasterizer: Send + Sync {
    type Image;

    /// File extension of the encoded document, without the dot.
    fn extension(&self) -> &'static str;

    fn rasterize(&self, region: &PrintRegion) -> ExportResult<Self::Image>;

    /// Height of the image in rows.
    fn height(&self, image: &Self::Image) -> usize;

    /// Encodes the given row slices, in order, as one multi-page document.
    fn encode(&self, image: &Self::Image, pages: &[Range<usize>]) -> ExportResult<Vec<u8>>;
}

/// Slices an image of `height` rows into consecutive pages of `page_height` rows.
///
/// The last page may be shorter. An empty image still yields one (empty) page.
pub fn paginate(height: usize, page_height: usize) -> ExportResult<Vec<Range<usize>>> {
    if page_height == 0 {
        return Err(ExportError::InvalidPageHeight);
    }
    if height == 0 {
        return Ok(vec![0..0]);
    }
    Ok((0..height)
        .step_by(page_height)
        .map(|start| start..(start + page_height).min(height))
        .collect())
}

pub fn export_file_name(date: NaiveDate, extension: &str) -> String {
    format!("ICU_Shift_Report_{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Plain-text rasteriser. Pages are separated by a form feed.
#[derive(Clone, Debug, Default)]
pub struct TextRasterizer;

impl Rasterizer for TextRasterizer {
    type Image = Vec<String>;

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn rasterize(&self, region: &PrintRegion) -> ExportResult<Vec<String>> {
        Ok(region.lines())
    }

    fn height(&self, image: &Vec<String>) -> usize {
        image.len()
    }

    fn encode(&self, image: &Vec<String>, pages: &[Range<usize>]) -> ExportResult<Vec<u8>> {
        let mut out = String::new();
        for (n, page) in pages.iter().enumerate() {
            if n > 0 {
                out.push('\u{c}');
            }
            let rows = image
                .get(page.clone())
                .ok_or_else(|| ExportError::Rasterize(format!("page {:?} outside image", page)))?;
            for row in rows {
                out.push_str(row);
                out.push('\n');
            }
        }
        Ok(out.into_bytes())
    }
}

/// Writes exported documents into a directory.
#[derive(Clone, Debug)]
pub struct ExportService<R> {
    rasterizer: R,
    export_dir: PathBuf,
    page_height: usize,
}

impl<R: Rasterizer> ExportService<R> {
    pub fn new(rasterizer: R, export_dir: PathBuf, page_height: usize) -> Self {
        Self {
            rasterizer,
            export_dir,
            page_height,
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Rasterises, paginates and writes `region`, returning the written path.
    ///
    /// The file is written to a temporary file in the export directory and then renamed, so a
    /// failed export never leaves a partial document behind. Exporting twice on the same date
    /// replaces the earlier file.
    pub fn export(&self, region: &PrintRegion, date: NaiveDate) -> ExportResult<PathBuf> {
        let image = self.rasterizer.rasterize(region)?;
        let pages = paginate(self.rasterizer.height(&image), self.page_height)?;
        let bytes = self.rasterizer.encode(&image, &pages)?;

        std::fs::create_dir_all(&self.export_dir).map_err(ExportError::DirCreation)?;
        let path = self
            .export_dir
            .join(export_file_name(date, self.rasterizer.extension()));

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.export_dir).map_err(ExportError::Write)?;
        tmp.write_all(&bytes).map_err(ExportError::Write)?;
        tmp.persist(&path).map_err(|e| ExportError::Write(e.error))?;

        tracing::info!("exported {} page(s) to {}", pages.len(), path.display());
        Ok(path)
    }
}
