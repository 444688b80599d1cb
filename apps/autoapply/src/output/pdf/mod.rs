//! PDF output — one simple flowing-text document per job and kind.
//!
//! Layout is a single column of heading and paragraph blocks on A4 using the
//! built-in Helvetica fonts. Built-in fonts only cover ASCII here, so text is
//! reduced to ASCII first (typographic quotes and dashes get plain
//! equivalents, anything else becomes `?`).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use crate::models::ApplicationRecord;
use crate::output::OutputError;

pub mod font_metrics;

use font_metrics::{FontMetricTable, HELVETICA, HELVETICA_BOLD};

const PT_TO_MM: f32 = 0.352_778;

// ────────────────────────────────────────────────────────────────────────────
// Document model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Answers,
    CoverLetter,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Answers => "Answers",
            DocumentKind::CoverLetter => "CoverLetter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
}

/// Page geometry and type sizes, all in millimetres / points.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub body_size_pt: f32,
    pub heading_size_pt: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub line_spacing: f32,
    /// Extra space above a block, in lines of body text.
    pub block_gap_lines: f32,
}

impl Default for PageLayout {
    /// A4 with 20mm margins, 11pt body, 13pt headings.
    fn default() -> Self {
        PageLayout {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            body_size_pt: 11.0,
            heading_size_pt: 13.0,
            line_spacing: 1.4,
            block_gap_lines: 0.6,
        }
    }
}

/// A line of text placed on a page. `y_mm` is the baseline, measured from the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub bold: bool,
    pub size_pt: f32,
    pub y_mm: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks per document kind
// ────────────────────────────────────────────────────────────────────────────

pub fn answer_blocks(record: &ApplicationRecord) -> Vec<Block> {
    let job = &record.job;
    let mut blocks = vec![
        Block::Heading(format!("{} - {}", job.company, job.title)),
        Block::Paragraph(job.url.clone()),
    ];
    if job.questions.is_empty() {
        blocks.push(Block::Paragraph("No application questions.".to_string()));
    }
    for (i, qa) in record.question_answers().into_iter().enumerate() {
        blocks.push(Block::Heading(format!("{}. {}", i + 1, qa.question)));
        blocks.push(Block::Paragraph(qa.answer));
    }
    blocks
}

pub fn cover_letter_blocks(record: &ApplicationRecord, letter: &str) -> Vec<Block> {
    let mut blocks = vec![Block::Heading(format!(
        "Cover Letter - {} - {}",
        record.job.company, record.job.title
    ))];
    blocks.extend(
        letter
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| Block::Paragraph(p.to_string())),
    );
    blocks
}

/// `{Company}_{JobTitle}_{Kind}.pdf` with spaces (and path separators) replaced by underscores.
pub fn pdf_file_name(company: &str, title: &str, kind: DocumentKind) -> String {
    format!("{}_{}_{}.pdf", company, title, kind.as_str())
        .chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Flows blocks onto pages. Always returns at least one (possibly empty) page.
pub fn layout_pages(blocks: &[Block], layout: &PageLayout) -> Vec<Vec<PlacedLine>> {
    let top = layout.height_mm - layout.margin_mm;
    let bottom = layout.margin_mm;
    let text_width_mm = layout.width_mm - 2.0 * layout.margin_mm;
    let gap_mm = layout.block_gap_lines * layout.body_size_pt * layout.line_spacing * PT_TO_MM;

    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut cursor = top;

    for block in blocks {
        let (text, bold, size_pt, metrics): (&str, bool, f32, &FontMetricTable) = match block {
            Block::Heading(t) => (t, true, layout.heading_size_pt, &HELVETICA_BOLD),
            Block::Paragraph(t) => (t, false, layout.body_size_pt, &HELVETICA),
        };

        let line_height = size_pt * layout.line_spacing * PT_TO_MM;
        let max_width_em = text_width_mm / (size_pt * PT_TO_MM);

        if cursor < top {
            cursor -= gap_mm;
        }

        for line in metrics.wrap(&to_ascii(text), max_width_em) {
            if cursor - line_height < bottom {
                pages.push(Vec::new());
                cursor = top;
            }
            cursor -= line_height;
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    text: line,
                    bold,
                    size_pt,
                    y_mm: cursor,
                });
            }
        }
    }

    pages
}

/// Reduces text to printable ASCII for the built-in fonts.
fn to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' | '\u{00B7}' => out.push('*'),
            '\u{00A0}' | '\t' | '\n' | '\r' => out.push(' '),
            c if (' '..='~').contains(&c) => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

fn pdf_error(e: impl std::fmt::Display) -> OutputError {
    OutputError::Pdf(e.to_string())
}

/// Renders laid-out pages to `path`.
pub fn render_pdf(
    title: &str,
    pages: &[Vec<PlacedLine>],
    layout: &PageLayout,
    path: &Path,
) -> Result<(), OutputError> {
    let width = Mm(layout.width_mm);
    let height = Mm(layout.height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (i, lines) in pages.iter().enumerate() {
        let (page, layer) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Layer {}", i + 1))
        };
        let canvas = doc.get_page(page).get_layer(layer);
        for line in lines {
            let font = if line.bold { &bold } else { &regular };
            canvas.use_text(
                line.text.clone(),
                line.size_pt,
                Mm(layout.margin_mm),
                Mm(line.y_mm),
                font,
            );
        }
    }

    let file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
    Ok(())
}

/// Writes an `Answers` PDF for every record, plus a `CoverLetter` PDF when the
/// record has one. Returns the written paths in record order.
pub fn write_pdfs(records: &[ApplicationRecord], dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))?;
    let layout = PageLayout::default();
    let mut written = Vec::new();

    for record in records {
        let mut documents = vec![(DocumentKind::Answers, answer_blocks(record))];
        if let Some(letter) = &record.cover_letter {
            documents.push((DocumentKind::CoverLetter, cover_letter_blocks(record, letter)));
        }

        for (kind, blocks) in documents {
            let path = dir.join(pdf_file_name(&record.job.company, &record.job.title, kind));
            let pages = layout_pages(&blocks, &layout);
            let title = format!("{} {} {}", record.job.company, record.job.title, kind.as_str());
            render_pdf(&title, &pages, &layout, &path)?;
            debug!("Wrote {} ({} page(s))", path.display(), pages.len());
            written.push(path);
        }
    }

    Ok(written)
}
