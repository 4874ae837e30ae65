//! PDF audit report
//!
//! Renders one heading per checked entity with its recorded attributes, a
//! column table for datasets and the rule results. Failing entries are
//! printed in red.

use crate::domain::descriptors::{has_text, EntityKind};
use crate::domain::results::{CheckerError, CheckerResult, ReportSummary, ValidationReport};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rgb,
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const INDENT: f32 = 6.0;
/// Characters per line at body size across the printable width
const BODY_CHARS: usize = 92;

/// Column offsets of the dataset column table, relative to the heading indent
const COLUMN_OFFSETS: [f32; 3] = [0.0, 45.0, 80.0];

#[derive(Clone, Copy)]
enum Ink {
    Black,
    Grey,
    Red,
}

impl Ink {
    fn color(self) -> Color {
        let (r, g, b) = match self {
            Ink::Black => (0.0, 0.0, 0.0),
            Ink::Grey => (0.4, 0.4, 0.4),
            Ink::Red => (0.8, 0.0, 0.0),
        };
        Color::Rgb(Rgb::new(r, g, b, None))
    }
}

/// Page-filling writer over a printpdf document
struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfCanvas {
    fn new(title: &str) -> CheckerResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(font_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(font_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self { doc, layer, regular, bold, y: PAGE_HEIGHT - MARGIN })
    }

    /// Move down by `height` millimetres, starting a new page when the bottom margin is reached
    fn advance(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= height;
    }

    fn text_at(&self, text: &str, size: f32, x: f32, bold: bool, ink: Ink) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(ink.color());
        self.layer.use_text(printable(text), size, Mm(MARGIN + x), Mm(self.y), font);
    }

    fn line(&mut self, text: &str, size: f32, indent: f32, bold: bool, ink: Ink) {
        let width = BODY_CHARS.saturating_sub((indent / 2.0) as usize).max(20);
        // Point size to line height in millimetres, with leading
        let height = size * 0.3528 * 1.4;
        for chunk in wrap(text, width) {
            self.advance(height);
            self.text_at(&chunk, size, indent, bold, ink);
        }
    }

    fn gap(&mut self, height: f32) {
        self.advance(height);
    }

    fn finish(self) -> CheckerResult<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| CheckerError::render(format!("Failed to write PDF: {e}")))
    }
}

fn font_error(e: impl std::fmt::Display) -> CheckerError {
    CheckerError::render(format!("Failed to load PDF font: {e}"))
}

/// Render `report` as a PDF document
pub fn render(
    report: &ValidationReport,
    summary: &ReportSummary,
    passed: bool,
    config_fingerprint: Option<&str>,
) -> CheckerResult<Vec<u8>> {
    let mut canvas = PdfCanvas::new("Data mesh compliance report")?;

    canvas.line("Data mesh compliance report", 18.0, 0.0, true, Ink::Black);
    canvas.gap(2.0);
    let status = if passed { "All compliance checks passed" } else { "Compliance checks failed" };
    canvas.line(status, 12.0, 0.0, true, if passed { Ink::Black } else { Ink::Red });
    canvas.line(
        &format!(
            "{} rules evaluated: {} passed, {} failed ({} domains, {} data products, {} datasets)",
            summary.rules_evaluated,
            summary.passed,
            summary.failed(),
            summary.entities.domains,
            summary.entities.data_products,
            summary.entities.datasets
        ),
        10.0,
        0.0,
        false,
        Ink::Grey,
    );
    if let Some(fingerprint) = config_fingerprint {
        canvas.line(&format!("Configuration {fingerprint}"), 10.0, 0.0, false, Ink::Grey);
    }

    write_entity(&mut canvas, report, 0.0);
    canvas.finish()
}

fn write_entity(canvas: &mut PdfCanvas, report: &ValidationReport, indent: f32) {
    let mut child_indent = indent;

    if let Some(target) = &report.target {
        let (label, size) = match target.kind {
            EntityKind::Domain => ("Domain", 15.0),
            EntityKind::DataProduct => ("Data product", 13.0),
            EntityKind::Dataset => ("Dataset", 11.5),
        };
        let ink = if report.passed() { Ink::Black } else { Ink::Red };
        canvas.gap(4.0);
        canvas.line(&format!("{}: {}", label, target.name), size, indent, true, ink);

        for attribute in &report.attributes {
            canvas.line(
                &format!("{}: {}", capitalize(&attribute.name), attribute.value),
                10.0,
                indent,
                false,
                Ink::Black,
            );
        }

        if !report.columns.is_empty() {
            write_columns(canvas, report, indent);
        }

        canvas.gap(1.5);
        for result in &report.results {
            if result.passed {
                canvas.line(
                    &format!("PASS  {}: {}", result.rule_id, result.message),
                    9.0,
                    indent,
                    false,
                    Ink::Grey,
                );
            } else {
                canvas.line(
                    &format!(
                        "FAIL  [{}] {}: {}",
                        result.severity.as_str(),
                        result.rule_id,
                        result.message
                    ),
                    9.0,
                    indent,
                    false,
                    Ink::Red,
                );
            }
        }
        child_indent += INDENT;
    }

    for child in &report.children {
        write_entity(canvas, &child.report, child_indent);
    }
}

fn write_columns(canvas: &mut PdfCanvas, report: &ValidationReport, indent: f32) {
    canvas.gap(1.5);
    canvas.advance(5.0);
    for (header, offset) in ["Column", "Type", "Description"].iter().zip(COLUMN_OFFSETS) {
        canvas.text_at(header, 10.0, indent + offset, true, Ink::Black);
    }

    for column in &report.columns {
        canvas.advance(4.5);
        let described = has_text(column.description.as_deref());
        let description = column.description.as_deref().filter(|_| described).unwrap_or("(none)");
        let cells = [
            (truncate(&column.name, 24), Ink::Black),
            (truncate(&column.data_type, 18), Ink::Black),
            (truncate(description, 48), if described { Ink::Black } else { Ink::Red }),
        ];
        for ((cell, ink), offset) in cells.iter().zip(COLUMN_OFFSETS) {
            canvas.text_at(cell, 9.0, indent + offset, false, *ink);
        }
    }
}

/// Replace characters the built-in fonts cannot encode
fn printable(text: &str) -> String {
    text.chars().map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' }).collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Greedy word wrap; words longer than `width` are split
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        if current.is_empty() {
            current = word;
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
