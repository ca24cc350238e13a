//! Downloadable PDF summary of a finished assessment.
//!
//! Layout is computed first as a flat list of blocks, then drawn onto A4
//! pages with the built-in Helvetica faces.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use tracing::warn;

use crate::error::DocumentError;

use super::record::ReportRecord;

pub const PDF_MIME: &str = "application/pdf";

/// Vertical gap after metadata groups and every recommendation line.
const SPACER_PT: f32 = 12.0;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica advance width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

/// One laid-out element of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Text(String),
    Spacer(f32),
}

/// A rendered report ready for download.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ReportDocument {
    pub fn build(record: &ReportRecord) -> Result<Self, DocumentError> {
        let blocks = layout(record);
        let bytes = render_pdf("Pharma Assessment Report", &blocks)?;
        Ok(Self {
            file_name: report_file_name(&record.profile.company_name),
            bytes,
        })
    }

    pub fn mime(&self) -> &'static str {
        PDF_MIME
    }
}

/// `<CompanyName>_Pharma_Assessment_Report.pdf`, with path separators and
/// control characters replaced.
pub fn report_file_name(company_name: &str) -> String {
    let safe: String = company_name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("{safe}_Pharma_Assessment_Report.pdf")
}

/// Strip markdown emphasis markers and turn `*` list items into bullets.
///
/// Returns one trimmed line per input line, blank lines included.
pub fn clean_recommendations(text: &str) -> Vec<String> {
    let stripped = text.replace("##", "").replace("**", "").replace('#', "");
    stripped
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with('*') {
                line.replacen('*', "•", 1).trim().to_string()
            } else {
                line.trim().to_string()
            }
        })
        .collect()
}

/// Lay out the report: title, organization, date, results, recommendations.
pub fn layout(record: &ReportRecord) -> Vec<Block> {
    let profile = &record.profile;
    let mut blocks = vec![
        Block::Title("Pharma Assessment Report".to_string()),
        Block::Spacer(SPACER_PT),
        Block::Text(format!("Company Name: {}", profile.company_name)),
    ];
    if let Some(department) = &profile.department {
        blocks.push(Block::Text(format!("Department: {department}")));
    }
    if let Some(contact) = &profile.contact_person {
        blocks.push(Block::Text(format!("Contact Person: {contact}")));
    }
    blocks.push(Block::Spacer(SPACER_PT));
    blocks.push(Block::Text(format!(
        "Date: {}",
        record.created_at.format("%Y-%m-%d")
    )));
    blocks.push(Block::Spacer(SPACER_PT));

    blocks.push(Block::Heading("Assessment Results".to_string()));
    blocks.push(Block::Text(format!("Total Score: {}", record.score_display())));
    blocks.push(Block::Text(format!(
        "Maturity Level: {}",
        record.maturity_label()
    )));
    blocks.push(Block::Spacer(SPACER_PT));

    blocks.push(Block::Heading("Recommendations".to_string()));
    for line in clean_recommendations(&record.recommendations) {
        blocks.push(Block::Text(line));
        blocks.push(Block::Spacer(SPACER_PT));
    }
    blocks
}

/// Greedy word wrap to at most `width` characters per line. Words longer
/// than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Characters above Latin-1 that WinAnsi still encodes.
const WIN_ANSI_EXTRA: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}') || WIN_ANSI_EXTRA.contains(c)
}

/// Reduce text to what the built-in fonts can draw. `₹` is spelled out,
/// other whitespace becomes a space, anything else outside WinAnsi (emoji,
/// Indic scripts) is removed. Returns the text and the removed count.
fn pdf_safe(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut dropped = 0;
    for c in text.chars() {
        match c {
            '₹' => out.push_str("Rs. "),
            c if is_win_ansi(c) => out.push(c),
            c if c.is_whitespace() => out.push(' '),
            _ => dropped += 1,
        }
    }
    (out, dropped)
}

fn chars_per_line(font_size: f32) -> usize {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    (usable / (font_size * PT_TO_MM * AVG_GLYPH_EM)) as usize
}

/// Draw blocks onto as many A4 pages as needed.
pub fn render_pdf(title: &str, blocks: &[Block]) -> Result<Vec<u8>, DocumentError> {
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DocumentError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DocumentError::Font(e.to_string()))?;

    let mut layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut dropped = 0;

    for block in blocks {
        let (text, size, font): (&str, f32, &IndirectFontRef) = match block {
            Block::Spacer(pt) => {
                y -= pt * PT_TO_MM;
                continue;
            }
            Block::Title(t) => (t.as_str(), 18.0, &bold),
            Block::Heading(t) => (t.as_str(), 14.0, &bold),
            Block::Text(t) => (t.as_str(), 10.0, &regular),
        };
        let line_height = size * 1.2 * PT_TO_MM;
        let (text, removed) = pdf_safe(text);
        dropped += removed;
        for line in wrap(&text, chars_per_line(size)) {
            if y - line_height < MARGIN_MM {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(next_page).get_layer(next_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            y -= line_height;
            layer.use_text(line, size, Mm(MARGIN_MM), Mm(y), font);
        }
    }

    if dropped > 0 {
        warn!(dropped, "Characters the PDF fonts cannot draw were left out");
    }

    doc.save_to_bytes()
        .map_err(|e| DocumentError::Render(e.to_string()))
}
