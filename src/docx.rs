// 🖨️ DOCX output for a generated Report

use crate::error::{ReportError, Result};
use crate::report::Report;
use docx_rs::{AlignmentType, Docx, Paragraph, Run, Table, TableCell, TableRow};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Half-points
const TITLE_SIZE: usize = 40;

fn text(s: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(s))
}

fn centered(s: &str) -> Paragraph {
    text(s).align(AlignmentType::Center)
}

fn row(cells: &[String]) -> TableRow {
    TableRow::new(
        cells
            .iter()
            .map(|c| TableCell::new().add_paragraph(text(c)))
            .collect(),
    )
}

/// Title, table, then the centered closing block
pub fn render(report: &Report) -> Docx {
    let title = Paragraph::new()
        .add_run(Run::new().add_text(&report.title).bold().size(TITLE_SIZE))
        .align(AlignmentType::Center);

    let mut rows = Vec::with_capacity(report.rows.len() + 1);
    rows.push(row(&report.headers));
    rows.extend(report.rows.iter().map(|r| row(r)));

    Docx::new()
        .add_paragraph(title)
        .add_table(Table::new(rows))
        .add_paragraph(text(""))
        .add_paragraph(text(""))
        .add_paragraph(centered(&report.sign_off))
        .add_paragraph(centered(&report.date_line))
        .add_paragraph(text(""))
        .add_paragraph(centered(&report.attribution))
        .add_paragraph(text(""))
        .add_paragraph(centered(&report.salutation))
}

/// Packed DOCX archive
pub fn to_bytes(report: &Report) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    render(report)
        .build()
        .pack(&mut buf)
        .map_err(|e| ReportError::Docx(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Packs in memory first so a failed build never leaves a partial file
pub fn write(report: &Report, path: &Path) -> Result<()> {
    let bytes = to_bytes(report)?;
    fs::write(path, bytes).map_err(|e| ReportError::io(path, e))?;

    info!(path = %path.display(), rows = report.rows.len(), "wrote report");
    Ok(())
}
