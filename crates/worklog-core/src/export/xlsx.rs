//! Excel export
//!
//! Generates one workbook with a sheet per summary table.

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use std::path::Path;

use crate::aggregate::{DatedSummaryRow, Summaries, SummaryRow};
use crate::error::Result;

/// Summary workbook generator
pub struct SummaryWorkbook {
    workbook: Workbook,
    // Styles
    header_format: Format,
    date_format: Format,
    number_format: Format,
    total_format: Format,
}

impl SummaryWorkbook {
    pub fn new() -> Self {
        let workbook = Workbook::new();

        // Header style: blue background, white bold text
        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x4472C4))
            .set_align(rust_xlsxwriter::FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let date_format = Format::new()
            .set_num_format("dd/mm/yyyy")
            .set_align(rust_xlsxwriter::FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        // Hours with 2 decimals
        let number_format = Format::new()
            .set_num_format("0.00")
            .set_align(rust_xlsxwriter::FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        // Total row style: yellow background, bold
        let total_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xFFC000))
            .set_align(rust_xlsxwriter::FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        Self {
            workbook,
            header_format,
            date_format,
            number_format,
            total_format,
        }
    }

    /// Add the All, Daily and Weekly sheets from one run's summaries.
    pub fn create_report(&mut self, summaries: &Summaries) -> Result<()> {
        self.add_all_sheet(&summaries.all)?;
        self.add_dated_sheet("Daily", "Date", &summaries.daily)?;
        self.add_dated_sheet("Weekly", "Week", &summaries.weekly)?;
        Ok(())
    }

    fn add_all_sheet(&mut self, rows: &[SummaryRow]) -> Result<()> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name("All")?;

        let headers = ["Client", "Project", "Hours"];
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_with_format(0, col as u16, *header, &self.header_format)?;
        }

        let mut total = 0.0;
        for (idx, row) in rows.iter().enumerate() {
            let r = 1 + idx as u32;
            worksheet.write(r, 0, row.client.as_deref().unwrap_or(""))?;
            worksheet.write(r, 1, row.project.as_deref().unwrap_or(""))?;
            worksheet.write_with_format(r, 2, row.hours, &self.number_format)?;
            total += row.hours;
        }

        let total_row = 1 + rows.len() as u32;
        worksheet.write_with_format(total_row, 0, "Total", &self.total_format)?;
        worksheet.write_with_format(total_row, 2, total, &self.total_format)?;

        worksheet.set_column_width(0, 25)?;
        worksheet.set_column_width(1, 25)?;
        worksheet.set_column_width(2, 10)?;
        Ok(())
    }

    fn add_dated_sheet(
        &mut self,
        name: &str,
        date_header: &str,
        rows: &[DatedSummaryRow],
    ) -> Result<()> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name)?;

        let headers = [date_header, "Client", "Project", "Hours"];
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_with_format(0, col as u16, *header, &self.header_format)?;
        }

        let mut total = 0.0;
        for (idx, row) in rows.iter().enumerate() {
            let r = 1 + idx as u32;
            worksheet.write_with_format(r, 0, &format_date(row.date), &self.date_format)?;
            worksheet.write(r, 1, row.client.as_deref().unwrap_or(""))?;
            worksheet.write(r, 2, row.project.as_deref().unwrap_or(""))?;
            worksheet.write_with_format(r, 3, row.hours, &self.number_format)?;
            total += row.hours;
        }

        let total_row = 1 + rows.len() as u32;
        worksheet.write_with_format(total_row, 0, "Total", &self.total_format)?;
        worksheet.write_with_format(total_row, 3, total, &self.total_format)?;

        worksheet.set_column_width(0, 12)?;
        worksheet.set_column_width(1, 25)?;
        worksheet.set_column_width(2, 25)?;
        worksheet.set_column_width(3, 10)?;
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.workbook.save(path)?;
        log::info!("wrote workbook {}", path.display());
        Ok(())
    }
}

impl Default for SummaryWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
