use super::RESULT_HEADERS;
use crate::{ResultDataset, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

pub struct ResultWriter;

impl ResultWriter {
    /// Write the whole dataset to an `.xlsx` file, replacing it
    pub fn to_file(dataset: &ResultDataset, path: &Path) -> Result<()> {
        tracing::debug!("Writing results workbook to: {}", path.display());

        let mut workbook = Self::to_workbook(dataset)?;
        workbook.save(path)?;

        tracing::debug!(
            "Saved {} result rows to {}",
            dataset.len(),
            path.display()
        );

        Ok(())
    }

    /// Build the results workbook in memory
    pub fn to_workbook(dataset: &ResultDataset) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();

        for (col, header) in RESULT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, record) in dataset.iter().enumerate() {
            let row = (idx + 1) as u32;
            let cells = [
                &record.device_label,
                &record.serial,
                &record.status,
                &record.start_date,
                &record.end_date,
            ];
            for (col, value) in cells.into_iter().enumerate() {
                worksheet.write_string(row, col as u16, value.as_str())?;
            }
        }

        worksheet.autofit();

        Ok(workbook)
    }
}
