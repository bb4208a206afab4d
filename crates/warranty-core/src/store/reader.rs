use super::RESULT_HEADERS;
use crate::{ColumnMap, Error, ResultDataset, ResultRecord, Result, WorkItem};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;

pub struct InputReader;

impl InputReader {
    /// Read every row of the input spreadsheet as a work item.
    ///
    /// Fails when the file is missing, is not a readable workbook, or lacks
    /// any of the configured columns.
    pub fn read_work_items(path: &Path, columns: &ColumnMap) -> Result<Vec<WorkItem>> {
        tracing::debug!("Reading serial numbers from: {}", path.display());

        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }

        let range = first_sheet(path)?;
        let headers = HeaderIndex::new(&range);

        let serial_col = headers.require(&columns.serial)?;
        let model_col = headers.require(&columns.model)?;
        let device_col = headers.require(&columns.device)?;

        let mut items = Vec::new();
        for row in range.rows().skip(1) {
            let serial = cell_text(row.get(serial_col));
            let model = cell_text(row.get(model_col));
            let device = cell_text(row.get(device_col));

            if serial.is_empty() && model.is_empty() && device.is_empty() {
                continue;
            }

            let model_hint = if model.is_empty() { None } else { Some(model) };
            items.push(WorkItem::new(serial, model_hint, device));
        }

        tracing::info!(
            "Found {} serial number(s) in '{}'",
            items.len(),
            path.display()
        );

        Ok(items)
    }
}

/// Read a results spreadsheet written by [`ResultWriter`](super::ResultWriter)
/// or edited by hand. Only the serial column is mandatory.
pub(super) fn read_results(path: &Path) -> Result<ResultDataset> {
    let range = first_sheet(path)?;
    let headers = HeaderIndex::new(&range);

    let serial_col = headers.require(RESULT_HEADERS[1])?;
    let columns: Vec<Option<usize>> = RESULT_HEADERS.iter().map(|h| headers.find(h)).collect();

    let mut records = Vec::new();
    for row in range.rows().skip(1) {
        let value = |col: Option<usize>| col.map(|c| cell_text(row.get(c))).unwrap_or_default();

        let serial = cell_text(row.get(serial_col));
        if serial.is_empty() {
            continue;
        }

        records.push(ResultRecord {
            device_label: value(columns[0]),
            serial,
            status: value(columns[2]),
            start_date: value(columns[3]),
            end_date: value(columns[4]),
        });
    }

    Ok(ResultDataset::from_records(records))
}

fn first_sheet(path: &Path) -> Result<Range<Data>> {
    let mut workbook = open_workbook_auto(path)?;
    match workbook.worksheet_range_at(0) {
        Some(range) => Ok(range?),
        None => Err(Error::EmptyWorkbook(path.to_path_buf())),
    }
}

/// Column positions keyed by the header row
struct HeaderIndex {
    names: Vec<String>,
}

impl HeaderIndex {
    fn new(range: &Range<Data>) -> Self {
        let names = range
            .rows()
            .next()
            .map(|row| row.iter().map(|cell| cell_text(Some(cell))).collect())
            .unwrap_or_default();
        Self { names }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name.trim())
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.find(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }
}

/// Cell contents as text. Whole numbers drop the fractional part so numeric
/// serials read back the way they were typed.
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Some(other) => other.to_string().trim().to_string(),
    }
}
