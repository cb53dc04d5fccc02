use rust_xlsxwriter::{Color as XlsxColor, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use tracing::{debug, warn};

use crate::config::ReportStyle;
use crate::error::{ExportError, ExportResult};
use crate::workbook::{CellValue, SheetLayout, SheetStyling, WorkbookLayout};

/// Writes `layout` into an in-memory `.xlsx` file.
///
/// Cell content failures abort the export. Styling is best-effort: a failure
/// there is logged and the sheet keeps its unstyled cells.
pub fn write_workbook(layout: &WorkbookLayout, style: &ReportStyle) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();

    for sheet in &layout.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_cells(worksheet, sheet)?;

        if let Some(styling) = &sheet.styling {
            if let Err(err) = apply_styling(worksheet, sheet, styling, style) {
                warn!(sheet = %sheet.name, error = %err, "skipping workbook styling");
            }
        }
        debug!(sheet = %sheet.name, rows = sheet.rows.len(), "wrote worksheet");
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cells(worksheet: &mut Worksheet, sheet: &SheetLayout) -> ExportResult<()> {
    for (row_index, row) in sheet.rows.iter().enumerate() {
        let row_num = row_number(row_index)?;
        for (col_index, cell) in row.iter().enumerate() {
            let col_num = column_number(col_index)?;
            match cell {
                CellValue::Text(text) => {
                    worksheet.write_string(row_num, col_num, text.as_str())?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(row_num, col_num, *number)?;
                }
                CellValue::Empty => {}
            }
        }
    }
    Ok(())
}

fn apply_styling(
    worksheet: &mut Worksheet,
    sheet: &SheetLayout,
    styling: &SheetStyling,
    style: &ReportStyle,
) -> Result<(), XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_background_color(XlsxColor::RGB(style.header_fill_color))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let header_cells = usize::try_from(styling.header_row)
        .ok()
        .and_then(|row| sheet.rows.get(row))
        .map(Vec::as_slice)
        .unwrap_or_default();
    for (col_index, cell) in header_cells.iter().enumerate() {
        let col_num = u16::try_from(col_index).map_err(|_| XlsxError::RowColumnLimitError)?;
        if let CellValue::Text(text) = cell {
            worksheet.write_string_with_format(
                styling.header_row,
                col_num,
                text.as_str(),
                &header_format,
            )?;
        }
    }

    for (col_index, width) in styling.column_widths.iter().enumerate() {
        let col_num = u16::try_from(col_index).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.set_column_width(col_num, *width)?;
    }
    Ok(())
}

fn row_number(index: usize) -> ExportResult<u32> {
    u32::try_from(index)
        .map_err(|_| ExportError::InvalidData(format!("row {index} exceeds worksheet limits")))
}

fn column_number(index: usize) -> ExportResult<u16> {
    u16::try_from(index)
        .map_err(|_| ExportError::InvalidData(format!("column {index} exceeds worksheet limits")))
}
