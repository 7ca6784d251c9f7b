//! Multi-sheet workbook export.
//!
//! Sheet order: Version, Scope, Terms, Summary, then one detail sheet per room that has
//! items. Money is written as numbers in the selected currency with an explicit
//! two-decimal format; stored USD values are converted at write time.

pub mod content;
pub mod sheet_names;

use crate::currency::{format_currency, ExchangeRates};
use crate::error::BoqError;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use shared_types::{ClientDetails, Currency, Room};
use std::borrow::Cow;

pub use sheet_names::{sanitize, SheetNamer, MAX_SHEET_NAME_LEN};

pub const VERSION_SHEET: &str = "Version";
pub const SCOPE_SHEET: &str = "Scope";
pub const TERMS_SHEET: &str = "Terms";
pub const SUMMARY_SHEET: &str = "Summary";

pub const DETAIL_HEADERS: [&str; 10] = [
    "Category",
    "Brand",
    "Model Number",
    "Item Name",
    "Description",
    "Qty",
    "Unit Price",
    "Total Price",
    "Notes",
    "Image",
];

/// First row of item data on a detail sheet
pub const DETAIL_FIRST_ITEM_ROW: u32 = 4;

/// Longest URL Excel accepts in a hyperlink
const MAX_HYPERLINK_LEN: usize = 2000;

/// Longest text, in characters, a single Excel cell can hold
pub const MAX_CELL_TEXT_LEN: usize = 32_767;

pub struct ExportRequest<'a> {
    pub rooms: &'a [Room],
    pub client_details: &'a ClientDetails,
    pub currency: Currency,
    pub rates: &'a ExchangeRates,
}

#[derive(Debug, Clone)]
pub struct ExportedWorkbook {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub sheet_names: Vec<String>,
}

struct Formats {
    title: Format,
    bold: Format,
    header: Format,
    money: Format,
    money_bold: Format,
    wrap: Format,
}

impl Formats {
    fn new(currency: Currency) -> Self {
        let money_pattern = format!("\"{}\"#,##0.00", currency.symbol());
        Self {
            title: Format::new().set_bold().set_font_size(14),
            bold: Format::new().set_bold(),
            header: Format::new().set_bold().set_background_color("#D9E1F2"),
            money: Format::new().set_num_format(&money_pattern),
            money_bold: Format::new().set_bold().set_num_format(&money_pattern),
            wrap: Format::new().set_text_wrap(),
        }
    }
}

pub fn export_workbook(request: &ExportRequest<'_>) -> Result<ExportedWorkbook, BoqError> {
    if request.rooms.is_empty() {
        return Err(BoqError::empty_state(
            "There are no rooms to export. Please generate a BOQ first.",
        ));
    }
    if !request.client_details.has_project_name() {
        return Err(BoqError::empty_state(
            "A project name is required before exporting.",
        ));
    }

    let formats = Formats::new(request.currency);
    let mut workbook = Workbook::new();
    let mut sheet_names = Vec::new();

    let sheets = [
        version_sheet(request, &formats)?,
        scope_sheet(&formats)?,
        terms_sheet(&formats)?,
        summary_sheet(request, &formats)?,
    ];
    for sheet in sheets {
        sheet_names.push(sheet.name());
        workbook.push_worksheet(sheet);
    }

    let mut namer = SheetNamer::new();
    for room in request.rooms.iter().filter(|r| !r.boq.is_empty()) {
        let name = namer.name_for(&room.name);
        let sheet = room_sheet(&name, room, request, &formats)?;
        sheet_names.push(name);
        workbook.push_worksheet(sheet);
    }

    let bytes = workbook.save_to_buffer()?;
    let file_name = file_name(request.client_details, request.rooms);

    tracing::info!(
        file_name = %file_name,
        sheets = sheet_names.len(),
        bytes = bytes.len(),
        currency = %request.currency,
        "Exported BOQ workbook"
    );

    Ok(ExportedWorkbook {
        file_name,
        bytes,
        sheet_names,
    })
}

/// `<project> - <room> BOQ.xlsx` for a single room, `<project> BOQ.xlsx` otherwise
pub fn file_name(client_details: &ClientDetails, rooms: &[Room]) -> String {
    let project = client_details.project_name.trim();
    let stem = match rooms {
        [only] => format!("{} - {} BOQ", project, only.name.trim()),
        _ => format!("{} BOQ", project),
    };
    format!("{}.xlsx", sanitize_file_name(&stem))
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn version_sheet(request: &ExportRequest<'_>, formats: &Formats) -> Result<Worksheet, XlsxError> {
    let details = request.client_details;
    let mut sheet = Worksheet::new();
    sheet.set_name(VERSION_SHEET)?;
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 60)?;

    sheet.write_string_with_format(0, 0, "Bill of Quantities", &formats.title)?;

    let budget = details
        .budget
        .map(|b| format_currency(b, Currency::REFERENCE))
        .unwrap_or_default();
    let rate = request.rates.rate(request.currency);
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();

    let rows: [(&str, String); 14] = [
        ("Project Name", details.project_name.clone()),
        ("Client Name", details.client_name.clone()),
        ("Prepared By", details.prepared_by.clone()),
        ("Date", details.date.clone()),
        ("Design Engineer", details.design_engineer.clone()),
        ("Account Manager", details.account_manager.clone()),
        ("Key Client Personnel", details.key_client_personnel.clone()),
        ("Location", details.location.clone()),
        ("Key Comments", details.key_comments.clone()),
        ("Budget", budget),
        ("Currency", request.currency.label()),
        (
            "Exchange Rate",
            format!("1 {} = {} {}", Currency::REFERENCE, rate, request.currency),
        ),
        ("Generated", generated),
        ("Document Version", "1.0".to_string()),
    ];

    for (offset, (key, value)) in rows.iter().enumerate() {
        let row = offset as u32 + 2;
        sheet.write_string_with_format(row, 0, *key, &formats.bold)?;
        sheet.write_string_with_format(row, 1, cell_text(value), &formats.wrap)?;
    }

    Ok(sheet)
}

fn write_numbered_list(
    sheet: &mut Worksheet,
    start_row: u32,
    heading: &str,
    lines: &[&str],
    formats: &Formats,
) -> Result<u32, XlsxError> {
    sheet.write_string_with_format(start_row, 0, heading, &formats.title)?;
    for (i, line) in lines.iter().enumerate() {
        let row = start_row + 1 + i as u32;
        sheet.write_number(row, 0, (i + 1) as f64)?;
        sheet.write_string_with_format(row, 1, *line, &formats.wrap)?;
    }
    Ok(start_row + 1 + lines.len() as u32)
}

fn scope_sheet(formats: &Formats) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(SCOPE_SHEET)?;
    sheet.set_column_width(0, 6)?;
    sheet.set_column_width(1, 100)?;

    let next = write_numbered_list(&mut sheet, 0, "Scope of Work", content::SCOPE_OF_WORK, formats)?;
    write_numbered_list(&mut sheet, next + 1, "Exclusions", content::EXCLUSIONS, formats)?;
    Ok(sheet)
}

fn terms_sheet(formats: &Formats) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(TERMS_SHEET)?;
    sheet.set_column_width(0, 6)?;
    sheet.set_column_width(1, 100)?;

    write_numbered_list(
        &mut sheet,
        0,
        "Terms & Conditions",
        content::TERMS_AND_CONDITIONS,
        formats,
    )?;
    Ok(sheet)
}

fn summary_sheet(request: &ExportRequest<'_>, formats: &Formats) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET)?;
    sheet.set_column_width(0, 40)?;
    sheet.set_column_width(1, 10)?;
    sheet.set_column_width(2, 20)?;

    let total_header = format!("Total ({})", request.currency);
    sheet.write_string_with_format(0, 0, "Room", &formats.header)?;
    sheet.write_string_with_format(0, 1, "Items", &formats.header)?;
    sheet.write_string_with_format(0, 2, &total_header, &formats.header)?;

    let mut grand_total = 0.0;
    for (i, room) in request.rooms.iter().enumerate() {
        let row = i as u32 + 1;
        let total = request.rates.to_display(room.total(), request.currency);
        grand_total += total;
        sheet.write_string(row, 0, cell_text(&room.name))?;
        sheet.write_number(row, 1, room.boq.len() as f64)?;
        sheet.write_number_with_format(row, 2, total, &formats.money)?;
    }

    let total_row = request.rooms.len() as u32 + 1;
    sheet.write_string_with_format(total_row, 0, "Grand Total", &formats.bold)?;
    sheet.write_number_with_format(total_row, 2, grand_total, &formats.money_bold)?;

    Ok(sheet)
}

fn room_sheet(
    name: &str,
    room: &Room,
    request: &ExportRequest<'_>,
    formats: &Formats,
) -> Result<Worksheet, XlsxError> {
    let rate = request.rates.rate(request.currency);
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;

    for (col, width) in [20, 18, 20, 30, 50, 6, 15, 15, 30, 40].into_iter().enumerate() {
        sheet.set_column_width(col as u16, width)?;
    }

    sheet.write_string_with_format(
        0,
        0,
        cell_text(&format!("{} - Bill of Quantities", room.name)),
        &formats.title,
    )?;
    if !room.requirements.trim().is_empty() {
        sheet.write_string_with_format(1, 0, cell_text(&room.requirements), &formats.wrap)?;
    }

    for (col, header) in DETAIL_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(3, col as u16, *header, &formats.header)?;
    }

    let mut grand_total = 0.0;
    for (i, item) in room.boq.iter().enumerate() {
        let row = DETAIL_FIRST_ITEM_ROW + i as u32;
        let unit_price = item.unit_price * rate;
        let total = f64::from(item.quantity) * unit_price;
        grand_total += total;

        sheet.write_string(row, 0, cell_text(&item.category))?;
        sheet.write_string(row, 1, cell_text(&item.brand))?;
        sheet.write_string(row, 2, cell_text(&item.model_number))?;
        sheet.write_string(row, 3, cell_text(&item.item_name))?;
        sheet.write_string_with_format(row, 4, cell_text(&item.description), &formats.wrap)?;
        sheet.write_number(row, 5, f64::from(item.quantity))?;
        sheet.write_number_with_format(row, 6, unit_price, &formats.money)?;
        sheet.write_number_with_format(row, 7, total, &formats.money)?;
        sheet.write_string_with_format(row, 8, cell_text(&item.notes), &formats.wrap)?;

        if let Some(url) = item.image_url.as_deref().map(str::trim) {
            if is_linkable(url) {
                sheet.write_url_with_text(row, 9, url, "View Image")?;
            } else if !url.is_empty() {
                sheet.write_string(row, 9, cell_text(url))?;
            }
        }
    }

    let total_row = DETAIL_FIRST_ITEM_ROW + room.boq.len() as u32;
    sheet.write_string_with_format(total_row, 6, "Grand Total", &formats.bold)?;
    sheet.write_number_with_format(total_row, 7, grand_total, &formats.money_bold)?;

    Ok(sheet)
}

/// Cuts free text to what one cell can hold, on a character boundary
fn cell_text(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_CELL_TEXT_LEN) {
        Some((end, _)) => Cow::Owned(text[..end].to_string()),
        None => Cow::Borrowed(text),
    }
}

fn is_linkable(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && url.len() <= MAX_HYPERLINK_LEN
}
