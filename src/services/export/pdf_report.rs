use crate::api::error::AppError;
use crate::entities::flights;
use crate::utils::format::one_decimal;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

// A4 landscape, in points
const PAGE_WIDTH: f32 = 841.89;
const PAGE_HEIGHT: f32 = 595.28;
const MARGIN: f32 = 36.0;

const TITLE: &str = "Drone Flight Logbook";
const TITLE_SIZE: f32 = 16.0;
const TITLE_BLOCK: f32 = 30.0;
const FONT_SIZE: f32 = 6.5;
const HEADER_LINES: usize = 2;
const LINE_HEIGHT: f32 = 8.0;
const ROW_HEIGHT: f32 = 14.0;
const CELL_PADDING: f32 = 2.5;
const FOOTER_BLOCK: f32 = 18.0;
// Rough Helvetica advance width as a fraction of the font size
const CHAR_WIDTH: f32 = 0.55;

const EMPTY_PLACEHOLDER: &str = "No flight entries to export.";

/// Table columns with their relative widths. The id column is left out.
const COLUMNS: [(&str, f32); 13] = [
    ("Operation Name", 1.2),
    ("Pilot", 1.0),
    ("Max Height (ft AGL)", 0.8),
    ("Location", 1.1),
    ("Radius (ft)", 0.6),
    ("Category", 0.7),
    ("Activity", 1.0),
    ("Flight Type", 0.8),
    ("Manufacturer", 0.9),
    ("Model", 0.9),
    ("Registration No.", 1.0),
    ("Take off Time", 1.3),
    ("Landing Time", 1.3),
];

fn cells(row: &flights::Model) -> [String; 13] {
    [
        row.operation_name.clone(),
        row.pilot.clone(),
        one_decimal(row.max_flight_height),
        row.location.clone(),
        one_decimal(row.radius),
        row.category.as_str().to_string(),
        row.activity.clone(),
        row.flight_type.clone(),
        row.manufacturer.clone(),
        row.model.clone(),
        row.registration_number.clone(),
        row.take_off_time.clone(),
        row.landing_time.clone(),
    ]
}

fn column_widths() -> [f32; 13] {
    let total: f32 = COLUMNS.iter().map(|(_, w)| w).sum();
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    COLUMNS.map(|(_, w)| usable * w / total)
}

fn table_top() -> f32 {
    PAGE_HEIGHT - MARGIN - TITLE_BLOCK
}

fn header_height() -> f32 {
    HEADER_LINES as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
}

/// Number of flight rows that fit below the header on one page.
pub(crate) fn rows_per_page() -> usize {
    let available = table_top() - header_height() - (MARGIN + FOOTER_BLOCK);
    (available / ROW_HEIGHT).floor() as usize
}

fn max_chars(width: f32) -> usize {
    ((width - 2.0 * CELL_PADDING) / (FONT_SIZE * CHAR_WIDTH)).floor() as usize
}

/// Cuts `text` to what fits in a cell of `width`.
fn fit(text: &str, width: f32) -> String {
    let limit = max_chars(width);
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit.saturating_sub(2)).collect();
    cut.push_str("..");
    cut
}

/// Greedy word wrap used for header labels.
fn wrap(text: &str, width: f32, max_lines: usize) -> Vec<String> {
    let limit = max_chars(width);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > limit && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        let rest = lines.split_off(max_lines - 1).join(" ");
        lines.push(rest);
    }
    lines.into_iter().map(|l| fit(&l, width)).collect()
}

/// Standard fonts only cover WinAnsi; anything else is replaced.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0..=0x1f => b' ',
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

struct PageWriter {
    ops: Vec<Operation>,
}

impl PageWriter {
    fn new() -> Self {
        Self { ops: Vec::new() }
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(text))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, gray: f32) {
        self.ops.push(Operation::new("g", vec![gray.into()]));
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), w.into(), h.into()],
        ));
        self.ops.push(Operation::new("f", vec![]));
        self.ops.push(Operation::new("g", vec![0.0f32.into()]));
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32) {
        self.ops.push(Operation::new("w", vec![0.4f32.into()]));
        self.ops.push(Operation::new("m", vec![x1.into(), y.into()]));
        self.ops.push(Operation::new("l", vec![x2.into(), y.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn title(&mut self) {
        self.text(
            "F2",
            TITLE_SIZE,
            MARGIN,
            PAGE_HEIGHT - MARGIN - TITLE_SIZE,
            TITLE,
        );
    }

    fn footer(&mut self, page: usize, pages: usize) {
        let label = format!("Page {} of {}", page, pages);
        let x = PAGE_WIDTH - MARGIN - label.len() as f32 * FONT_SIZE * CHAR_WIDTH;
        self.text("F1", FONT_SIZE, x, MARGIN, &label);
    }

    fn table_header(&mut self, widths: &[f32; 13]) -> f32 {
        let top = table_top();
        let height = header_height();
        self.fill_rect(MARGIN, top - height, PAGE_WIDTH - 2.0 * MARGIN, height, 0.9);

        let mut x = MARGIN;
        for ((label, _), width) in COLUMNS.iter().zip(widths) {
            for (i, line) in wrap(label, *width, HEADER_LINES).iter().enumerate() {
                let y = top - CELL_PADDING - FONT_SIZE - i as f32 * LINE_HEIGHT;
                self.text("F2", FONT_SIZE, x + CELL_PADDING, y, line);
            }
            x += width;
        }
        self.hline(MARGIN, PAGE_WIDTH - MARGIN, top - height);
        top - height
    }

    fn row(&mut self, widths: &[f32; 13], row_top: f32, values: &[String; 13]) -> f32 {
        let baseline = row_top - (ROW_HEIGHT + FONT_SIZE) / 2.0;
        let mut x = MARGIN;
        for (value, width) in values.iter().zip(widths) {
            self.text("F1", FONT_SIZE, x + CELL_PADDING, baseline, &fit(value, *width));
            x += width;
        }
        let bottom = row_top - ROW_HEIGHT;
        self.hline(MARGIN, PAGE_WIDTH - MARGIN, bottom);
        bottom
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        Content {
            operations: self.ops,
        }
        .encode()
        .map_err(pdf_error)
    }
}

fn pdf_error(e: lopdf::Error) -> AppError {
    AppError::Internal(format!("PDF export failed: {}", e))
}

/// Lays `rows` out as a paginated landscape table. The header is repeated on
/// every page; an empty listing yields a single placeholder page.
pub fn render_pdf(rows: &[flights::Model]) -> Result<Vec<u8>, AppError> {
    let widths = column_widths();
    let per_page = rows_per_page();

    let mut pages: Vec<Vec<u8>> = Vec::new();
    if rows.is_empty() {
        let mut page = PageWriter::new();
        page.title();
        page.text("F1", 11.0, MARGIN, table_top() - 11.0, EMPTY_PLACEHOLDER);
        page.footer(1, 1);
        pages.push(page.finish()?);
    } else {
        let chunks: Vec<&[flights::Model]> = rows.chunks(per_page).collect();
        let total = chunks.len();
        for (index, chunk) in chunks.into_iter().enumerate() {
            let mut page = PageWriter::new();
            page.title();
            let mut y = page.table_header(&widths);
            for row in chunk {
                y = page.row(&widths, y, &cells(row));
            }
            page.footer(index + 1, total);
            pages.push(page.finish()?);
        }
    }

    tracing::debug!("Rendered {} flights onto {} PDF pages", rows.len(), pages.len());
    assemble(pages)
}

fn assemble(page_contents: Vec<Vec<u8>>) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        PAGE_WIDTH.into(),
        PAGE_HEIGHT.into(),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(page_contents.len());
    for content in page_contents {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(TITLE),
        "Producer" => Object::string_literal(concat!("drone-logbook ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| pdf_error(e.into()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::flights::Category;

    fn flight(id: i32) -> flights::Model {
        flights::Model {
            id,
            operation_name: format!("Operation {}", id),
            pilot: "J. Doe".to_string(),
            max_flight_height: 1234.5,
            location: "Depot".to_string(),
            radius: 50.0,
            category: Category::Basic,
            activity: "Inspection".to_string(),
            flight_type: "VLOS".to_string(),
            manufacturer: "DJI".to_string(),
            model: "Mavic 3".to_string(),
            registration_number: format!("REG-{:03}", id),
            take_off_time: "2024-01-05 10:30:00".to_string(),
            landing_time: "2024-01-05 10:55:00".to_string(),
        }
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    #[test]
    fn test_empty_listing_renders_placeholder() {
        let bytes = render_pdf(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, EMPTY_PLACEHOLDER));
        assert!(!contains(&bytes, "Registration No."));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_rows_are_formatted_to_one_decimal() {
        let bytes = render_pdf(&[flight(1)]).unwrap();
        assert!(contains(&bytes, "1,234.5"));
        assert!(contains(&bytes, "50.0"));
        assert!(contains(&bytes, "REG-001"));
        assert!(!contains(&bytes, EMPTY_PLACEHOLDER));
    }

    #[test]
    fn test_pages_are_landscape() {
        let bytes = render_pdf(&[flight(1)]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!(width > height);
    }

    #[test]
    fn test_long_listing_is_paginated() {
        let per_page = rows_per_page();
        assert!(per_page > 10);

        let rows: Vec<_> = (1..=(per_page as i32 * 2 + 1)).map(flight).collect();
        let bytes = render_pdf(&rows).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert!(contains(&bytes, "Page 3 of 3"));
    }

    #[test]
    fn test_fit_truncates_long_cells() {
        let narrow = 40.0;
        let text = "A very long location name that cannot fit";
        let fitted = fit(text, narrow);
        assert!(fitted.ends_with(".."));
        assert_eq!(fitted.chars().count(), max_chars(narrow));
        assert_eq!(fit("Depot", narrow), "Depot");
    }

    #[test]
    fn test_header_labels_wrap() {
        let lines = wrap("Max Height (ft AGL)", 50.0, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Max"));
    }

    #[test]
    fn test_encode_text_replaces_unsupported_chars() {
        assert_eq!(encode_text("Zürich"), b"Z\xfcrich".to_vec());
        assert_eq!(encode_text("東京"), b"??".to_vec());
        assert_eq!(encode_text("a\tb"), b"a b".to_vec());
    }
}
