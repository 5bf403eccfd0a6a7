//! CSV and PDF renderings of a filtered flight listing.

pub mod csv_report;
pub mod pdf_report;

pub use csv_report::render_csv;
pub use pdf_report::render_pdf;

pub const CSV_FILENAME: &str = "drone_flights.csv";
pub const PDF_FILENAME: &str = "drone_flight_logbook.pdf";
