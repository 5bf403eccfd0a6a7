use super::{Flash, escape, href, layout, render_flash};
use crate::entities::{documents, flights};
use crate::models::FlightFilter;

pub struct LogbookPage<'a> {
    pub flights: &'a [flights::Model],
    pub pilots: &'a [String],
    pub filter: &'a FlightFilter,
    pub flash: Option<&'a Flash>,
    pub drone_registration: Option<&'a documents::Model>,
    pub pilot_license: Option<&'a documents::Model>,
}

/// Export link that keeps the current filter state.
pub fn export_href(filter: &FlightFilter, action: &str) -> String {
    let mut pairs = filter.query_pairs();
    pairs.push(("action", action));
    href("/", &pairs)
}

fn document_link(doc: Option<&documents::Model>, label: &str) -> String {
    match doc {
        Some(doc) => format!(
            r#"<a class="button" href="/documents/{}" target="_blank">View {} PDF</a>"#,
            doc.id,
            escape(label)
        ),
        None => format!(
            r#"<span class="muted">No {} PDF uploaded.</span>"#,
            escape(label)
        ),
    }
}

fn pilot_options(pilots: &[String], selected: Option<&str>) -> String {
    let mut out = String::from(r#"<option value="">All Pilots</option>"#);
    for pilot in pilots {
        let attr = if selected == Some(pilot.as_str()) {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape(pilot),
            attr
        ));
    }
    out
}

fn flight_rows(flights: &[flights::Model]) -> String {
    let mut out = String::new();
    for f in flights {
        out.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/detail?id={}">More Info</a></td></tr>"#,
            escape(&f.pilot),
            escape(&f.location),
            escape(&f.activity),
            escape(f.take_off_date()),
            escape(f.landing_date()),
            f.id
        ));
        out.push('\n');
    }
    out
}

pub fn render_logbook(page: &LogbookPage<'_>) -> String {
    let table = if page.flights.is_empty() {
        r#"<p class="muted">No flight entries yet or no entries match the current filter. Add some using the "Add New Flight" button!</p>"#.to_string()
    } else {
        format!(
            r#"<table>
<thead><tr><th>Pilot</th><th>Location</th><th>Activity</th><th>Take off Date</th><th>Landing Date</th><th>Actions</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
            flight_rows(page.flights)
        )
    };

    let body = format!(
        r#"<h1>Drone Flight Logbook</h1>
{flash}
<div class="actions">
<a class="button" href="/detail">Add New Flight</a>
<a class="button" href="/upload">Upload Documents</a>
<a class="button secondary" href="{csv}">Export to CSV</a>
<a class="button secondary" href="{pdf}">Export to PDF</a>
</div>
<div class="panel">
<h2>Quick Access Documents</h2>
{registration} {license}
</div>
<div class="panel">
<h2>Filter Flights</h2>
<form method="GET" action="/" class="grid">
<div><label for="filter_pilot">Pilot</label><select id="filter_pilot" name="filter_pilot">{pilots}</select></div>
<div><label for="start_date">Start Date</label><input type="date" id="start_date" name="start_date" value="{start}"></div>
<div><label for="end_date">End Date</label><input type="date" id="end_date" name="end_date" value="{end}"></div>
<div><button type="submit">Apply Filter</button> <a class="button secondary" href="/">Clear Filter</a></div>
</form>
</div>
<div class="panel">
<h2>Flight History</h2>
{table}
</div>"#,
        flash = render_flash(page.flash),
        csv = escape(&export_href(page.filter, "export_csv")),
        pdf = escape(&export_href(page.filter, "export_pdf")),
        registration = document_link(page.drone_registration, "Drone Registration"),
        license = document_link(page.pilot_license, "Pilot License"),
        pilots = pilot_options(page.pilots, page.filter.pilot()),
        start = escape(page.filter.start_date().unwrap_or_default()),
        end = escape(page.filter.end_date().unwrap_or_default()),
        table = table,
    );

    layout("Drone Flight Logbook", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::flights::Category;

    fn flight() -> flights::Model {
        flights::Model {
            id: 9,
            operation_name: "Survey".into(),
            pilot: "Ann <Ace>".into(),
            max_flight_height: 100.0,
            location: "Field".into(),
            radius: 20.0,
            category: Category::Basic,
            activity: "Mapping".into(),
            flight_type: "VLOS".into(),
            manufacturer: "DJI".into(),
            model: "Mini".into(),
            registration_number: "R1".into(),
            take_off_time: "2024-02-01 08:00:00".into(),
            landing_time: "2024-02-01 08:20:00".into(),
        }
    }

    #[test]
    fn test_export_links_keep_filter() {
        let filter = FlightFilter {
            start_date: Some("2024-01-01".into()),
            end_date: None,
            filter_pilot: Some("Ann".into()),
        };
        assert_eq!(
            export_href(&filter, "export_csv"),
            "/?start_date=2024-01-01&filter_pilot=Ann&action=export_csv"
        );
        assert_eq!(
            export_href(&FlightFilter::default(), "export_pdf"),
            "/?action=export_pdf"
        );
    }

    #[test]
    fn test_rows_show_dates_and_escape_text() {
        let flights = [flight()];
        let pilots = vec!["Ann <Ace>".to_string()];
        let filter = FlightFilter {
            filter_pilot: Some("Ann <Ace>".into()),
            ..Default::default()
        };
        let html = render_logbook(&LogbookPage {
            flights: &flights,
            pilots: &pilots,
            filter: &filter,
            flash: None,
            drone_registration: None,
            pilot_license: None,
        });
        assert!(html.contains("<td>2024-02-01</td>"));
        assert!(html.contains(r#"href="/detail?id=9""#));
        assert!(html.contains("Ann &lt;Ace&gt;"));
        assert!(html.contains(r#"<option value="Ann &lt;Ace&gt;" selected>"#));
        assert!(html.contains("No Pilot License PDF uploaded."));
    }

    #[test]
    fn test_empty_listing_shows_placeholder() {
        let html = render_logbook(&LogbookPage {
            flights: &[],
            pilots: &[],
            filter: &FlightFilter::default(),
            flash: Some(&Flash::success("Flight entry deleted successfully.")),
            drone_registration: None,
            pilot_license: None,
        });
        assert!(html.contains("No flight entries yet"));
        assert!(html.contains("Flight entry deleted successfully."));
        assert!(!html.contains("<table>"));
    }
}
