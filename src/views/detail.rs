use super::{Flash, escape, layout, render_flash};
use crate::entities::flights::Category;
use crate::models::FlightFormValues;

/// Stored `YYYY-MM-DD HH:MM:SS` values shown in a `datetime-local` input.
fn datetime_local(value: &str) -> String {
    value.replacen(' ', "T", 1)
}

fn text_input(id: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div><label for="{id}">{label}</label><input type="text" id="{id}" name="{id}" required value="{value}"></div>"#,
        id = id,
        label = label,
        value = escape(value)
    )
}

fn number_input(id: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div><label for="{id}">{label}</label><input type="number" step="0.1" min="0" id="{id}" name="{id}" required value="{value}"></div>"#,
        id = id,
        label = label,
        value = escape(value)
    )
}

fn datetime_input(id: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div><label for="{id}">{label}</label><input type="datetime-local" step="1" id="{id}" name="{id}" required value="{value}"></div>"#,
        id = id,
        label = label,
        value = escape(&datetime_local(value))
    )
}

fn category_select(selected: &str) -> String {
    let mut options = String::from(r#"<option value="">Select Category</option>"#);
    for category in Category::ALL {
        let attr = if selected == category.as_str() {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{0}"{1}>{0}</option>"#,
            category.as_str(),
            attr
        ));
    }
    format!(
        r#"<div><label for="category_of_operation">Category of Operation</label><select id="category_of_operation" name="category_of_operation" required>{}</select></div>"#,
        options
    )
}

pub fn render_detail(values: &FlightFormValues, flash: Option<&Flash>) -> String {
    let (heading, action, submit, form_action) = match values.id {
        Some(id) => (
            "Edit Flight Entry",
            "update_flight",
            "Update Flight",
            format!("/detail?id={}", id),
        ),
        None => (
            "Add New Flight",
            "add_flight",
            "Add Flight",
            "/detail".to_string(),
        ),
    };

    let delete_form = match values.id {
        Some(id) => format!(
            r#"<form method="POST" action="/detail?id={id}" onsubmit="return confirm('Delete this flight entry?');">
<input type="hidden" name="action" value="delete_entry">
<input type="hidden" name="entry_id" value="{id}">
<button type="submit" class="danger">Delete Flight</button>
</form>"#,
            id = id,
        ),
        None => String::new(),
    };

    let body = format!(
        r#"<h1>{heading}</h1>
<p><a href="/">&larr; Back to Logbook</a></p>
{flash}
<form method="POST" action="{form_action}">
<input type="hidden" name="action" value="{action}">
<div class="panel">
<h2>Operation Details</h2>
<div class="grid">
{operation_name}
{pilot}
{max_flight_height}
{location}
{radius}
{category}
{activity}
{flight_type}
</div>
</div>
<div class="panel">
<h2>Drone Details</h2>
<div class="grid">
{manufacturer}
{model}
{registration_number}
</div>
</div>
<div class="panel">
<h2>Flight Details</h2>
<div class="grid">
{take_off_time}
{landing_time}
</div>
</div>
<button type="submit">{submit}</button>
</form>
{delete_form}"#,
        heading = heading,
        flash = render_flash(flash),
        form_action = escape(&form_action),
        action = action,
        operation_name = text_input("operation_name", "Operation Name", &values.operation_name),
        pilot = text_input("pilot", "Pilot", &values.pilot),
        max_flight_height = number_input(
            "max_flight_height",
            "Max Flight Height (ft AGL)",
            &values.max_flight_height
        ),
        location = text_input("location", "Location", &values.location),
        radius = number_input("radius", "Radius (ft)", &values.radius),
        category = category_select(&values.category_of_operation),
        activity = text_input("activity", "Activity", &values.activity),
        flight_type = text_input("flight_type", "Flight Type", &values.flight_type),
        manufacturer = text_input("manufacturer", "Manufacturer", &values.manufacturer),
        model = text_input("model", "Model", &values.model),
        registration_number = text_input(
            "registration_number",
            "Registration Number",
            &values.registration_number
        ),
        take_off_time = datetime_input("take_off_time", "Take off Time", &values.take_off_time),
        landing_time = datetime_input("landing_time", "Landing Time", &values.landing_time),
        submit = submit,
        delete_form = delete_form,
    );

    layout(&format!("{} - Drone Flight Tracker", heading), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_form_adds_flight() {
        let html = render_detail(&FlightFormValues::default(), None);
        assert!(html.contains("Add New Flight"));
        assert!(html.contains(r#"name="action" value="add_flight""#));
        assert!(!html.contains("delete_entry"));
    }

    #[test]
    fn test_edit_form_prefills_values() {
        let values = FlightFormValues {
            id: Some(3),
            pilot: "O'Neil".into(),
            category_of_operation: "Advance".into(),
            take_off_time: "2024-01-05 10:30:00".into(),
            ..Default::default()
        };
        let html = render_detail(&values, Some(&Flash::error("Duplicate")));
        assert!(html.contains(r#"action="/detail?id=3""#));
        assert!(html.contains(r#"value="update_flight""#));
        assert!(html.contains(r#"value="O&#39;Neil""#));
        assert!(html.contains(r#"<option value="Advance" selected>"#));
        assert!(html.contains(r#"value="2024-01-05T10:30:00""#));
        assert!(html.contains(r#"name="entry_id" value="3""#));
        assert!(html.contains("Duplicate"));
    }
}
