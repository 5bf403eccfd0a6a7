use crate::api::error::AppError;
use crate::entities::flights::{self, Category};
use crate::utils::validation::{normalize_timestamp, parse_measurement};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Raw `POST /detail` body. Every field is optional so that a partially
/// filled form still reaches validation and can be rendered back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSubmission {
    pub action: Option<String>,
    pub entry_id: Option<String>,
    pub operation_name: Option<String>,
    pub pilot: Option<String>,
    pub max_flight_height: Option<String>,
    pub location: Option<String>,
    pub radius: Option<String>,
    pub category_of_operation: Option<String>,
    pub activity: Option<String>,
    pub flight_type: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub registration_number: Option<String>,
    pub take_off_time: Option<String>,
    pub landing_time: Option<String>,
}

#[derive(Debug, Validate)]
struct FlightFields {
    #[validate(length(min = 1))]
    operation_name: String,
    #[validate(length(min = 1))]
    pilot: String,
    #[validate(required, range(min = 0.0))]
    max_flight_height: Option<f64>,
    #[validate(length(min = 1))]
    location: String,
    #[validate(required, range(min = 0.0))]
    radius: Option<f64>,
    #[validate(required)]
    category_of_operation: Option<Category>,
    #[validate(length(min = 1))]
    activity: String,
    #[validate(length(min = 1))]
    flight_type: String,
    #[validate(length(min = 1))]
    manufacturer: String,
    #[validate(length(min = 1))]
    model: String,
    #[validate(length(min = 1))]
    registration_number: String,
    #[validate(required)]
    take_off_time: Option<String>,
    #[validate(required)]
    landing_time: Option<String>,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

impl FlightSubmission {
    /// Trims, parses and validates the submitted fields.
    pub fn to_entry(&self) -> Result<FlightEntry, AppError> {
        let fields = FlightFields {
            operation_name: trimmed(&self.operation_name),
            pilot: trimmed(&self.pilot),
            max_flight_height: self
                .max_flight_height
                .as_deref()
                .and_then(parse_measurement),
            location: trimmed(&self.location),
            radius: self.radius.as_deref().and_then(parse_measurement),
            category_of_operation: self
                .category_of_operation
                .as_deref()
                .and_then(|c| c.parse().ok()),
            activity: trimmed(&self.activity),
            flight_type: trimmed(&self.flight_type),
            manufacturer: trimmed(&self.manufacturer),
            model: trimmed(&self.model),
            registration_number: trimmed(&self.registration_number),
            take_off_time: self.take_off_time.as_deref().and_then(normalize_timestamp),
            landing_time: self.landing_time.as_deref().and_then(normalize_timestamp),
        };

        if let Err(errors) = fields.validate() {
            let mut invalid: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|k| k.to_string())
                .collect();
            invalid.sort();
            tracing::debug!("Rejected flight submission: {:?}", invalid);
            return Err(invalid_fields(&invalid));
        }

        match fields {
            FlightFields {
                max_flight_height: Some(max_flight_height),
                radius: Some(radius),
                category_of_operation: Some(category),
                take_off_time: Some(take_off_time),
                landing_time: Some(landing_time),
                operation_name,
                pilot,
                location,
                activity,
                flight_type,
                manufacturer,
                model,
                registration_number,
            } => Ok(FlightEntry {
                operation_name,
                pilot,
                max_flight_height,
                location,
                radius,
                category,
                activity,
                flight_type,
                manufacturer,
                model,
                registration_number,
                take_off_time,
                landing_time,
            }),
            _ => Err(invalid_fields(&[])),
        }
    }
}

fn invalid_fields(names: &[String]) -> AppError {
    let detail = if names.is_empty() {
        String::new()
    } else {
        format!(" Check: {}.", names.join(", "))
    };
    AppError::Validation(format!(
        "Please fill in all fields correctly. Numerical fields must be non-negative numbers.{}",
        detail
    ))
}

/// A validated flight, ready to be written to the `flights` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEntry {
    pub operation_name: String,
    pub pilot: String,
    pub max_flight_height: f64,
    pub location: String,
    pub radius: f64,
    pub category: Category,
    pub activity: String,
    pub flight_type: String,
    pub manufacturer: String,
    pub model: String,
    pub registration_number: String,
    pub take_off_time: String,
    pub landing_time: String,
}

impl FlightEntry {
    /// Copies every field onto `active`; updates are full replaces.
    pub fn apply_to(self, active: &mut flights::ActiveModel) {
        active.operation_name = Set(self.operation_name);
        active.pilot = Set(self.pilot);
        active.max_flight_height = Set(self.max_flight_height);
        active.location = Set(self.location);
        active.radius = Set(self.radius);
        active.category = Set(self.category);
        active.activity = Set(self.activity);
        active.flight_type = Set(self.flight_type);
        active.manufacturer = Set(self.manufacturer);
        active.model = Set(self.model);
        active.registration_number = Set(self.registration_number);
        active.take_off_time = Set(self.take_off_time);
        active.landing_time = Set(self.landing_time);
    }
}

/// Filters for the flight listing and its exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightFilter {
    /// Inclusive lower bound on the take-off date, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive upper bound on the take-off date, `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// Exact pilot name
    pub filter_pilot: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl FlightFilter {
    pub fn start_date(&self) -> Option<&str> {
        non_empty(&self.start_date)
    }

    pub fn end_date(&self) -> Option<&str> {
        non_empty(&self.end_date)
    }

    pub fn pilot(&self) -> Option<&str> {
        non_empty(&self.filter_pilot)
    }

    pub fn is_empty(&self) -> bool {
        self.start_date().is_none() && self.end_date().is_none() && self.pilot().is_none()
    }

    /// Query pairs for links that must keep the current filter state.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(v) = self.start_date() {
            pairs.push(("start_date", v));
        }
        if let Some(v) = self.end_date() {
            pairs.push(("end_date", v));
        }
        if let Some(v) = self.pilot() {
            pairs.push(("filter_pilot", v));
        }
        pairs
    }
}

/// Values shown in the flight form, either loaded from a stored row or
/// echoed back from a rejected submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightFormValues {
    pub id: Option<i32>,
    pub operation_name: String,
    pub pilot: String,
    pub max_flight_height: String,
    pub location: String,
    pub radius: String,
    pub category_of_operation: String,
    pub activity: String,
    pub flight_type: String,
    pub manufacturer: String,
    pub model: String,
    pub registration_number: String,
    pub take_off_time: String,
    pub landing_time: String,
}

impl From<&flights::Model> for FlightFormValues {
    fn from(m: &flights::Model) -> Self {
        Self {
            id: Some(m.id),
            operation_name: m.operation_name.clone(),
            pilot: m.pilot.clone(),
            max_flight_height: m.max_flight_height.to_string(),
            location: m.location.clone(),
            radius: m.radius.to_string(),
            category_of_operation: m.category.as_str().to_string(),
            activity: m.activity.clone(),
            flight_type: m.flight_type.clone(),
            manufacturer: m.manufacturer.clone(),
            model: m.model.clone(),
            registration_number: m.registration_number.clone(),
            take_off_time: m.take_off_time.clone(),
            landing_time: m.landing_time.clone(),
        }
    }
}

impl FlightFormValues {
    pub fn from_submission(id: Option<i32>, s: &FlightSubmission) -> Self {
        let raw = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            id,
            operation_name: raw(&s.operation_name),
            pilot: raw(&s.pilot),
            max_flight_height: raw(&s.max_flight_height),
            location: raw(&s.location),
            radius: raw(&s.radius),
            category_of_operation: raw(&s.category_of_operation),
            activity: raw(&s.activity),
            flight_type: raw(&s.flight_type),
            manufacturer: raw(&s.manufacturer),
            model: raw(&s.model),
            registration_number: raw(&s.registration_number),
            take_off_time: raw(&s.take_off_time),
            landing_time: raw(&s.landing_time),
        }
    }
}
