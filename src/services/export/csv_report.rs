use crate::api::error::AppError;
use crate::entities::flights;
use sea_orm::{IdenStatic, Iterable};

/// Writes every column of `rows` as CSV. The header row holds the storage
/// column names and is only written when there is at least one row.
pub fn render_csv(rows: &[flights::Model]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !rows.is_empty() {
        let header: Vec<String> = flights::Column::iter()
            .map(|c| c.as_str().to_string())
            .collect();
        writer.write_record(&header).map_err(csv_error)?;
    }

    for row in rows {
        writer
            .write_record([
                row.id.to_string(),
                row.operation_name.clone(),
                row.pilot.clone(),
                row.max_flight_height.to_string(),
                row.location.clone(),
                row.radius.to_string(),
                row.category.as_str().to_string(),
                row.activity.clone(),
                row.flight_type.clone(),
                row.manufacturer.clone(),
                row.model.clone(),
                row.registration_number.clone(),
                row.take_off_time.clone(),
                row.landing_time.clone(),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("CSV export failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::flights::Category;

    fn flight(id: i32, operation_name: &str) -> flights::Model {
        flights::Model {
            id,
            operation_name: operation_name.to_string(),
            pilot: "J. Doe".to_string(),
            max_flight_height: 120.0,
            location: "Depot".to_string(),
            radius: 50.5,
            category: Category::Advance,
            activity: "Inspection".to_string(),
            flight_type: "VLOS".to_string(),
            manufacturer: "DJI".to_string(),
            model: "Mavic 3".to_string(),
            registration_number: "REG-001".to_string(),
            take_off_time: "2024-01-05 10:30:00".to_string(),
            landing_time: "2024-01-05 10:55:00".to_string(),
        }
    }

    #[test]
    fn test_header_uses_storage_column_names() {
        let out = String::from_utf8(render_csv(&[flight(1, "Survey")]).unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some(
                "id,operation_name,pilot,max_flight_height,location,radius,category_of_operation,activity,flight_type,manufacturer,model,registration_number,take_off_time,landing_time"
            )
        );
        assert_eq!(
            lines.next(),
            Some(
                "1,Survey,J. Doe,120,Depot,50.5,Advance,Inspection,VLOS,DJI,Mavic 3,REG-001,2024-01-05 10:30:00,2024-01-05 10:55:00"
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let out = String::from_utf8(render_csv(&[flight(2, "Bridge, \"north\" span")]).unwrap())
            .unwrap();
        assert!(out.contains("2,\"Bridge, \"\"north\"\" span\",J. Doe"));
    }

    #[test]
    fn test_empty_result_has_no_header() {
        assert!(render_csv(&[]).unwrap().is_empty());
    }
}
