use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::models::{FlightEntry, FlightFilter};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

const DUPLICATE_FLIGHT: &str = "A flight entry with this Registration Number and Take off Time already exists. Please check your input or update the existing entry.";

pub struct FlightService {
    db: DatabaseConnection,
}

/// `substr(take_off_time, 1, 10)`: the date portion, compared as a string.
fn take_off_date() -> SimpleExpr {
    Func::cust(Alias::new("substr"))
        .arg(Expr::col(flights::Column::TakeOffTime))
        .arg(1)
        .arg(10)
        .into()
}

/// Unique-index violations become a conflict the operator can act on.
fn map_write_error(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::info!("Duplicate flight rejected: {}", detail);
            AppError::Conflict(DUPLICATE_FLIGHT.to_string())
        }
        _ => AppError::Database(e),
    }
}

impl FlightService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, entry: FlightEntry) -> Result<flights::Model, AppError> {
        let mut active = flights::ActiveModel {
            ..Default::default()
        };
        entry.apply_to(&mut active);

        let model = active.insert(&self.db).await.map_err(map_write_error)?;
        tracing::info!(
            "✈️  Flight {} added ({} at {})",
            model.id,
            model.registration_number,
            model.take_off_time
        );
        Ok(model)
    }

    pub async fn update(&self, id: i32, entry: FlightEntry) -> Result<flights::Model, AppError> {
        let existing = self.get(id).await?;

        let mut active = existing.into_active_model();
        entry.apply_to(&mut active);

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        tracing::info!("✈️  Flight {} updated", model.id);
        Ok(model)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if id <= 0 {
            return Err(AppError::Validation(
                "Invalid entry ID for deletion.".to_string(),
            ));
        }

        let res = Flights::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(
                "Flight entry not found or could not be deleted.".to_string(),
            ));
        }

        tracing::info!("🗑️  Flight {} deleted", id);
        Ok(())
    }

    pub async fn get(&self, id: i32) -> Result<flights::Model, AppError> {
        Flights::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight entry not found.".to_string()))
    }

    /// Flights matching `filter`, most recent take-off first.
    pub async fn list(&self, filter: &FlightFilter) -> Result<Vec<flights::Model>, AppError> {
        let mut cond = Condition::all();

        if let Some(start) = filter.start_date() {
            cond = cond.add(Expr::expr(take_off_date()).gte(start));
        }
        if let Some(end) = filter.end_date() {
            cond = cond.add(Expr::expr(take_off_date()).lte(end));
        }
        if let Some(pilot) = filter.pilot() {
            cond = cond.add(flights::Column::Pilot.eq(pilot));
        }

        let rows = Flights::find()
            .filter(cond)
            .order_by_desc(flights::Column::TakeOffTime)
            .order_by_desc(flights::Column::Id)
            .all(&self.db)
            .await?;

        tracing::debug!("Listed {} flights for {:?}", rows.len(), filter);
        Ok(rows)
    }

    /// Distinct pilot names for the filter dropdown.
    pub async fn pilots(&self) -> Result<Vec<String>, AppError> {
        let names = Flights::find()
            .select_only()
            .column(flights::Column::Pilot)
            .distinct()
            .order_by_asc(flights::Column::Pilot)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(names)
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        use sea_orm::PaginatorTrait;
        Ok(Flights::find().count(&self.db).await?)
    }
}
