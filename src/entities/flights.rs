use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of operation a flight was flown under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Category {
    #[sea_orm(string_value = "Basic")]
    Basic,
    #[sea_orm(string_value = "Advance")]
    Advance,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Basic, Category::Advance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basic => "Basic",
            Category::Advance => "Advance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Basic" => Ok(Category::Basic),
            "Advance" => Ok(Category::Advance),
            other => Err(format!("Unknown category of operation '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub operation_name: String,
    pub pilot: String,
    pub max_flight_height: f64,
    pub location: String,
    pub radius: f64,
    #[sea_orm(column_name = "category_of_operation")]
    pub category: Category,
    pub activity: String,
    pub flight_type: String,
    pub manufacturer: String,
    pub model: String,
    pub registration_number: String,
    /// `YYYY-MM-DD HH:MM:SS`, no timezone
    pub take_off_time: String,
    /// `YYYY-MM-DD HH:MM:SS`, no timezone
    pub landing_time: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Date portion of the take-off timestamp.
    pub fn take_off_date(&self) -> &str {
        date_prefix(&self.take_off_time)
    }

    pub fn landing_date(&self) -> &str {
        date_prefix(&self.landing_time)
    }
}

fn date_prefix(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}
