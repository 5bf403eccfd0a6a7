use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical type of an uploaded compliance document. The newest document of a
/// type is the one treated as current.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[sea_orm(string_value = "pilot_license")]
    PilotLicense,
    #[sea_orm(string_value = "drone_registration")]
    DroneRegistration,
    #[sea_orm(string_value = "other")]
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::PilotLicense,
        DocumentType::DroneRegistration,
        DocumentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PilotLicense => "pilot_license",
            DocumentType::DroneRegistration => "drone_registration",
            DocumentType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::PilotLicense => "Pilot License",
            DocumentType::DroneRegistration => "Drone Registration",
            DocumentType::Other => "Other Document",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pilot_license" => Ok(DocumentType::PilotLicense),
            "drone_registration" => Ok(DocumentType::DroneRegistration),
            "other" => Ok(DocumentType::Other),
            other => Err(format!("Unknown document type '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub document_type: DocumentType,
    /// Blob key relative to the storage root, e.g. `uploads/doc_<uuid>.pdf`
    #[sea_orm(unique)]
    pub file_path: String,
    pub original_filename: String,
    /// `YYYY-MM-DD HH:MM:SS`, local time
    pub upload_date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_round_trips_through_str() {
        for ty in DocumentType::ALL {
            assert_eq!(ty.as_str().parse::<DocumentType>(), Ok(ty));
        }
        assert!("passport".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_document_type_labels() {
        assert_eq!(DocumentType::PilotLicense.label(), "Pilot License");
        assert_eq!(DocumentType::DroneRegistration.label(), "Drone Registration");
    }
}
