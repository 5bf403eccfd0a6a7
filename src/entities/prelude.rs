pub use super::documents::Entity as Documents;
pub use super::flights::Entity as Flights;
