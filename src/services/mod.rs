pub mod catalog;
pub mod recommendations;
pub mod sharing;

pub use catalog::{CatalogClient, HttpCatalogClient};
pub use recommendations::RecommendationService;
pub use sharing::SharingService;
