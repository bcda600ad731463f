pub mod adapter;
pub mod dataset;
pub mod official;
pub mod satellite;
pub mod schema;
pub mod shelter_report;
pub mod shelters;
pub mod social;

pub use adapter::SourceAdapter;
pub use official::OfficialAdapter;
pub use satellite::SatelliteAdapter;
pub use shelter_report::ShelterReportAdapter;
pub use shelters::{load_shelters, load_supply_depots};
pub use social::SocialAdapter;
