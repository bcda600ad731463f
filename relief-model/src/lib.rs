pub mod event_kind;
pub mod hazard;
pub mod report;
pub mod shelter;
pub mod source_tag;
pub mod supply;

pub use event_kind::{default_radius_m, EventKind};
pub use hazard::HazardPolygon;
pub use report::Report;
pub use shelter::Shelter;
pub use source_tag::SourceTag;
pub use supply::supply_to_need;
