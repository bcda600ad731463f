pub mod conflicts;
pub mod config;
pub mod pipeline;
pub mod reasoning;
pub mod shelter_score;
pub mod timeouts;
pub mod types;

pub use config::PipelineConfig;
pub use pipeline::QueryPipeline;
pub use timeouts::{TimeoutExtractor, TimeoutRouter};
pub use types::{ConflictResolved, DeliveryPlan, QueryResponse, SituationalAwareness};
