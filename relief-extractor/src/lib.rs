pub mod fallback;
pub mod llm;
pub mod trait_def;
pub mod types;

pub use fallback::FallbackExtractor;
pub use llm::{LlmBackedPolicy, LlmExtractor};
pub use trait_def::Extractor;
pub use types::{Intent, ParsedBy, ParsedQuery, Urgency};
