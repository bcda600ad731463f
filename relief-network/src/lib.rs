pub mod edge;
pub mod geojson;
pub mod graph;
pub mod node_key;

pub use edge::{Edge, EdgeId, EdgeStatus, EdgeStatusKind};
pub use graph::RoadNetwork;
pub use node_key::{round6, NodeKey};
