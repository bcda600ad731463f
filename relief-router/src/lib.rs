pub mod dijkstra;
pub mod external;
pub mod hazards;
pub mod route;

use relief_geo::Location;
use relief_network::{NodeKey, RoadNetwork};

pub use dijkstra::{dijkstra as find_path, PathResult};
pub use external::{ExternalRoute, ExternalRouter, ExternalStep, HttpExternalRouter, NullExternalRouter};
pub use hazards::{avoided_hazards, build_avoid_polygons, AvoidPolygons, AvoidedHazard};
pub use route::{route_with_fallback, Route};

/// Thin forward to [`RoadNetwork::nearest_node`] — the router's public
/// surface names this as its own operation, but the planar-distance search
/// only needs the graph's own node set, so there is nothing to duplicate.
pub fn nearest_node(network: &RoadNetwork, location: &Location) -> Option<NodeKey> {
    network.nearest_node(location)
}
