use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use relief_geo::Location;
use relief_network::{EdgeId, NodeKey, RoadNetwork};

/// Result of a successful internal-graph search: the node sequence, the
/// edges traversed (for damage/closure analysis), the concatenated
/// polyline geometry, and total distance in meters.
#[derive(Debug, Clone)]
pub struct PathResult {
    pub node_path: Vec<NodeKey>,
    pub edges: Vec<EdgeId>,
    pub geometry: Vec<Location>,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: NodeKey,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest cost first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary-heap Dijkstra over `RoadNetwork::effective_weight`. Uses the
/// "in-heap marker" trick instead of decrease-key: a node may be pushed
/// more than once, and stale entries are skipped on pop by comparing
/// against the best known distance. Edges whose effective weight is
/// infinite are never relaxed across, so closed roads are excluded
/// implicitly rather than by special-casing.
pub fn dijkstra(network: &RoadNetwork, src: NodeKey, dst: NodeKey) -> Option<PathResult> {
    if src == dst {
        return Some(PathResult {
            node_path: vec![src],
            edges: Vec::new(),
            geometry: Vec::new(),
            distance_m: 0.0,
        });
    }

    let mut dist: HashMap<NodeKey, f64> = HashMap::new();
    let mut prev: HashMap<NodeKey, (NodeKey, EdgeId)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(src, 0.0);
    heap.push(HeapEntry { cost: 0.0, node: src });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        if node == dst {
            break;
        }
        let Some(edge_ids) = network.adjacency.get(&node) else {
            continue;
        };
        for &edge_id in edge_ids {
            let edge = &network.edges[edge_id];
            let weight = network.effective_weight(edge_id);
            if weight.is_infinite() {
                continue;
            }
            let next_cost = cost + weight;
            let better = next_cost < *dist.get(&edge.to).unwrap_or(&f64::INFINITY);
            if better {
                dist.insert(edge.to, next_cost);
                prev.insert(edge.to, (node, edge_id));
                heap.push(HeapEntry {
                    cost: next_cost,
                    node: edge.to,
                });
            }
        }
    }

    if !dist.contains_key(&dst) {
        return None;
    }

    let mut node_path = vec![dst];
    let mut edges = Vec::new();
    let mut cursor = dst;
    while cursor != src {
        let (parent, edge_id) = prev.get(&cursor).copied()?;
        edges.push(edge_id);
        node_path.push(parent);
        cursor = parent;
    }
    node_path.reverse();
    edges.reverse();

    let mut geometry = Vec::new();
    let mut distance_m = 0.0;
    for &edge_id in &edges {
        let edge = &network.edges[edge_id];
        distance_m += edge.length_m;
        geometry.extend(edge.geometry.iter().cloned());
    }

    Some(PathResult {
        node_path,
        distance_m,
        edges,
        geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_network::{Edge, EdgeStatus};

    fn linear_network() -> RoadNetwork {
        let mut network = RoadNetwork::empty();
        let edges = vec![
            Edge {
                id: 0,
                from: (0, 0),
                to: (1, 0),
                length_m: 100.0,
                base_weight: 100.0,
                name: Some("a".into()),
                highway: None,
                geometry: vec![Location::new(0.0, 0.0), Location::new(0.0, 0.000001)],
                edge_status: EdgeStatus::open(),
            },
            Edge {
                id: 1,
                from: (1, 0),
                to: (2, 0),
                length_m: 100.0,
                base_weight: 100.0,
                name: Some("b".into()),
                highway: None,
                geometry: vec![Location::new(0.0, 0.000001), Location::new(0.0, 0.000002)],
                edge_status: EdgeStatus::open(),
            },
        ];
        for edge in edges {
            network.adjacency.entry(edge.from).or_default().push(edge.id);
            network.edges.push(edge);
        }
        network
    }

    #[test]
    fn finds_shortest_path_across_two_hops() {
        let network = linear_network();
        let result = dijkstra(&network, (0, 0), (2, 0)).unwrap();
        assert_eq!(result.node_path, vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(result.distance_m, 200.0);
        assert_eq!(result.edges, vec![0, 1]);
    }

    #[test]
    fn closed_edge_is_never_relaxed_across() {
        let mut network = linear_network();
        network.edges[0].edge_status.multiplier = f64::INFINITY;
        assert!(dijkstra(&network, (0, 0), (2, 0)).is_none());
    }

    #[test]
    fn unreachable_destination_returns_none() {
        let network = linear_network();
        assert!(dijkstra(&network, (0, 0), (99, 99)).is_none());
    }

    #[test]
    fn same_source_and_destination_is_a_zero_length_path() {
        let network = linear_network();
        let result = dijkstra(&network, (0, 0), (0, 0)).unwrap();
        assert_eq!(result.distance_m, 0.0);
        assert!(result.edges.is_empty());
    }
}
