use anyhow::{Result, bail};
use glam::Vec3;
use rand::Rng;

use crate::config::GraphConfig;

use super::model::{CLUSTERS, ClusterId, GraphData, LinkData, LinkEnd, NodeData};

const CONSTELLATION_SOURCE_PROBABILITY: f64 = 0.3;
const CONSTELLATION_MAX_NEIGHBORS: usize = 2;
const INTER_CLUSTER_BRIDGES: usize = 3;

pub fn generate_or_empty(config: &GraphConfig) -> GraphData {
    match generate_graph(config) {
        Ok(graph) => graph,
        Err(error) => {
            log::warn!("graph generation failed, falling back to empty graph: {error:#}");
            GraphData::empty()
        }
    }
}

pub fn generate_graph(config: &GraphConfig) -> Result<GraphData> {
    if !config.graph.network_spread.is_finite() || config.graph.network_spread < 0.0 {
        bail!(
            "network_spread must be a finite non-negative number, got {}",
            config.graph.network_spread
        );
    }
    if !config.graph.connection_distance.is_finite() || config.graph.connection_distance < 0.0 {
        bail!(
            "connection_distance must be a finite non-negative number, got {}",
            config.graph.connection_distance
        );
    }

    let mut rng = rand::thread_rng();
    let mut nodes = Vec::new();
    let mut links = Vec::new();

    for cluster in &CLUSTERS {
        let count = if cluster.id == ClusterId::Network {
            config.graph.network_node_count
        } else {
            config.graph.cluster_node_count
        };

        for i in 0..count {
            let position = if cluster.id == ClusterId::Network {
                let r = rng.gen_range(0.0f32..1.0).cbrt() * config.graph.network_spread;
                let theta = rng.gen_range(0.0..std::f32::consts::TAU);
                let phi = rng.gen_range(-1.0f32..1.0).acos();
                cluster.center
                    + Vec3::new(
                        r * phi.sin() * theta.cos(),
                        r * phi.sin() * theta.sin(),
                        r * phi.cos(),
                    )
            } else {
                let spread = config.graph.cluster_spread;
                cluster.center
                    + Vec3::new(
                        rng.gen_range(-0.5f32..0.5) * spread,
                        rng.gen_range(-0.5f32..0.5) * spread,
                        rng.gen_range(-0.5f32..0.5) * spread,
                    )
            };

            let size = match cluster.id {
                ClusterId::Network => 2.0,
                ClusterId::Core => 32.0,
                _ => {
                    if rng.gen_bool(0.2) {
                        16.0
                    } else {
                        6.0
                    }
                }
            };

            let label = if cluster.id == ClusterId::Network {
                String::new()
            } else {
                format!("{} Node {}", cluster.label, i + 1)
            };

            nodes.push(NodeData {
                id: format!("{}-{i}", cluster.id.key()),
                label,
                cluster: cluster.id,
                description: format!(
                    "High-performance node processing unit within the {} sector. \
                     Handles distributed consensus and data sharding.",
                    cluster.label
                ),
                tags: vec!["Protocol".into(), "Level 2".into(), "Secure".into()],
                connections: Vec::new(),
                size,
                position: Some(position),
                velocity: None,
            });
        }
    }

    connect_constellation(&nodes, config.graph.connection_distance, &mut rng, &mut links);
    connect_intra_cluster(&mut nodes, &mut rng, &mut links);
    connect_bridges(&nodes, &mut rng, &mut links);

    Ok(GraphData { nodes, links })
}

// Nearest-neighbor search is exact O(n²) over the cloud; fine at a few
// thousand particles, replaceable by a spatial index without changing the
// output distribution.
fn connect_constellation(
    nodes: &[NodeData],
    connection_distance: f32,
    rng: &mut impl Rng,
    links: &mut Vec<LinkData>,
) {
    let network: Vec<&NodeData> = nodes
        .iter()
        .filter(|node| node.cluster == ClusterId::Network)
        .collect();
    let max_dist_sq = connection_distance * connection_distance;

    for (i, source) in network.iter().enumerate() {
        if !rng.gen_bool(CONSTELLATION_SOURCE_PROBABILITY) {
            continue;
        }
        let Some(source_pos) = source.finite_position() else {
            continue;
        };

        let mut closest: Vec<(f32, &str)> = Vec::new();
        for (j, target) in network.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(target_pos) = target.finite_position() else {
                continue;
            };
            let dist_sq = source_pos.distance_squared(target_pos);
            if dist_sq < max_dist_sq {
                closest.push((dist_sq, target.id.as_str()));
            }
        }

        closest.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (_, target_id) in closest.into_iter().take(CONSTELLATION_MAX_NEIGHBORS) {
            links.push(LinkData {
                source: LinkEnd::Id(source.id.clone()),
                target: LinkEnd::Id(target_id.to_owned()),
                value: 0.2,
            });
        }
    }
}

fn connect_intra_cluster(nodes: &mut [NodeData], rng: &mut impl Rng, links: &mut Vec<LinkData>) {
    let main_ids: Vec<(usize, ClusterId)> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.cluster.is_main())
        .map(|(index, node)| (index, node.cluster))
        .collect();

    for &(source_index, cluster) in &main_ids {
        let same_cluster: Vec<usize> = main_ids
            .iter()
            .filter(|&&(index, other)| other == cluster && index != source_index)
            .map(|&(index, _)| index)
            .collect();
        if same_cluster.is_empty() {
            continue;
        }

        let connection_count = 2 + rng.gen_range(0..2);
        for _ in 0..connection_count {
            let target_index = same_cluster[rng.gen_range(0..same_cluster.len())];
            let source_id = nodes[source_index].id.clone();
            let target_id = nodes[target_index].id.clone();

            links.push(LinkData {
                source: LinkEnd::Id(source_id.clone()),
                target: LinkEnd::Id(target_id.clone()),
                value: 1.0,
            });
            nodes[source_index].connections.push(target_id);
            nodes[target_index].connections.push(source_id);
        }
    }
}

fn connect_bridges(nodes: &[NodeData], rng: &mut impl Rng, links: &mut Vec<LinkData>) {
    for source_cluster in &CLUSTERS {
        for target_cluster in &CLUSTERS {
            if source_cluster.id == target_cluster.id {
                continue;
            }

            let source_nodes: Vec<&NodeData> = nodes
                .iter()
                .filter(|node| node.cluster == source_cluster.id)
                .collect();
            let target_nodes: Vec<&NodeData> = nodes
                .iter()
                .filter(|node| node.cluster == target_cluster.id)
                .collect();
            if source_nodes.is_empty() || target_nodes.is_empty() {
                continue;
            }

            for _ in 0..INTER_CLUSTER_BRIDGES {
                let source = source_nodes[rng.gen_range(0..source_nodes.len())];
                let target = target_nodes[rng.gen_range(0..target_nodes.len())];
                links.push(LinkData {
                    source: LinkEnd::Id(source.id.clone()),
                    target: LinkEnd::Id(target.id.clone()),
                    value: 0.5,
                });
            }
        }
    }
}
