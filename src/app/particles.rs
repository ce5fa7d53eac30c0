use glam::Vec3;
use rand::Rng;

use crate::galaxy::GraphData;

const DRIFT_RANGE: f32 = 0.25;
const BOUNDARY_RADIUS: f32 = 4000.0;
const BOUNDARY_PULL: f32 = -0.000_01;
const VELOCITY_DAMPING: f32 = 0.99;
const COLOR_LERP_RATE: f32 = 0.1;

pub(in crate::app) struct ParticleField {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    link_pairs: Vec<(usize, usize)>,
    color_lerp: f32,
}

impl ParticleField {
    pub fn from_graph(graph: &GraphData) -> Self {
        let network_indices = graph.network_indices();
        let mut rng = rand::thread_rng();

        let mut particle_by_node = vec![usize::MAX; graph.nodes.len()];
        let mut positions = Vec::with_capacity(network_indices.len());
        let mut velocities = Vec::with_capacity(network_indices.len());
        for (particle, &node_index) in network_indices.iter().enumerate() {
            particle_by_node[node_index] = particle;
            positions.push(graph.nodes[node_index].finite_position().unwrap_or(Vec3::ZERO));
            velocities.push(Vec3::new(
                rng.gen_range(-DRIFT_RANGE..DRIFT_RANGE),
                rng.gen_range(-DRIFT_RANGE..DRIFT_RANGE),
                rng.gen_range(-DRIFT_RANGE..DRIFT_RANGE),
            ));
        }

        let index_by_id = graph.index_by_id();
        let (static_links, _) = graph.split_links();
        let mut link_pairs = Vec::with_capacity(static_links.len());
        for link in static_links {
            let source = link
                .source
                .resolve(&index_by_id)
                .map(|node| particle_by_node[node])
                .filter(|&p| p != usize::MAX);
            let target = link
                .target
                .resolve(&index_by_id)
                .map(|node| particle_by_node[node])
                .filter(|&p| p != usize::MAX);
            if let (Some(source), Some(target)) = (source, target) {
                link_pairs.push((source, target));
            }
        }

        Self {
            positions,
            velocities,
            link_pairs,
            color_lerp: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn link_pairs(&self) -> &[(usize, usize)] {
        &self.link_pairs
    }

    pub fn advance(&mut self) {
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *position += *velocity;
            *velocity += soft_boundary_pull(*position);
            *velocity *= VELOCITY_DAMPING;
        }
    }

    pub fn collect_grab_segments(
        &self,
        interaction_point: Vec3,
        grab_distance: f32,
        out: &mut Vec<[Vec3; 2]>,
    ) {
        out.clear();
        let grab_dist_sq = grab_distance * grab_distance;
        for &position in &self.positions {
            if position.distance_squared(interaction_point) < grab_dist_sq {
                out.push([position, interaction_point]);
            }
        }
    }

    pub fn collect_static_segments(&self, out: &mut Vec<[Vec3; 2]>) {
        out.clear();
        for &(source, target) in &self.link_pairs {
            if let (Some(&a), Some(&b)) = (self.positions.get(source), self.positions.get(target)) {
                out.push([a, b]);
            }
        }
    }

    pub fn update_color_lerp(&mut self, pointer_down: bool) -> f32 {
        let target = if pointer_down { 1.0 } else { 0.0 };
        self.color_lerp += (target - self.color_lerp) * COLOR_LERP_RATE;
        self.color_lerp
    }
}

fn soft_boundary_pull(position: Vec3) -> Vec3 {
    if position.length_squared() > BOUNDARY_RADIUS * BOUNDARY_RADIUS {
        position * BOUNDARY_PULL
    } else {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::{ClusterId, GraphData, LinkData, LinkEnd, NodeData};

    fn network_node(id: &str, position: Vec3) -> NodeData {
        NodeData {
            id: id.to_owned(),
            label: String::new(),
            cluster: ClusterId::Network,
            description: String::new(),
            tags: Vec::new(),
            connections: Vec::new(),
            size: 2.0,
            position: Some(position),
            velocity: None,
        }
    }

    fn constellation_graph() -> GraphData {
        GraphData {
            nodes: vec![
                network_node("network-0", Vec3::new(0.0, 0.0, 0.0)),
                network_node("network-1", Vec3::new(10.0, 0.0, 0.0)),
                network_node("network-2", Vec3::new(0.0, 10.0, 0.0)),
            ],
            links: vec![
                LinkData {
                    source: LinkEnd::Id("network-0".to_owned()),
                    target: LinkEnd::Id("network-1".to_owned()),
                    value: 0.2,
                },
                LinkData {
                    source: LinkEnd::Id("network-1".to_owned()),
                    target: LinkEnd::Id("network-2".to_owned()),
                    value: 0.2,
                },
            ],
        }
    }

    #[test]
    fn boundary_pull_is_zero_at_the_boundary() {
        let at_boundary = soft_boundary_pull(Vec3::new(BOUNDARY_RADIUS, 0.0, 0.0));
        assert_eq!(at_boundary, Vec3::ZERO);

        let outside = soft_boundary_pull(Vec3::new(8000.0, 0.0, 0.0));
        assert!(outside.x < 0.0, "pull must point back toward origin");
        assert!(outside.length() > at_boundary.length());
    }

    #[test]
    fn farther_particles_receive_larger_corrections() {
        let near = soft_boundary_pull(Vec3::new(4001.0, 0.0, 0.0)).length();
        let far = soft_boundary_pull(Vec3::new(8000.0, 0.0, 0.0)).length();
        assert!(far > near);
    }

    #[test]
    fn static_topology_is_idempotent_across_frames() {
        let mut field = ParticleField::from_graph(&constellation_graph());
        let pairs_before = field.link_pairs().to_vec();

        let mut segments = Vec::new();
        for _ in 0..100 {
            field.advance();
            field.collect_static_segments(&mut segments);
        }

        assert_eq!(field.link_pairs(), pairs_before.as_slice());
        assert_eq!(segments.len(), pairs_before.len());
    }

    #[test]
    fn velocities_stay_in_drift_range_and_damp() {
        let mut field = ParticleField::from_graph(&constellation_graph());
        for velocity in &field.velocities {
            assert!(velocity.x.abs() <= DRIFT_RANGE);
            assert!(velocity.y.abs() <= DRIFT_RANGE);
            assert!(velocity.z.abs() <= DRIFT_RANGE);
        }

        let speed_before: f32 = field.velocities.iter().map(|v| v.length()).sum();
        field.advance();
        let speed_after: f32 = field.velocities.iter().map(|v| v.length()).sum();
        assert!(speed_after <= speed_before);
    }

    #[test]
    fn grab_segments_respect_the_distance_threshold() {
        let graph = GraphData {
            nodes: vec![network_node("network-0", Vec3::new(10.0, 0.0, 0.0))],
            links: Vec::new(),
        };
        let field = ParticleField::from_graph(&graph);
        let mut segments = Vec::new();

        // Interaction point 10 units away with a 30 unit threshold: one line.
        field.collect_grab_segments(Vec3::ZERO, 30.0, &mut segments);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0][0], Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(segments[0][1], Vec3::ZERO);

        // Same threshold, point 50 units away: none.
        field.collect_grab_segments(Vec3::new(-40.0, 0.0, 0.0), 30.0, &mut segments);
        assert!(segments.is_empty());
    }

    #[test]
    fn color_lerp_converges_monotonically_in_each_phase() {
        let graph = GraphData::empty();
        let mut field = ParticleField::from_graph(&graph);

        let mut previous = 0.0;
        for _ in 0..80 {
            let value = field.update_color_lerp(true);
            assert!(value >= previous);
            previous = value;
        }
        assert!(previous > 0.999, "held button converges toward 1, got {previous}");

        for _ in 0..80 {
            let value = field.update_color_lerp(false);
            assert!(value <= previous);
            previous = value;
        }
        assert!(previous < 0.001, "released button converges toward 0, got {previous}");
    }

    #[test]
    fn empty_graph_produces_empty_buffers() {
        let mut field = ParticleField::from_graph(&GraphData::empty());
        field.advance();

        let mut segments = Vec::new();
        field.collect_static_segments(&mut segments);
        assert!(segments.is_empty());
        field.collect_grab_segments(Vec3::ZERO, 30.0, &mut segments);
        assert!(segments.is_empty());
        assert_eq!(field.len(), 0);
    }
}
