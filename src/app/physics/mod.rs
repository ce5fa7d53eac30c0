mod forces;

use glam::Vec3;

use crate::galaxy::{ClusterSpec, GraphData};

use forces::{Centering, ClusterGravity, Force, LinkSprings, ManyBody};

const MANY_BODY_STRENGTH: f32 = -250.0;
const MANY_BODY_DISTANCE_MAX: f32 = 300.0;
const LINK_DISTANCE: f32 = 40.0;
const LINK_STRENGTH: f32 = 0.5;
const CLUSTER_GRAVITY_STRENGTH: f32 = 0.15;
const CENTERING_STRENGTH: f32 = 0.01;
const VELOCITY_DECAY: f32 = 0.4;
const ALPHA_MIN: f32 = 0.001;

const TICK_INTERVAL: f32 = 1.0 / 60.0;
const MAX_TICKS_PER_ADVANCE: usize = 4;

pub(in crate::app) struct SimBody {
    pub node_index: usize,
    pub position: Vec3,
    pub velocity: Vec3,
    pub gravity_center: Vec3,
}

pub(in crate::app) struct SimEdge {
    pub source: usize,
    pub target: usize,
}

pub(in crate::app) struct ForceSimulation {
    bodies: Vec<SimBody>,
    edges: Vec<SimEdge>,
    forces: Vec<Box<dyn Force>>,
    alpha: f32,
    alpha_decay: f32,
    running: bool,
    accumulator: f32,
}

impl ForceSimulation {
    pub fn new(graph: &GraphData) -> Self {
        let index_by_id = graph.index_by_id();
        let main_indices = graph.main_indices();

        let mut body_by_node = vec![usize::MAX; graph.nodes.len()];
        let mut bodies = Vec::with_capacity(main_indices.len());
        for (body_index, &node_index) in main_indices.iter().enumerate() {
            let node = &graph.nodes[node_index];
            let center = ClusterSpec::get(node.cluster).center;
            let position = node
                .finite_position()
                .unwrap_or_else(|| seed_position(center, body_index, main_indices.len()));

            body_by_node[node_index] = body_index;
            bodies.push(SimBody {
                node_index,
                position,
                velocity: node.velocity.filter(|v| v.is_finite()).unwrap_or(Vec3::ZERO),
                gravity_center: center,
            });
        }

        let (_, dynamic_links) = graph.split_links();
        let mut edges = Vec::new();
        for link in dynamic_links {
            let source = link
                .source
                .resolve(&index_by_id)
                .map(|node| body_by_node[node])
                .filter(|&body| body != usize::MAX);
            let target = link
                .target
                .resolve(&index_by_id)
                .map(|node| body_by_node[node])
                .filter(|&body| body != usize::MAX);
            if let (Some(source), Some(target)) = (source, target) {
                edges.push(SimEdge { source, target });
            }
        }

        let forces: Vec<Box<dyn Force>> = vec![
            Box::new(ManyBody {
                strength: MANY_BODY_STRENGTH,
                distance_max: MANY_BODY_DISTANCE_MAX,
            }),
            Box::new(LinkSprings {
                distance: LINK_DISTANCE,
                strength: LINK_STRENGTH,
            }),
            Box::new(ClusterGravity {
                strength: CLUSTER_GRAVITY_STRENGTH,
            }),
            Box::new(Centering {
                strength: CENTERING_STRENGTH,
            }),
        ];

        log::debug!(
            "force solver: {} bodies, {} springs, forces [{}]",
            bodies.len(),
            edges.len(),
            forces
                .iter()
                .map(|force| force.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            bodies,
            edges,
            forces,
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            running: true,
            accumulator: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn advance(&mut self, graph: &mut GraphData, delta_seconds: f32) {
        if !self.running || self.bodies.is_empty() {
            return;
        }

        self.accumulator += delta_seconds.clamp(0.0, 0.25);
        let mut ticked = false;
        let mut ticks = 0;
        while self.accumulator >= TICK_INTERVAL && ticks < MAX_TICKS_PER_ADVANCE {
            self.accumulator -= TICK_INTERVAL;
            self.tick();
            ticked = true;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_ADVANCE {
            self.accumulator = 0.0;
        }

        if ticked {
            self.publish(graph);
        }
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        self.alpha += (0.0 - self.alpha) * self.alpha_decay;
        if self.alpha < ALPHA_MIN {
            self.running = false;
            return;
        }

        for force in &self.forces {
            force.apply(&mut self.bodies, &self.edges, self.alpha);
        }

        let damping = 1.0 - VELOCITY_DECAY;
        for body in &mut self.bodies {
            body.velocity *= damping;
            body.position += body.velocity;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn publish(&self, graph: &mut GraphData) {
        for body in &self.bodies {
            if let Some(node) = graph.nodes.get_mut(body.node_index) {
                node.position = Some(body.position);
                node.velocity = Some(body.velocity);
            }
        }
    }
}

fn seed_position(center: Vec3, index: usize, total: usize) -> Vec3 {
    let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let i = index as f32;
    let n = (total as f32).max(1.0);

    let theta = std::f32::consts::TAU * i / golden_ratio;
    let phi = (1.0 - 2.0 * (i + 0.5) / n).acos();
    let radius = 30.0;

    center
        + Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::{ClusterId, LinkData, LinkEnd, NodeData};

    fn main_node(id: &str, cluster: ClusterId, position: Option<Vec3>) -> NodeData {
        NodeData {
            id: id.to_owned(),
            label: id.to_owned(),
            cluster,
            description: String::new(),
            tags: Vec::new(),
            connections: Vec::new(),
            size: 6.0,
            position,
            velocity: None,
        }
    }

    fn two_cluster_graph() -> GraphData {
        GraphData {
            nodes: vec![
                main_node("core-0", ClusterId::Core, Some(Vec3::new(400.0, 0.0, 0.0))),
                main_node(
                    "finance-0",
                    ClusterId::Finance,
                    Some(Vec3::new(-400.0, 0.0, 0.0)),
                ),
            ],
            links: vec![LinkData {
                source: LinkEnd::Id("core-0".to_owned()),
                target: LinkEnd::Id("finance-0".to_owned()),
                value: 1.0,
            }],
        }
    }

    #[test]
    fn cluster_gravity_pulls_toward_centers() {
        let mut graph = two_cluster_graph();
        let mut sim = ForceSimulation::new(&graph);

        let core_center = ClusterSpec::get(ClusterId::Core).center;
        let start = graph.nodes[0].position.unwrap().distance(core_center);

        for _ in 0..200 {
            sim.tick();
        }
        sim.publish(&mut graph);

        let end = graph.nodes[0].position.unwrap().distance(core_center);
        assert!(end < start, "expected {end} < {start}");
    }

    #[test]
    fn uninitialized_positions_are_seeded() {
        let mut graph = GraphData {
            nodes: vec![
                main_node("core-0", ClusterId::Core, None),
                main_node("core-1", ClusterId::Core, None),
            ],
            links: Vec::new(),
        };
        let mut sim = ForceSimulation::new(&graph);
        sim.tick();
        sim.publish(&mut graph);

        for node in &graph.nodes {
            assert!(node.finite_position().is_some());
            assert!(node.velocity.is_some());
        }
    }

    #[test]
    fn stop_halts_all_further_mutation() {
        let mut graph = two_cluster_graph();
        let mut sim = ForceSimulation::new(&graph);
        sim.advance(&mut graph, 0.1);
        sim.stop();

        let frozen: Vec<_> = graph.nodes.iter().map(|n| n.position).collect();
        sim.advance(&mut graph, 1.0);
        sim.tick();

        let after: Vec<_> = graph.nodes.iter().map(|n| n.position).collect();
        assert_eq!(frozen, after);
        assert!(!sim.is_running());
    }

    #[test]
    fn solver_cools_until_it_settles() {
        let mut sim = ForceSimulation::new(&two_cluster_graph());
        let initial = sim.alpha();
        sim.tick();
        assert!(sim.alpha() < initial);

        for _ in 0..5000 {
            sim.tick();
        }
        assert!(!sim.is_running());
    }

    #[test]
    fn empty_graph_is_harmless() {
        let mut graph = GraphData::empty();
        let mut sim = ForceSimulation::new(&graph);
        sim.advance(&mut graph, 1.0);
        sim.tick();
        assert!(graph.nodes.is_empty());
    }

    #[test]
    fn network_nodes_are_not_simulated() {
        let mut graph = GraphData {
            nodes: vec![
                main_node("core-0", ClusterId::Core, Some(Vec3::ZERO)),
                main_node(
                    "network-0",
                    ClusterId::Network,
                    Some(Vec3::new(500.0, 0.0, 0.0)),
                ),
            ],
            links: Vec::new(),
        };
        let mut sim = ForceSimulation::new(&graph);
        for _ in 0..50 {
            sim.tick();
        }
        sim.publish(&mut graph);

        assert_eq!(
            graph.nodes[1].position,
            Some(Vec3::new(500.0, 0.0, 0.0)),
            "particle cloud positions belong to the frame loop, not the solver"
        );
        assert!(graph.nodes[1].velocity.is_none());
    }

    #[test]
    fn repulsion_kick_scales_inversely_with_distance() {
        use super::forces::{Force, ManyBody};

        fn body_at(position: Vec3) -> SimBody {
            SimBody {
                node_index: 0,
                position,
                velocity: Vec3::ZERO,
                gravity_center: Vec3::ZERO,
            }
        }

        let force = ManyBody {
            strength: MANY_BODY_STRENGTH,
            distance_max: MANY_BODY_DISTANCE_MAX,
        };
        let mut near = [body_at(Vec3::ZERO), body_at(Vec3::new(100.0, 0.0, 0.0))];
        let mut far = [body_at(Vec3::ZERO), body_at(Vec3::new(200.0, 0.0, 0.0))];
        force.apply(&mut near, &[], 1.0);
        force.apply(&mut far, &[], 1.0);

        // Both kicks repel, and halving the separation doubles the kick.
        assert!(near[0].velocity.x < 0.0);
        assert!(near[1].velocity.x > 0.0);
        let ratio = near[0].velocity.length() / far[0].velocity.length();
        assert!((ratio - 2.0).abs() < 0.01, "kick ratio {ratio}");
    }

    #[test]
    fn work_per_advance_is_bounded() {
        let mut graph = two_cluster_graph();
        let mut sim = ForceSimulation::new(&graph);

        // A huge delta may not run more than the tick cap.
        let alpha_before = sim.alpha();
        sim.advance(&mut graph, 10.0);
        let expected_floor = alpha_before * (1.0 - sim.alpha_decay).powi(MAX_TICKS_PER_ADVANCE as i32);
        assert!(sim.alpha() >= expected_floor * 0.99);
    }
}
