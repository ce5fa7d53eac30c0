use std::collections::{HashMap, VecDeque};

use eframe::egui::{self, Color32, Context, Pos2};
use glam::Vec3;

use crate::config::GraphConfig;
use crate::galaxy::{ClusterId, GraphData, generate_or_empty};
use crate::util::parse_hex_color;

mod camera;
mod graph;
mod particles;
mod physics;
mod render_utils;
mod ui;

use camera::OrbitCamera;
use particles::ParticleField;
use physics::ForceSimulation;

pub struct GalaxyApp {
    model: ViewModel,
}

impl GalaxyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: GraphConfig) -> Self {
        let graph = generate_or_empty(&config);
        log::info!(
            "generated galaxy: {} nodes, {} links",
            graph.nodes.len(),
            graph.links.len()
        );

        Self {
            model: ViewModel::new(config, graph),
        }
    }
}

impl eframe::App for GalaxyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.model.update_fps_counter(ctx);
        self.model.show_overlay(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.model.draw_scene(ui);
            });

        ctx.request_repaint();
    }
}

struct Palette {
    background: Color32,
    network_node: Color32,
    network_line: Color32,
    grab_line: Color32,
    click_active: Color32,
    dynamic_link: Color32,
    cluster: HashMap<ClusterId, Color32>,
}

impl Palette {
    fn from_config(config: &GraphConfig) -> Self {
        let cluster = crate::galaxy::CLUSTERS
            .iter()
            .map(|spec| (spec.id, parse_hex_color(spec.color)))
            .collect();

        Self {
            background: parse_hex_color(&config.graph.colors.background),
            network_node: parse_hex_color(&config.graph.colors.network_node),
            network_line: parse_hex_color(&config.graph.colors.network_line),
            grab_line: parse_hex_color(&config.graph.colors.grab_line),
            click_active: parse_hex_color(&config.graph.colors.click_active),
            dynamic_link: Color32::from_rgba_unmultiplied(102, 102, 102, 153),
            cluster,
        }
    }

    fn cluster_color(&self, cluster: ClusterId) -> Color32 {
        self.cluster
            .get(&cluster)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

struct ScreenNode {
    position: Pos2,
    radius: f32,
    depth: f32,
}

#[derive(Default)]
struct FrameScratch {
    grab_segments: Vec<[Vec3; 2]>,
    static_segments: Vec<[Vec3; 2]>,
    dynamic_segments: Vec<[Vec3; 2]>,
    main_screen: Vec<Option<ScreenNode>>,
    draw_order: Vec<usize>,
}

struct ViewModel {
    config: GraphConfig,
    graph: GraphData,
    simulation: ForceSimulation,
    particles: ParticleField,
    camera: OrbitCamera,
    palette: Palette,

    main_indices: Vec<usize>,
    index_by_id: HashMap<String, usize>,
    dynamic_link_indices: Vec<usize>,

    selected: Option<String>,
    hovered: Option<String>,

    scratch: FrameScratch,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl ViewModel {
    fn new(config: GraphConfig, graph: GraphData) -> Self {
        let simulation = ForceSimulation::new(&graph);
        let particles = ParticleField::from_graph(&graph);
        let camera = OrbitCamera::new(&config);
        let palette = Palette::from_config(&config);
        let main_indices = graph.main_indices();
        let index_by_id = graph.index_by_id();

        let is_network = |end: &crate::galaxy::LinkEnd| {
            end.resolve(&index_by_id)
                .is_some_and(|i| graph.nodes[i].cluster == ClusterId::Network)
        };
        let dynamic_link_indices = graph
            .links
            .iter()
            .enumerate()
            .filter(|(_, link)| !(is_network(&link.source) && is_network(&link.target)))
            .map(|(index, _)| index)
            .collect();

        Self {
            config,
            graph,
            simulation,
            particles,
            camera,
            palette,
            main_indices,
            index_by_id,
            dynamic_link_indices,
            selected: None,
            hovered: None,
            scratch: FrameScratch::default(),
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    fn regenerate(&mut self) {
        self.simulation.stop();

        let graph = generate_or_empty(&self.config);
        log::info!(
            "regenerated galaxy: {} nodes, {} links",
            graph.nodes.len(),
            graph.links.len()
        );

        let mut next = ViewModel::new(self.config.clone(), graph);
        next.fps_samples = std::mem::take(&mut self.fps_samples);
        next.fps_current = self.fps_current;
        *self = next;
    }

    fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        if let Some(id) = &selected
            && let Some(&index) = self.index_by_id.get(id)
            && let Some(position) = self.graph.nodes[index].finite_position()
        {
            self.camera.focus(position);
        }

        log::debug!("selection changed: {selected:?}");
        self.selected = selected;
    }

    fn fly_to(&mut self, position: Vec3) {
        self.camera.fly_to(position, camera::DEFAULT_FLIGHT_SECONDS);
    }

    fn look_at(&mut self, target: Vec3) {
        self.camera.look_at(target, camera::DEFAULT_FLIGHT_SECONDS);
    }

    fn is_dimmed(&self, node_id: &str) -> bool {
        let Some(hovered_id) = &self.hovered else {
            return false;
        };
        if hovered_id == node_id {
            return false;
        }

        self.index_by_id
            .get(node_id)
            .map(|&index| &self.graph.nodes[index])
            .is_some_and(|node| !node.connections.iter().any(|c| c == hovered_id))
    }
}
