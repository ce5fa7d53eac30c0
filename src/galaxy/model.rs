use std::collections::HashMap;

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClusterId {
    Core,
    Finance,
    Social,
    Infrastructure,
    Network,
}

impl ClusterId {
    pub fn key(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Finance => "finance",
            Self::Social => "social",
            Self::Infrastructure => "infra",
            Self::Network => "network",
        }
    }

    pub fn is_main(self) -> bool {
        self != Self::Network
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ClusterSpec {
    pub id: ClusterId,
    pub label: &'static str,
    pub color: &'static str,
    pub center: Vec3,
}

impl ClusterSpec {
    pub fn get(id: ClusterId) -> &'static ClusterSpec {
        CLUSTERS
            .iter()
            .find(|spec| spec.id == id)
            .unwrap_or(&CLUSTERS[0])
    }
}

pub const CLUSTERS: [ClusterSpec; 5] = [
    ClusterSpec {
        id: ClusterId::Core,
        label: "Core Systems",
        color: "#2F80ED",
        center: Vec3::new(0.0, 0.0, 0.0),
    },
    ClusterSpec {
        id: ClusterId::Finance,
        label: "DeFi Galaxy",
        color: "#D0021B",
        center: Vec3::new(150.0, 50.0, -50.0),
    },
    ClusterSpec {
        id: ClusterId::Social,
        label: "Social Mesh",
        color: "#00A1E4",
        center: Vec3::new(-120.0, 80.0, 50.0),
    },
    ClusterSpec {
        id: ClusterId::Infrastructure,
        label: "Infra Cloud",
        color: "#9013FE",
        center: Vec3::new(50.0, -100.0, 100.0),
    },
    ClusterSpec {
        id: ClusterId::Network,
        label: "Global Network",
        color: "#95A5A6",
        center: Vec3::new(0.0, 0.0, 0.0),
    },
];

pub const MAIN_CLUSTERS: [ClusterId; 4] = [
    ClusterId::Core,
    ClusterId::Finance,
    ClusterId::Social,
    ClusterId::Infrastructure,
];

#[derive(Clone, Debug)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub cluster: ClusterId,
    pub description: String,
    pub tags: Vec<String>,
    pub connections: Vec<String>,
    pub size: f32,
    pub position: Option<Vec3>,
    pub velocity: Option<Vec3>,
}

impl NodeData {
    pub fn finite_position(&self) -> Option<Vec3> {
        self.position.filter(|p| p.is_finite())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LinkEnd {
    Id(String),
    Resolved(usize),
}

impl LinkEnd {
    pub fn resolve(&self, index_by_id: &HashMap<String, usize>) -> Option<usize> {
        match self {
            Self::Id(id) => index_by_id.get(id).copied(),
            Self::Resolved(index) => Some(*index),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LinkData {
    pub source: LinkEnd,
    pub target: LinkEnd,
    pub value: f32,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
    pub nodes: Vec<NodeData>,
    pub links: Vec<LinkData>,
}

impl GraphData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn index_by_id(&self) -> HashMap<String, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect()
    }

    pub fn main_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.cluster.is_main())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn network_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.cluster == ClusterId::Network)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn split_links(&self) -> (Vec<&LinkData>, Vec<&LinkData>) {
        let index_by_id = self.index_by_id();
        let mut static_links = Vec::new();
        let mut dynamic_links = Vec::new();

        for link in &self.links {
            let source_cluster = link
                .source
                .resolve(&index_by_id)
                .and_then(|index| self.nodes.get(index))
                .map(|node| node.cluster);
            let target_cluster = link
                .target
                .resolve(&index_by_id)
                .and_then(|index| self.nodes.get(index))
                .map(|node| node.cluster);

            match (source_cluster, target_cluster) {
                (Some(ClusterId::Network), Some(ClusterId::Network)) => static_links.push(link),
                _ => dynamic_links.push(link),
            }
        }

        (static_links, dynamic_links)
    }
}
