use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub graph: GraphSection,
    pub animation: AnimationSection,
    pub controls: ControlsSection,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphSection {
    pub network_node_count: usize,
    pub cluster_node_count: usize,
    pub cluster_spread: f32,
    pub network_spread: f32,
    pub connection_distance: f32,
    pub grab_distance: f32,
    pub camera_max_distance: f32,
    pub detail_view_distance: f32,
    pub colors: ColorsSection,
    pub node_geometry: NodeGeometry,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ColorsSection {
    pub background: String,
    pub network_node: String,
    pub network_line: String,
    pub grab_line: String,
    pub click_active: String,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Circle,
    Polygon,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct NodeGeometry {
    pub shape: NodeShape,
    pub polygon_sides: u32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct AnimationSection {
    pub highlight: HighlightAnimation,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct HighlightAnimation {
    pub scale_hover: f32,
    pub scale_selected: f32,
    pub transition_duration: f32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ControlsSection {
    #[serde(rename = "enablePan")]
    pub enable_pan: bool,
    #[serde(rename = "enableZoom")]
    pub enable_zoom: bool,
    #[serde(rename = "enableRotate")]
    pub enable_rotate: bool,
    #[serde(rename = "minPolarAngle")]
    pub min_polar_angle: f32,
    #[serde(rename = "maxPolarAngle")]
    pub max_polar_angle: f32,
    #[serde(rename = "minAzimuthAngle", deserialize_with = "min_azimuth")]
    pub min_azimuth_angle: f32,
    #[serde(rename = "maxAzimuthAngle", deserialize_with = "max_azimuth")]
    pub max_azimuth_angle: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph: GraphSection::default(),
            animation: AnimationSection::default(),
            controls: ControlsSection::default(),
        }
    }
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            network_node_count: 2000,
            cluster_node_count: 12,
            cluster_spread: 40.0,
            network_spread: 800.0,
            connection_distance: 80.0,
            grab_distance: 30.0,
            camera_max_distance: 1200.0,
            detail_view_distance: 40.0,
            colors: ColorsSection::default(),
            node_geometry: NodeGeometry::default(),
        }
    }
}

impl Default for ColorsSection {
    fn default() -> Self {
        Self {
            background: "#0B0E17".to_owned(),
            network_node: "#BDC3C7".to_owned(),
            network_line: "#BDC3C7".to_owned(),
            grab_line: "#00DCE4".to_owned(),
            click_active: "#00DCE4".to_owned(),
        }
    }
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            shape: NodeShape::Circle,
            polygon_sides: 6,
        }
    }
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            highlight: HighlightAnimation::default(),
        }
    }
}

impl Default for HighlightAnimation {
    fn default() -> Self {
        Self {
            scale_hover: 1.4,
            scale_selected: 1.6,
            transition_duration: 0.2,
        }
    }
}

impl Default for ControlsSection {
    fn default() -> Self {
        Self {
            enable_pan: false,
            enable_zoom: true,
            enable_rotate: true,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI,
            min_azimuth_angle: f32::NEG_INFINITY,
            max_azimuth_angle: f32::INFINITY,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AngleOrSentinel {
    Number(f32),
    Sentinel(String),
}

fn azimuth_bound<'de, D>(deserializer: D, sentinel_sign: f32) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    match AngleOrSentinel::deserialize(deserializer)? {
        AngleOrSentinel::Number(value) => Ok(value),
        AngleOrSentinel::Sentinel(text) => match text.trim() {
            "Infinity" => Ok(sentinel_sign * f32::INFINITY),
            "-Infinity" => Ok(f32::NEG_INFINITY),
            other => Err(serde::de::Error::custom(format!(
                "expected a number, \"Infinity\" or \"-Infinity\", got {other:?}"
            ))),
        },
    }
}

fn min_azimuth<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    azimuth_bound(deserializer, -1.0)
}

fn max_azimuth<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    azimuth_bound(deserializer, 1.0)
}

pub fn load_config(path: Option<&Path>) -> Result<GraphConfig> {
    let Some(path) = path else {
        return Ok(GraphConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
