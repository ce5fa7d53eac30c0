mod generate;
mod model;

pub use generate::generate_or_empty;
pub use model::{
    CLUSTERS, ClusterId, ClusterSpec, GraphData, LinkData, LinkEnd, MAIN_CLUSTERS, NodeData,
};
