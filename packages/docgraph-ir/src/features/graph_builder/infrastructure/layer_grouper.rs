//! Layer grouper
//!
//! Groups nodes and edges by (annotation type, set). Layers are created on
//! first reference and listed in that order; membership is recorded once per
//! layer and written back onto nodes and edges at finalization.

use ahash::{AHashMap, AHashSet};

use crate::features::graph_builder::domain::{GraphEdge, GraphLayer, GraphNode, LayerHandle};

#[derive(Debug)]
pub struct LayerGrouper {
    prefix: String,
    layers: Vec<GraphLayer>,
    handles: AHashMap<(String, Option<String>), LayerHandle>,
    node_members: AHashSet<(LayerHandle, usize)>,
    edge_members: AHashSet<(LayerHandle, usize)>,
}

impl LayerGrouper {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            layers: Vec::new(),
            handles: AHashMap::new(),
            node_members: AHashSet::new(),
            edge_members: AHashSet::new(),
        }
    }

    /// Namespace of a layer: `<prefix>::<type>[::<set>]`
    pub fn namespace(&self, annotation_type: &str, set: Option<&str>) -> String {
        match set {
            Some(set) => format!("{}::{}::{}", self.prefix, annotation_type, set),
            None => format!("{}::{}", self.prefix, annotation_type),
        }
    }

    /// Idempotent: the same key always yields the same handle
    pub fn ensure_layer(&mut self, annotation_type: &str, set: Option<&str>) -> LayerHandle {
        let key = (annotation_type.to_string(), set.map(str::to_string));
        if let Some(handle) = self.handles.get(&key) {
            return *handle;
        }

        let handle = LayerHandle(self.layers.len());
        self.layers.push(GraphLayer {
            annotation_type: annotation_type.to_string(),
            set: set.map(str::to_string),
            namespace: self.namespace(annotation_type, set),
            nodes: Vec::new(),
            edges: Vec::new(),
        });
        self.handles.insert(key, handle);
        handle
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&GraphLayer> {
        self.layers.get(handle.0)
    }

    pub fn add_node(&mut self, handle: LayerHandle, seq: usize) {
        if !self.node_members.insert((handle, seq)) {
            return;
        }
        if let Some(layer) = self.layers.get_mut(handle.0) {
            layer.nodes.push(seq);
        }
    }

    pub fn add_edge(&mut self, handle: LayerHandle, seq: usize) {
        if !self.edge_members.insert((handle, seq)) {
            return;
        }
        if let Some(layer) = self.layers.get_mut(handle.0) {
            layer.edges.push(seq);
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Annotate every node and edge with the layers referencing it
    pub fn finalize(self, nodes: &mut [GraphNode], edges: &mut [GraphEdge]) -> Vec<GraphLayer> {
        for (index, layer) in self.layers.iter().enumerate() {
            for &seq in &layer.nodes {
                if let Some(node) = nodes.get_mut(seq) {
                    node.layers.push(index);
                }
            }
            for &seq in &layer.edges {
                if let Some(edge) = edges.get_mut(seq) {
                    edge.layers.push(index);
                }
            }
        }
        self.layers
    }
}
