// Zipkin dependency edges -> Vizceral traffic graph

use crate::error::{Result, TranslateError};
use crate::ingest::EdgeSet;
use crate::model::{DisplayClass, Edge, Renderer, VizConnection, VizMetrics, VizNode};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const GLOBAL_NODE: &str = "edge";
pub const INTERNET_REGION: &str = "INTERNET";
pub const API_REGION: &str = "api";

// Position of each region inside the global node.
const INTERNET_SLOT: usize = 0;
const API_SLOT: usize = 1;

/// Aggregated calls from one service to another.
#[derive(Debug, Clone, Copy)]
struct Traffic {
    /// Index of the destination in the node table.
    destination: usize,
    call_count: u64,
    error_count: u64,
}

#[derive(Debug)]
struct TrafficNode {
    name: String,
    /// Outbound traffic keyed by destination name.
    traffic: BTreeMap<String, Traffic>,
}

/// Node table plus name index, built once per translation.
#[derive(Debug, Default)]
struct TrafficGraph {
    nodes: Vec<TrafficNode>,
    by_name: BTreeMap<String, usize>,
    roots: BTreeSet<usize>,
    root_calls: u64,
    root_errors: u64,
}

impl TrafficGraph {
    fn build(edges: &EdgeSet) -> Result<Self> {
        let mut graph = Self::default();
        for edge in edges {
            let parent = graph.node_id(&edge.parent);
            if edge.is_root_call() {
                graph.add_root_call(parent, edge)?;
            } else {
                let child = graph.node_id(&edge.child);
                graph.set_traffic(parent, child, edge);
            }
        }
        Ok(graph)
    }

    fn node_id(&mut self, name: &str) -> usize {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(TrafficNode {
            name: name.to_string(),
            traffic: BTreeMap::new(),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    fn add_root_call(&mut self, id: usize, edge: &Edge) -> Result<()> {
        self.roots.insert(id);
        self.root_calls = self
            .root_calls
            .checked_add(edge.call_count)
            .ok_or_else(|| TranslateError::CountOverflow {
                context: format!("root calls into {}", edge.parent),
            })?;
        self.root_errors = self
            .root_errors
            .checked_add(edge.error_count)
            .ok_or_else(|| TranslateError::CountOverflow {
                context: format!("root errors into {}", edge.parent),
            })?;
        Ok(())
    }

    fn set_traffic(&mut self, from: usize, to: usize, edge: &Edge) {
        let destination = self.nodes[to].name.clone();
        self.nodes[from].traffic.insert(
            destination,
            Traffic {
                destination: to,
                call_count: edge.call_count,
                error_count: edge.error_count,
            },
        );
    }

    /// Fill the api region with one node per service and a flat connection list.
    fn populate_region(&self, region: &mut VizNode, updated: i64) {
        for &id in self.by_name.values() {
            let node = &self.nodes[id];
            region.nodes.push(
                VizNode::new(node.name.clone(), Renderer::FocusedChild)
                    .with_class(DisplayClass::Normal)
                    .with_updated(updated),
            );
            for traffic in node.traffic.values() {
                let metrics = VizMetrics {
                    normal: traffic.call_count,
                    danger: traffic.error_count,
                };
                region.connections.push(
                    VizConnection::new(
                        node.name.clone(),
                        self.nodes[traffic.destination].name.clone(),
                        metrics,
                    )
                    .with_class(DisplayClass::Normal),
                );
            }
        }
    }
}

/// The translated graph: a global node holding the `INTERNET` and `api` regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VizceralGraph {
    global: VizNode,
}

impl VizceralGraph {
    pub fn global(&self) -> &VizNode {
        &self.global
    }

    pub fn internet(&self) -> &VizNode {
        &self.global.nodes[INTERNET_SLOT]
    }

    pub fn api(&self) -> &VizNode {
        &self.global.nodes[API_SLOT]
    }

    pub fn internet_connection(&self) -> &VizConnection {
        &self.global.connections[0]
    }

    pub fn into_api(mut self) -> VizNode {
        self.global.nodes.swap_remove(API_SLOT)
    }

    pub fn into_global(self) -> VizNode {
        self.global
    }
}

/// Translate edges, stamping every node with the current time.
pub fn translate(edges: &EdgeSet) -> Result<VizceralGraph> {
    translate_at(edges, Utc::now().timestamp_millis())
}

/// Translate edges with an explicit `updated` timestamp (epoch millis).
pub fn translate_at(edges: &EdgeSet, updated: i64) -> Result<VizceralGraph> {
    let graph = TrafficGraph::build(edges)?;

    let internet = VizNode::new(INTERNET_REGION, Renderer::Region).with_updated(updated);
    let mut api = VizNode::new(API_REGION, Renderer::Region).with_updated(updated);
    graph.populate_region(&mut api, updated);

    let entry = VizConnection::new(
        INTERNET_REGION,
        API_REGION,
        VizMetrics {
            normal: graph.root_calls,
            danger: graph.root_errors,
        },
    );

    let mut global = VizNode::new(GLOBAL_NODE, Renderer::Global).with_updated(updated);
    global.nodes = vec![internet, api];
    global.connections.push(entry);

    debug!(
        "Translated {} edges into {} services ({} entry points, {} root calls)",
        edges.len(),
        graph.nodes.len(),
        graph.roots.len(),
        graph.root_calls
    );

    Ok(VizceralGraph { global })
}
