use serde::{Deserialize, Serialize};

/// A dependency link exactly as Zipkin reports it, before validation.
///
/// Every field is optional so that a missing value can be reported as a
/// malformed edge instead of a generic decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_count: Option<i64>,
}

impl RawEdge {
    pub fn new(parent: impl Into<String>, child: impl Into<String>, call_count: i64) -> Self {
        Self {
            parent: Some(parent.into()),
            child: Some(child.into()),
            call_count: Some(call_count),
            error_count: None,
        }
    }

    pub fn with_errors(mut self, error_count: i64) -> Self {
        self.error_count = Some(error_count);
        self
    }
}

/// A validated dependency edge. Identity is the `(parent, child)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub parent: String,
    pub child: String,
    pub call_count: u64,
    pub error_count: u64,
}

impl Edge {
    /// Self-loops are how Zipkin reports traffic entering the system.
    pub fn is_root_call(&self) -> bool {
        self.parent == self.child
    }

    pub fn key(&self) -> (String, String) {
        (self.parent.clone(), self.child.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Renderer {
    Global,
    Region,
    FocusedChild,
}

impl Renderer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Renderer::Global => "global",
            Renderer::Region => "region",
            Renderer::FocusedChild => "focusedChild",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayClass {
    Normal,
    Warning,
    Danger,
}

impl DisplayClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayClass::Normal => "normal",
            DisplayClass::Warning => "warning",
            DisplayClass::Danger => "danger",
        }
    }
}

/// A node in the Vizceral traffic graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VizNode {
    pub name: String,
    pub renderer: Renderer,
    #[serde(default)]
    pub max_volume: u64,
    #[serde(default)]
    pub updated: i64,
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub display_class: Option<DisplayClass>,
    #[serde(default)]
    pub nodes: Vec<VizNode>,
    #[serde(default)]
    pub connections: Vec<VizConnection>,
}

impl VizNode {
    pub fn new(name: impl Into<String>, renderer: Renderer) -> Self {
        Self {
            name: name.into(),
            renderer,
            max_volume: 0,
            updated: 0,
            display_class: None,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: DisplayClass) -> Self {
        self.display_class = Some(class);
        self
    }

    pub fn with_updated(mut self, updated: i64) -> Self {
        self.updated = updated;
        self
    }

    pub fn find_node(&self, name: &str) -> Option<&VizNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn find_connection(&self, source: &str, target: &str) -> Option<&VizConnection> {
        self.connections
            .iter()
            .find(|c| c.source == source && c.target == target)
    }
}

/// A directed traffic connection between two sibling nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VizConnection {
    pub source: String,
    pub target: String,
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub display_class: Option<DisplayClass>,
    #[serde(default)]
    pub metrics: VizMetrics,
}

impl VizConnection {
    pub fn new(source: impl Into<String>, target: impl Into<String>, metrics: VizMetrics) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            display_class: None,
            metrics,
        }
    }

    pub fn with_class(mut self, class: DisplayClass) -> Self {
        self.display_class = Some(class);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VizMetrics {
    pub normal: u64,
    pub danger: u64,
}
