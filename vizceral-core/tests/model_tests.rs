// Tests for Vizceral JSON serialization

use serde_json::{Value, json};
use vizceral_core::{
    DisplayClass, RawEdge, Renderer, VizConnection, VizMetrics, VizNode, ingest, translate_at,
};

// ============================================================================
// Enum Tests
// ============================================================================

#[test]
fn test_renderer_as_str() {
    assert_eq!(Renderer::Global.as_str(), "global");
    assert_eq!(Renderer::Region.as_str(), "region");
    assert_eq!(Renderer::FocusedChild.as_str(), "focusedChild");
}

#[test]
fn test_renderer_serializes_like_as_str() {
    for renderer in [Renderer::Global, Renderer::Region, Renderer::FocusedChild] {
        assert_eq!(serde_json::to_value(renderer).unwrap(), json!(renderer.as_str()));
    }
}

#[test]
fn test_display_class_serializes_like_as_str() {
    for class in [DisplayClass::Normal, DisplayClass::Warning, DisplayClass::Danger] {
        assert_eq!(serde_json::to_value(class).unwrap(), json!(class.as_str()));
    }
}

// ============================================================================
// Field Name Tests
// ============================================================================

#[test]
fn test_viz_node_field_names() {
    let node = VizNode::new("checkout", Renderer::FocusedChild)
        .with_class(DisplayClass::Normal)
        .with_updated(42);
    let value = serde_json::to_value(&node).unwrap();

    assert_eq!(
        value,
        json!({
            "name": "checkout",
            "renderer": "focusedChild",
            "maxVolume": 0,
            "updated": 42,
            "class": "normal",
            "nodes": [],
            "connections": []
        })
    );
}

#[test]
fn test_viz_node_without_class_omits_field() {
    let node = VizNode::new("api", Renderer::Region);
    let value = serde_json::to_value(&node).unwrap();
    assert!(value.get("class").is_none());
    assert!(value.get("displayClass").is_none());
}

#[test]
fn test_viz_connection_field_names() {
    let conn = VizConnection::new("a", "b", VizMetrics { normal: 5, danger: 1 })
        .with_class(DisplayClass::Normal);
    let value = serde_json::to_value(&conn).unwrap();

    assert_eq!(
        value,
        json!({
            "source": "a",
            "target": "b",
            "class": "normal",
            "metrics": {"normal": 5, "danger": 1}
        })
    );
}

#[test]
fn test_raw_edge_uses_zipkin_names() {
    let value = serde_json::to_value(RawEdge::new("a", "b", 3)).unwrap();
    assert_eq!(value, json!({"parent": "a", "child": "b", "callCount": 3}));
}

// ============================================================================
// Full Document Tests
// ============================================================================

#[test]
fn test_api_region_document() {
    let edges = ingest(vec![RawEdge::new("A", "A", 10), RawEdge::new("A", "B", 5)]).unwrap();
    let api = translate_at(&edges, 7).unwrap().into_api();
    let value: Value = serde_json::to_value(&api).unwrap();

    assert_eq!(value["name"], "api");
    assert_eq!(value["renderer"], "region");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(value["nodes"][0]["name"], "A");
    assert_eq!(value["nodes"][1]["name"], "B");
    assert_eq!(value["connections"][0]["source"], "A");
    assert_eq!(value["connections"][0]["target"], "B");
    assert_eq!(value["connections"][0]["metrics"]["normal"], 5);
}

#[test]
fn test_viz_node_deserializes_frontend_document() {
    let doc = r#"{
        "name": "edge",
        "renderer": "global",
        "nodes": [{"name": "INTERNET", "renderer": "region"}],
        "connections": [{"source": "INTERNET", "target": "api", "metrics": {"normal": 3, "danger": 0}}]
    }"#;

    let node: VizNode = serde_json::from_str(doc).unwrap();
    assert_eq!(node.renderer, Renderer::Global);
    assert_eq!(node.max_volume, 0);
    assert_eq!(node.nodes[0].name, "INTERNET");
    assert_eq!(node.connections[0].metrics.normal, 3);
    assert_eq!(node.connections[0].display_class, None);
}
