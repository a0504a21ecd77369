//! Image references inside `application/ld+json` blocks
//!
//! JSON-LD has no fixed shape here, so the block is parsed into a loose
//! `serde_json::Value` and probed defensively. A block that fails to parse
//! contributes nothing.

use serde_json::{Map, Value};

/// Image URLs declared by one JSON-LD script body
///
/// Looks at the top-level object's `image` (string, array, or `ImageObject`)
/// and at `image` on every element of `offers`. Top-level arrays and
/// `@graph` containers are searched node by node.
#[must_use]
pub fn image_urls(raw: &str) -> Vec<String> {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Skipping unparseable JSON-LD block: {e}");
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for node in top_level_nodes(&value) {
        collect_node(node, &mut out);
    }
    out
}

fn top_level_nodes(value: &Value) -> Vec<&Map<String, Value>> {
    match value {
        Value::Object(object) => {
            let mut nodes = vec![object];
            if let Some(Value::Array(graph)) = object.get("@graph") {
                nodes.extend(graph.iter().filter_map(Value::as_object));
            }
            nodes
        }
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

fn collect_node(node: &Map<String, Value>, out: &mut Vec<String>) {
    if let Some(image) = node.get("image") {
        collect_image(image, out);
    }

    match node.get("offers") {
        Some(Value::Array(offers)) => {
            for offer in offers.iter().filter_map(Value::as_object) {
                if let Some(image) = offer.get("image") {
                    collect_image(image, out);
                }
            }
        }
        Some(Value::Object(offer)) => {
            if let Some(image) = offer.get("image") {
                collect_image(image, out);
            }
        }
        _ => {}
    }
}

fn collect_image(image: &Value, out: &mut Vec<String>) {
    match image {
        Value::String(url) => out.push(url.clone()),
        Value::Array(items) => {
            for item in items {
                collect_image(item, out);
            }
        }
        Value::Object(object) => {
            if let Some(url) = object
                .get("url")
                .or_else(|| object.get("contentUrl"))
                .and_then(Value::as_str)
            {
                out.push(url.to_string());
            }
        }
        _ => {}
    }
}
