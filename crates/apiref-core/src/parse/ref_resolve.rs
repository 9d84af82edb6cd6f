use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::config::DEFAULT_MAX_REF_DEPTH;
use crate::error::Diagnostic;

/// Key of the marker object left where a reference cycle re-enters itself.
pub const CIRCULAR_REF_KEY: &str = "$circularRef";

/// The output of a resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: Value,
    pub diagnostics: Vec<Diagnostic>,
}

/// Replaces every local `$ref` in a raw document with a deep copy of its
/// target. Cycles terminate in a `{"$circularRef": pointer}` marker;
/// unresolvable and external references are left in place.
pub struct RefResolver<'a> {
    root: &'a Value,
    max_depth: usize,
    /// Every local pointer some `$ref` in the document names.
    targets: HashSet<String>,
    /// Every target resolved so far, keyed by pointer.
    resolved: HashMap<String, Resolved>,
    diagnostics: Vec<Diagnostic>,
}

/// A resolved target and the pointers of the cycle markers inside it.
struct Resolved {
    value: Value,
    cycles: HashSet<String>,
}

/// The chain of pointers currently being resolved, innermost first.
/// Each recursion level extends it by value; nothing is ever removed.
#[derive(Debug, Clone, Copy, Default)]
struct InProgress<'p> {
    head: Option<(&'p str, &'p InProgress<'p>)>,
}

impl<'p> InProgress<'p> {
    fn push(&'p self, pointer: &'p str) -> InProgress<'p> {
        InProgress {
            head: Some((pointer, self)),
        }
    }

    fn contains(&self, pointer: &str) -> bool {
        let mut current = self;
        while let Some((p, parent)) = current.head {
            if p == pointer {
                return true;
            }
            current = parent;
        }
        false
    }

    fn innermost(&self) -> Option<&'p str> {
        self.head.map(|(p, _)| p)
    }
}

impl<'a> RefResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        let mut targets = HashSet::new();
        collect_targets(root, &mut targets);
        Self {
            root,
            max_depth: DEFAULT_MAX_REF_DEPTH,
            targets,
            resolved: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Set the nesting ceiling beyond which nodes are returned unresolved.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve the whole document. The input is not modified.
    pub fn resolve(mut self) -> Resolution {
        let root = self.root;
        let document = self.resolve_value(root, InProgress::default(), 0, Some("#"));
        Resolution {
            document,
            diagnostics: self.diagnostics,
        }
    }

    /// `location` is the pointer of `node` while the walk is still outside
    /// every reference, and `None` inside one.
    fn resolve_value(
        &mut self,
        node: &Value,
        chain: InProgress<'_>,
        depth: usize,
        location: Option<&str>,
    ) -> Value {
        if depth > self.max_depth {
            let recorded = self.record(Diagnostic::DepthLimitExceeded {
                pointer: chain.innermost().map(str::to_string),
            });
            if recorded {
                log::warn!("reference depth limit {} exceeded", self.max_depth);
            }
            return node.clone();
        }

        match node {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    return self.resolve_ref(node, map, reference, chain, depth);
                }
                // A referenced definition reached in place resolves exactly
                // like a `$ref` to it.
                if let Some(location) = location.filter(|loc| self.is_target(loc, node)) {
                    return self.resolve_ref(node, &Map::new(), location, chain, depth);
                }
                Value::Object(
                    map.iter()
                        .map(|(key, value)| {
                            let child = location
                                .map(|loc| format!("{loc}/{}", encode_segment(key)));
                            let resolved =
                                self.resolve_value(value, chain, depth + 1, child.as_deref());
                            (key.clone(), resolved)
                        })
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let child = location.map(|loc| format!("{loc}/{index}"));
                        self.resolve_value(item, chain, depth + 1, child.as_deref())
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn is_target(&self, location: &str, node: &Value) -> bool {
        self.targets.contains(location)
            && location
                .strip_prefix('#')
                .and_then(|fragment| lookup_pointer(self.root, fragment))
                .is_some_and(|target| std::ptr::eq(target, node))
    }

    fn resolve_ref(
        &mut self,
        node: &Value,
        siblings: &Map<String, Value>,
        reference: &str,
        chain: InProgress<'_>,
        depth: usize,
    ) -> Value {
        let Some(fragment) = reference.strip_prefix('#') else {
            log::debug!("leaving external reference {reference} unresolved");
            self.record(Diagnostic::ExternalReference {
                reference: reference.to_string(),
            });
            return node.clone();
        };

        if chain.contains(reference) {
            return circular_marker(reference);
        }

        let target = match self.resolved.get(reference) {
            // Reaches back into the current chain, so it closes a cycle here.
            Some(cached) if cached.cycles.iter().any(|p| chain.contains(p)) => {
                return circular_marker(reference);
            }
            Some(cached) => cached.value.clone(),
            None => {
                let root = self.root;
                let Some(raw_target) = lookup_pointer(root, fragment) else {
                    log::warn!("unresolvable reference {reference}");
                    self.record(Diagnostic::UnresolvableReference {
                        pointer: reference.to_string(),
                    });
                    return node.clone();
                };
                let link = chain.push(reference);
                let value = self.resolve_value(raw_target, link, depth + 1, None);
                let mut cycles = HashSet::new();
                collect_cycles(&value, &mut cycles);
                self.resolved.insert(
                    reference.to_string(),
                    Resolved {
                        value: value.clone(),
                        cycles,
                    },
                );
                value
            }
        };

        self.merge_siblings(target, siblings, chain, depth)
    }

    /// Returns `false` when the same finding was already recorded.
    fn record(&mut self, diagnostic: Diagnostic) -> bool {
        if self.diagnostics.contains(&diagnostic) {
            return false;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    /// Keys written next to `$ref` fill in whatever the target leaves unset.
    fn merge_siblings(
        &mut self,
        target: Value,
        siblings: &Map<String, Value>,
        chain: InProgress<'_>,
        depth: usize,
    ) -> Value {
        let Value::Object(mut merged) = target else {
            return target;
        };
        for (key, value) in siblings {
            if key == "$ref" || merged.contains_key(key) {
                continue;
            }
            let resolved = self.resolve_value(value, chain, depth + 1, None);
            merged.insert(key.clone(), resolved);
        }
        Value::Object(merged)
    }
}

/// Resolve a document with the default depth ceiling.
pub fn resolve(document: &Value) -> Resolution {
    RefResolver::new(document).resolve()
}

/// Build the marker that stands in for a re-entered reference.
pub fn circular_marker(pointer: &str) -> Value {
    let mut marker = Map::new();
    marker.insert(CIRCULAR_REF_KEY.to_string(), Value::String(pointer.to_string()));
    Value::Object(marker)
}

/// Gather every local `$ref` pointer in `value`.
fn collect_targets(value: &Value, targets: &mut HashSet<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                if reference.starts_with('#') {
                    targets.insert(reference.clone());
                }
            }
            for child in map.values() {
                collect_targets(child, targets);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_targets(item, targets);
            }
        }
        _ => {}
    }
}

/// Gather the pointers of every cycle marker inside `value`.
fn collect_cycles(value: &Value, cycles: &mut HashSet<String>) {
    match value {
        Value::Object(map) => {
            if let (1, Some(Value::String(pointer))) = (map.len(), map.get(CIRCULAR_REF_KEY)) {
                cycles.insert(pointer.clone());
                return;
            }
            for child in map.values() {
                collect_cycles(child, cycles);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_cycles(item, cycles);
            }
        }
        _ => {}
    }
}

/// Walk a JSON pointer fragment (the part after `#`) from the document root.
fn lookup_pointer<'v>(root: &'v Value, fragment: &str) -> Option<&'v Value> {
    if fragment.is_empty() {
        return Some(root);
    }
    let path = fragment.strip_prefix('/')?;
    path.split('/').try_fold(root, |current, raw_segment| {
        let segment = decode_segment(raw_segment);
        match current {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Undo percent-encoding, then the JSON pointer escapes `~1` and `~0`.
fn decode_segment(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded)
        .replace("~1", "/")
        .replace("~0", "~")
}

/// Escape an object key as a JSON pointer segment.
fn encode_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("Pet"), "Pet");
        assert_eq!(decode_segment("~1users~1{id}"), "/users/{id}");
        assert_eq!(decode_segment("a~0b"), "a~b");
        assert_eq!(decode_segment("My%20Schema"), "My Schema");
        assert_eq!(decode_segment("100%"), "100%");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("/users/{id}"), "~1users~1{id}");
        assert_eq!(encode_segment("a~b"), "a~0b");
        assert_eq!(decode_segment(&encode_segment("~/x~1")), "~/x~1");
    }

    #[test]
    fn test_definition_in_place_matches_reference() {
        let doc = json!({
            "definitions": {"Node": {
                "type": "object",
                "properties": {"next": {"$ref": "#/definitions/Node"}}
            }},
            "root": {"$ref": "#/definitions/Node"}
        });
        let resolved = resolve(&doc).document;
        assert_eq!(resolved["definitions"]["Node"], resolved["root"]);
        assert_eq!(
            resolved["definitions"]["Node"]["properties"]["next"],
            circular_marker("#/definitions/Node")
        );
    }

    #[test]
    fn test_lookup_pointer() {
        let doc = json!({
            "components": {"schemas": {"Pet": {"type": "object"}}},
            "paths": {"/pets": {"get": {"tags": ["a", "b"]}}}
        });
        assert_eq!(
            lookup_pointer(&doc, "/components/schemas/Pet"),
            Some(&json!({"type": "object"}))
        );
        assert_eq!(
            lookup_pointer(&doc, "/paths/~1pets/get/tags/1"),
            Some(&json!("b"))
        );
        assert_eq!(lookup_pointer(&doc, "/components/schemas/Dog"), None);
        assert_eq!(lookup_pointer(&doc, ""), Some(&doc));
        assert_eq!(lookup_pointer(&doc, "components"), None);
    }

    #[test]
    fn test_in_progress_chain() {
        let empty = InProgress::default();
        let a = empty.push("#/a");
        let b = a.push("#/b");
        assert!(b.contains("#/a"));
        assert!(b.contains("#/b"));
        assert!(!a.contains("#/b"));
        assert_eq!(b.innermost(), Some("#/b"));
        assert_eq!(empty.innermost(), None);
    }

    #[test]
    fn test_siblings_fill_missing_keys() {
        let doc = json!({
            "components": {"schemas": {"Id": {"type": "string", "description": "original"}}},
            "x": {"$ref": "#/components/schemas/Id", "description": "ignored", "readOnly": true}
        });
        let resolved = resolve(&doc).document;
        assert_eq!(
            resolved["x"],
            json!({"type": "string", "description": "original", "readOnly": true})
        );
    }

    #[test]
    fn test_collect_cycles() {
        let value = json!({
            "a": circular_marker("#/a"),
            "b": [{"c": circular_marker("#/b")}],
            "d": {"$circularRef": "#/d", "extra": true}
        });
        let mut cycles = HashSet::new();
        collect_cycles(&value, &mut cycles);
        assert_eq!(
            cycles,
            HashSet::from(["#/a".to_string(), "#/b".to_string()])
        );
    }

    #[test]
    fn test_target_resolved_once() {
        let doc = json!({
            "components": {"schemas": {
                "Id": {"type": "string"},
                "User": {"properties": {"id": {"$ref": "#/components/schemas/Id"}}}
            }},
            "a": {"$ref": "#/components/schemas/User"},
            "b": {"$ref": "#/components/schemas/User"}
        });
        let mut resolver = RefResolver::new(&doc);
        let root = resolver.root;
        let document = resolver.resolve_value(root, InProgress::default(), 0, Some("#"));
        assert_eq!(resolver.resolved.len(), 2);
        assert_eq!(document["a"], document["b"]);
        assert_eq!(document["a"]["properties"]["id"], json!({"type": "string"}));
    }

    #[test]
    fn test_depth_ceiling() {
        let doc = json!({"a": {"b": {"c": {"d": 1}}}});
        let resolution = RefResolver::new(&doc).with_max_depth(2).resolve();
        assert_eq!(resolution.document, doc);
        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::DepthLimitExceeded { pointer: None }]
        );
    }
}
