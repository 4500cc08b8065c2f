//! Dataset classification and entry extraction.
//!
//! Every JSON value the extractor visits is first viewed as a [`Node`], a
//! closed set of shapes matched explicitly:
//!
//! - a list of records
//! - an entry carrying a `string_list_data` array
//! - a bare string
//! - any other object
//!
//! Relationship kinds only look at entry lists. Hashtags and unclassified
//! documents fall back to a depth-bounded deep scan.

use std::collections::HashSet;

use serde_json::{Map, Value};
use url::Url;

use followlens_core::kind::{kind_from_file_name, kind_from_json_object};
use followlens_core::{
    DatasetKind, ExtractedDataset, IngestWarning, RelationshipEntry, is_valid_handle,
    normalize_username,
};

/// Maximum nesting depth the deep scan descends into.
pub const MAX_SCAN_DEPTH: usize = 32;

/// Classify a document by file name, then by its top-level keys.
pub fn classify(file_name: &str, json: &Value) -> DatasetKind {
    kind_from_file_name(file_name)
        .or_else(|| json.as_object().and_then(kind_from_json_object))
        .unwrap_or(DatasetKind::Unknown)
}

/// Classify a document and extract its entries.
///
/// The document is kept on the returned dataset as its raw value.
pub fn classify_and_extract(file_name: impl Into<String>, json: Value) -> ExtractedDataset {
    let file_name = file_name.into();
    let kind = classify(&file_name, &json);
    let entries = extract_entries(kind, &json);
    ExtractedDataset::new(kind, entries, file_name, json)
}

/// Extract the entries of a document already classified as `kind`.
///
/// Entries are unique by normalized username; the first occurrence wins.
pub fn extract_entries(kind: DatasetKind, json: &Value) -> Vec<RelationshipEntry> {
    let mut collector = Collector::default();
    for target in targets(kind, json) {
        if kind.is_relationship() {
            collector.relationships(target);
        } else {
            collector.deep_scan(target, 0);
        }
    }
    collector.entries
}

/// Warnings a freshly extracted dataset deserves.
pub fn dataset_warnings(dataset: &ExtractedDataset) -> Vec<IngestWarning> {
    let mut warnings = Vec::new();
    if dataset.kind() == DatasetKind::Unknown {
        warnings.push(IngestWarning::unknown_kind(dataset.source_file()));
    }
    if dataset.kind().expects_entries() && dataset.is_empty() {
        warnings.push(IngestWarning::empty_dataset(dataset.source_file()));
    }
    warnings
}

/// Derive a username from a profile link.
///
/// Anonymized links (`/_u/<name>`) yield the segment after `_u`; any other
/// link yields its last non-empty path segment.
pub fn username_from_href(href: &str) -> Option<String> {
    let url = Url::parse(href.trim()).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => None,
        ["_u", name, ..] => Some((*name).to_string()),
        [.., last] => Some((*last).to_string()),
    }
}

/// Read a timestamp from a JSON number or a decimal string.
pub fn coerce_timestamp(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_integer(s),
        _ => None,
    }
}

/// Parse the leading integer of a string (`"1700000000abc"` -> 1700000000).
fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && matches!(c, '-' | '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

/// The values extraction runs on: the kind's top-level keys when present,
/// otherwise the whole document.
fn targets(kind: DatasetKind, json: &Value) -> Vec<&Value> {
    let scoped: Vec<&Value> = match json.as_object() {
        Some(object) => kind
            .json_keys()
            .iter()
            .filter_map(|key| object.get(*key))
            .collect(),
        None => Vec::new(),
    };
    if scoped.is_empty() { vec![json] } else { scoped }
}

/// Shape of a JSON value as seen by the extractor.
enum Node<'a> {
    /// An array of records.
    List(&'a [Value]),
    /// An object with a `string_list_data` array.
    StringListEntry {
        record: &'a Map<String, Value>,
        items: &'a [Value],
    },
    /// A bare string.
    Text(&'a str),
    /// Any other object.
    Object(&'a Map<String, Value>),
    /// Numbers, booleans and null.
    Scalar,
}

impl<'a> Node<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Node::List(items),
            Value::Object(record) => match record.get("string_list_data") {
                Some(Value::Array(items)) => Node::StringListEntry { record, items },
                _ => Node::Object(record),
            },
            Value::String(s) => Node::Text(s),
            _ => Node::Scalar,
        }
    }
}

/// Non-empty string field of a record.
fn text<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[derive(Default)]
struct Collector {
    entries: Vec<RelationshipEntry>,
    seen: HashSet<String>,
}

impl Collector {
    fn push(
        &mut self,
        username: &str,
        display_name: Option<&str>,
        href: Option<&str>,
        timestamp: Option<i64>,
    ) {
        if !self.seen.insert(normalize_username(username)) {
            return;
        }
        self.entries.push(
            RelationshipEntry::new(username)
                .with_display_name(display_name.map(str::to_string))
                .with_href(href.map(str::to_string))
                .with_timestamp(timestamp),
        );
    }

    fn has_seen(&self, username: &str) -> bool {
        self.seen.contains(&normalize_username(username))
    }

    /// Relationship documents: lists of `{ title?, string_list_data }` entries.
    fn relationships(&mut self, target: &Value) {
        match Node::of(target) {
            Node::List(items) => {
                for item in items {
                    self.relationship_entry(item, None);
                }
            }
            Node::StringListEntry { record, items } => {
                let title = text(record, "title");
                self.string_list(items, title);
                self.array_children(record, title);
            }
            Node::Object(record) => self.array_children(record, text(record, "title")),
            Node::Text(_) | Node::Scalar => {}
        }
    }

    fn array_children(&mut self, record: &Map<String, Value>, parent_title: Option<&str>) {
        for value in record.values() {
            if let Value::Array(children) = value {
                for child in children {
                    self.relationship_entry(child, parent_title);
                }
            }
        }
    }

    fn relationship_entry(&mut self, value: &Value, parent_title: Option<&str>) {
        if let Node::StringListEntry { record, items } = Node::of(value) {
            let title = text(record, "title").or(parent_title);
            self.string_list(items, title);
        }
    }

    /// Items of a `string_list_data` array.
    fn string_list(&mut self, items: &[Value], parent_title: Option<&str>) {
        for item in items {
            let Value::Object(record) = item else {
                continue;
            };
            let href = text(record, "href");
            let href_name = href.and_then(username_from_href);
            let record_title = text(record, "title");

            let candidate = [
                text(record, "value"),
                href_name.as_deref(),
                record_title,
                parent_title,
            ]
            .into_iter()
            .flatten()
            .find(|candidate| is_valid_handle(candidate));

            if let Some(username) = candidate {
                self.push(
                    username,
                    record_title.or(parent_title),
                    href,
                    coerce_timestamp(record.get("timestamp")),
                );
            }
        }
    }

    /// Generic recursive scan for hashtags and unclassified documents.
    fn deep_scan(&mut self, value: &Value, depth: usize) {
        if depth > MAX_SCAN_DEPTH {
            return;
        }
        match Node::of(value) {
            Node::List(items) => {
                for item in items {
                    self.deep_scan(item, depth + 1);
                }
            }
            Node::Text(s) => {
                if is_valid_handle(s) {
                    self.push(s, None, None, None);
                }
            }
            Node::StringListEntry { record, items } => {
                self.string_list(items, text(record, "title"));
                self.inspect_record(record);
                self.scan_children(record, depth);
            }
            Node::Object(record) => {
                self.inspect_record(record);
                self.scan_children(record, depth);
            }
            Node::Scalar => {}
        }
    }

    /// Probe `value`, `username`, `title` and `href`, in that order.
    fn inspect_record(&mut self, record: &Map<String, Value>) {
        let title = text(record, "title");
        let href = text(record, "href");
        let timestamp = coerce_timestamp(record.get("timestamp"));

        if let Some(value) = text(record, "value").filter(|v| is_valid_handle(v)) {
            self.push(value, title, href, timestamp);
        }

        if let Some(username) = text(record, "username").filter(|u| is_valid_handle(u)) {
            self.push(username, text(record, "full_name"), href, timestamp);
        }

        let href_name = href
            .and_then(username_from_href)
            .filter(|name| is_valid_handle(name));

        if let Some(title) = title.filter(|t| is_valid_handle(t) && !self.has_seen(t)) {
            let username = href_name.as_deref().unwrap_or(title);
            self.push(username, Some(title), href, timestamp);
        }

        if let Some(name) = href_name.as_deref() {
            self.push(name, title, href, timestamp);
        }
    }

    fn scan_children(&mut self, record: &Map<String, Value>, depth: usize) {
        for child in record.values() {
            if child.is_object() || child.is_array() {
                self.deep_scan(child, depth + 1);
            }
        }
    }
}
