//! Tabbed settings form generated from a key/type schema.
//!
//! The schema is a closed two-level shape: either `group -> field -> tag`, or
//! `group -> sub-group -> field -> tag`. All values are stored as text under
//! the `processors` root of the record.

use serde_json::{Map, Value};
use thiserror::Error;

pub const VALUES_ROOT: &str = "processors";

/// The only field type tag the form knows how to render.
pub const STRING_TAG: &str = "string";

/// Field names rendered as checkboxes unless configured otherwise.
pub const DEFAULT_SWITCHES: &[&str] = &["VERBOSE", "RAW_RTSP"];

#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("schema must be an object of groups")]
    NotAnObject,
    #[error("group `{0}` must be an object")]
    GroupNotObject(String),
    #[error("`{0}` mixes fields and sub-groups")]
    MixedGroup(String),
    #[error("`{0}` nests deeper than two levels")]
    TooDeep(String),
    #[error("`{0}` has unsupported type tag {1:?}")]
    UnknownTag(String, String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    /// Dotted path below the values root.
    pub path: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    pub key: String,
    pub fields: Vec<Field>,
}

impl Tab {
    pub fn title(&self) -> String {
        title(&self.key)
    }
}

/// Turn `snake_case` into `Title Case` the way labels are shown.
pub fn title(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_word = false;
    for c in spaced.chars() {
        let word = c.is_alphanumeric();
        if word && !prev_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_word = word;
    }
    out
}

fn fields_of(prefix: &str, group: &Map<String, Value>) -> Vec<Field> {
    group
        .keys()
        .map(|name| Field {
            name: name.clone(),
            path: format!("{prefix}.{name}"),
        })
        .collect()
}

fn all_tags(group: &Map<String, Value>) -> bool {
    group.values().all(|v| v == STRING_TAG)
}

fn unknown_tag(path: String, tag: &str) -> SchemaError {
    SchemaError::UnknownTag(path, tag.to_string())
}

/// Derive the tab layout from a schema.
///
/// A group whose values are all `"string"` becomes one tab; otherwise every
/// sub-group becomes its own tab titled `"<group> <sub-group>"`.
pub fn derive_tabs(schema: &Value) -> Result<Vec<Tab>, SchemaError> {
    let groups = schema.as_object().ok_or(SchemaError::NotAnObject)?;
    let mut tabs = Vec::new();
    for (key, group) in groups {
        let group = group
            .as_object()
            .ok_or_else(|| SchemaError::GroupNotObject(key.clone()))?;
        if all_tags(group) {
            tabs.push(Tab {
                key: key.clone(),
                fields: fields_of(key, group),
            });
            continue;
        }
        for (sub_key, sub) in group {
            let sub = match sub {
                Value::Object(sub) => sub,
                Value::String(tag) if tag != STRING_TAG => {
                    return Err(unknown_tag(format!("{key}.{sub_key}"), tag));
                }
                _ => return Err(SchemaError::MixedGroup(key.clone())),
            };
            for (name, tag) in sub {
                match tag {
                    Value::String(t) if t == STRING_TAG => {}
                    Value::String(t) => {
                        return Err(unknown_tag(format!("{key}.{sub_key}.{name}"), t));
                    }
                    _ => return Err(SchemaError::TooDeep(format!("{key}.{sub_key}"))),
                }
            }
            tabs.push(Tab {
                key: format!("{key} {sub_key}"),
                fields: fields_of(&format!("{key}.{sub_key}"), sub),
            });
        }
    }
    Ok(tabs)
}

// ── Dotted-path store ───────────────────────────────────────────────────────

fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |node, key| node.as_object()?.get(key))
}

/// Write `value` at `path`, replacing any non-object on the way with an object.
fn set_path(root: &mut Value, path: &str, value: Value) {
    let mut node = root;
    for key in path.split('.') {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            unreachable!("node was just made an object");
        };
        node = map.entry(key.to_string()).or_insert(Value::Null);
    }
    *node = value;
}

/// Result of closing the form.
#[derive(Clone, Debug, PartialEq)]
pub enum FormOutcome {
    Saved(Value),
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct FormState {
    tabs: Vec<Tab>,
    values: Value,
    switches: Vec<String>,
    active_tab: usize,
    pub error_message: Option<String>,
}

impl FormState {
    /// Build the form. For a new record every field path is pre-populated.
    pub fn new(
        schema: &Value,
        record: Option<Value>,
        new_form: bool,
        switches: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let tabs = derive_tabs(schema)?;
        let values = match record {
            Some(v) if v.is_object() => v,
            _ => {
                let mut root = Map::new();
                root.insert(VALUES_ROOT.to_string(), Value::Object(Map::new()));
                Value::Object(root)
            }
        };
        let mut form = Self {
            tabs,
            values,
            switches,
            active_tab: 0,
            error_message: None,
        };
        if new_form {
            form.prepopulate();
        }
        Ok(form)
    }

    fn prepopulate(&mut self) {
        let defaults: Vec<(String, &'static str)> = self
            .tabs
            .iter()
            .flat_map(|tab| tab.fields.iter())
            .map(|f| {
                let blank = if self.is_switch(&f.name) { "false" } else { "" };
                (f.path.clone(), blank)
            })
            .collect();
        for (path, blank) in defaults {
            self.set_value(&path, blank);
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active_tab = index;
        }
    }

    pub fn is_switch(&self, field_name: &str) -> bool {
        self.switches.iter().any(|s| s == field_name)
    }

    /// Text stored at `path` below the values root; missing or null reads as empty.
    pub fn value(&self, path: &str) -> String {
        match get_path(&self.values, &format!("{VALUES_ROOT}.{path}")) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn set_value(&mut self, path: &str, value: impl Into<String>) {
        set_path(
            &mut self.values,
            &format!("{VALUES_ROOT}.{path}"),
            Value::String(value.into()),
        );
    }

    pub fn checked(&self, path: &str) -> bool {
        self.value(path) == "true"
    }

    pub fn set_checked(&mut self, path: &str, checked: bool) {
        self.set_value(path, if checked { "true" } else { "false" });
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn submit(&self) -> FormOutcome {
        FormOutcome::Saved(self.values.clone())
    }

    pub fn cancel(&self) -> FormOutcome {
        FormOutcome::Cancelled
    }
}
