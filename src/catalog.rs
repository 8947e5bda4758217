//! Selectable projects, filters and sort fields.
//!
//! The tracker owns these lists; the built-in defaults mirror the public
//! Mojira instance and can be replaced from the config file.

use serde::{Deserialize, Serialize};

/// One entry of an enumerated selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    /// Value sent to the API.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl EnumOption {
    /// Create a new option.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Default filter id.
pub const DEFAULT_FILTER: &str = "all";

/// Default sort field id.
pub const DEFAULT_SORT_FIELD: &str = "created";

const PROJECTS: &[(&str, &str)] = &[
    ("MC", "Minecraft: Java Edition"),
    ("MCPE", "Minecraft (Bedrock codebase)"),
    ("MCL", "Minecraft Launcher"),
    ("REALMS", "Minecraft Realms"),
    ("WEB", "Mojang Web Services"),
    ("BDS", "Bedrock Dedicated Server"),
    ("MCD", "Minecraft Dungeons"),
    ("MCLG", "Minecraft Legends"),
];

const FILTERS: &[(&str, &str)] = &[
    ("all", "All issues"),
    ("open", "Open"),
    ("resolved", "Resolved"),
    ("fixed", "Fixed"),
];

const SORT_FIELDS: &[(&str, &str)] = &[
    ("created", "Created"),
    ("updated", "Updated"),
    ("resolved", "Resolved"),
    ("votes", "Votes"),
];

fn options(pairs: &[(&str, &str)]) -> Vec<EnumOption> {
    pairs
        .iter()
        .map(|(id, label)| EnumOption::new(*id, *label))
        .collect()
}

/// The three enumerations consumed by the query controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub projects: Vec<EnumOption>,
    pub filters: Vec<EnumOption>,
    pub sort_fields: Vec<EnumOption>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            projects: options(PROJECTS),
            filters: options(FILTERS),
            sort_fields: options(SORT_FIELDS),
        }
    }
}

impl Catalog {
    pub fn has_project(&self, id: &str) -> bool {
        contains(&self.projects, id)
    }

    pub fn has_filter(&self, id: &str) -> bool {
        contains(&self.filters, id)
    }

    pub fn has_sort_field(&self, id: &str) -> bool {
        contains(&self.sort_fields, id)
    }
}

/// Label of the option with the given id, if present.
pub fn label_of<'a>(options: &'a [EnumOption], id: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|o| o.id == id)
        .map(|o| o.label.as_str())
}

fn contains(options: &[EnumOption], id: &str) -> bool {
    options.iter().any(|o| o.id == id)
}
