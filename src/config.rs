use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{ActionType, Actor, FieldType};
use crate::error::Result;

/// Heuristic vocabulary and thresholds for a parse.
///
/// Passed by reference through every stage. Nothing in the crate keeps a
/// global copy, so tests can swap keyword sets freely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    pub actors: ActorKeywords,
    pub columns: ColumnSynonyms,
    /// Extra type tokens layered over the built-in synonym table
    pub type_synonyms: BTreeMap<String, FieldType>,
    /// Checked in order; the first action whose keyword appears wins
    pub action_keywords: Vec<ActionKeywords>,
    pub classification: ClassificationThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActorKeywords {
    pub initiator: Vec<String>,
    pub secondary_party: Vec<String>,
    pub approver: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnSynonyms {
    pub name: Vec<String>,
    #[serde(rename = "type")]
    pub type_: Vec<String>,
    pub mandatory: Vec<String>,
    pub logic: Vec<String>,
    pub dropdown_values: Vec<String>,
    pub visibility: Vec<String>,
    pub validation: Vec<String>,
    pub panel: Vec<String>,
    pub default_value: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionKeywords {
    pub action: ActionType,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassificationThresholds {
    /// Data rows inspected when validating a candidate field table
    pub sample_rows: usize,
    /// Share of sampled rows whose type cell must resolve to a known type
    pub min_valid_ratio: f64,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for ActorKeywords {
    fn default() -> Self {
        Self {
            initiator: words(&["initiator", "requester", "requestor", "applicant", "maker"]),
            secondary_party: words(&[
                "spoc",
                "secondary party",
                "vendor",
                "supplier",
                "counterparty",
                "second party",
            ]),
            approver: words(&["approver", "approval", "approve", "checker", "reviewer"]),
        }
    }
}

impl ActorKeywords {
    pub fn keywords_for(&self, actor: Actor) -> &[String] {
        match actor {
            Actor::Initiator => &self.initiator,
            Actor::SecondaryParty => &self.secondary_party,
            Actor::Approver => &self.approver,
        }
    }

    /// First actor, in fixed priority order, with a keyword inside `text`
    pub fn match_actor(&self, text: &str) -> Option<Actor> {
        let text = text.to_lowercase();
        Actor::PRIORITY.into_iter().find(|actor| {
            self.keywords_for(*actor)
                .iter()
                .any(|keyword| !keyword.is_empty() && text.contains(&keyword.to_lowercase()))
        })
    }
}

impl Default for ColumnSynonyms {
    fn default() -> Self {
        Self {
            name: words(&["field", "name", "label", "attribute", "column"]),
            type_: words(&["type", "datatype", "data type", "field type"]),
            mandatory: words(&["mandatory", "required", "compulsory", "is mandatory"]),
            logic: words(&["logic", "rules", "rule", "business rule", "remarks", "description", "comments"]),
            dropdown_values: words(&["dropdown values", "values", "options", "list of values"]),
            visibility: words(&["visibility", "visible", "show when", "display condition"]),
            validation: words(&["validation", "validations", "format", "regex"]),
            panel: words(&["panel", "section", "group"]),
            default_value: words(&["default", "default value"]),
        }
    }
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            sample_rows: 10,
            min_valid_ratio: 0.5,
        }
    }
}

fn default_action_keywords() -> Vec<ActionKeywords> {
    let table: [(ActionType, &[&str]); 6] = [
        (ActionType::Login, &["login", "log in", "logs in", "sign in", "signs in"]),
        (ActionType::Create, &["create", "initiate", "raise", "add new", "fill"]),
        (ActionType::Validate, &["validate", "verify", "verifies", "check"]),
        (ActionType::Approve, &["approve", "approval", "reject", "send back"]),
        (ActionType::Notify, &["notify", "notification", "email", "sms", "alert"]),
        (ActionType::Submit, &["submit", "send for", "forward"]),
    ];
    table
        .into_iter()
        .map(|(action, keywords)| ActionKeywords {
            action,
            keywords: words(keywords),
        })
        .collect()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            actors: ActorKeywords::default(),
            columns: ColumnSynonyms::default(),
            type_synonyms: BTreeMap::new(),
            action_keywords: default_action_keywords(),
            classification: ClassificationThresholds::default(),
        }
    }
}

impl ParserConfig {
    /// Load from the user config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        Ok(ParserConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the path to the parser config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("budparse").join("config.toml"))
    }
}
