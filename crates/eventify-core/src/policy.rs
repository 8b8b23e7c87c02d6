use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::PathBuf};

///
/// Config
///
/// Generation run configuration as supplied by the caller. Exclusion
/// entries are matched case-insensitively; an `exclude_fields` entry is
/// either a bare field name (excluded on every model) or qualified as
/// `model.field` (excluded on that model only).
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub exclude_models: Vec<String>,

    #[serde(default)]
    pub exclude_fields: Vec<String>,

    #[serde(default = "Config::default_out_dir")]
    pub out_dir: PathBuf,
}

impl Config {
    fn default_out_dir() -> PathBuf {
        PathBuf::from("./eventify")
    }
}

///
/// PolicyFilter
///
/// Case-folded set-membership view over a `Config`. Built once per run;
/// the predicates are called per (model, field, hook, method) tuple during
/// generation, so both must stay O(1).
///

#[derive(Clone, Debug, Default)]
pub struct PolicyFilter {
    excluded_models: HashSet<String>,
    excluded_fields: HashSet<String>,
}

impl PolicyFilter {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            excluded_models: config
                .exclude_models
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            excluded_fields: config
                .exclude_fields
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
        }
    }

    /// True unless the model is excluded by policy.
    #[must_use]
    pub fn model_allowed(&self, model: &str) -> bool {
        !self.excluded_models.contains(&model.to_lowercase())
    }

    /// True unless the field matches a bare exclusion or a `model.field`
    /// exclusion qualified to this model.
    #[must_use]
    pub fn field_allowed(&self, model: &str, field: &str) -> bool {
        let field = field.to_lowercase();
        if self.excluded_fields.contains(&field) {
            return false;
        }

        let qualified = format!("{}.{field}", model.to_lowercase());
        !self.excluded_fields.contains(&qualified)
    }
}
