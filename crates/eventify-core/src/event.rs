use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Hook
/// Timing marker: `before` fires ahead of the client call, `after` once
/// its result is available.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Hook {
    #[display("before")]
    Before,

    #[display("after")]
    After,
}

impl Hook {
    pub const ALL: [Self; 2] = [Self::Before, Self::After];

    /// Parse a wire token; anything else is not a hook.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            _ => None,
        }
    }
}

///
/// Method
/// Closed enumeration of the CRUD surface the underlying client exposes.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Method {
    #[display("findMany")]
    FindMany,

    #[display("findUnique")]
    FindUnique,

    #[display("create")]
    Create,

    #[display("update")]
    Update,

    #[display("delete")]
    Delete,
}

impl Method {
    pub const ALL: [Self; 5] = [
        Self::FindMany,
        Self::FindUnique,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    /// The subset that mutates rows; only these carry field-level events.
    pub const MUTATING: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Parse a wire token; anything else is not a method.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "findMany" => Some(Self::FindMany),
            "findUnique" => Some(Self::FindUnique),
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_mutating(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

///
/// EventConstituents
///
/// Structured parts of an event identifier. Two shapes occur: model-level
/// (no field) and field-level (field present, mutating methods only).
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventConstituents {
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<Hook>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
}

impl EventConstituents {
    #[must_use]
    pub fn model_level(model: &str, hook: Hook, method: Method) -> Self {
        Self {
            model: model.to_string(),
            field: None,
            hook: Some(hook),
            method: Some(method),
        }
    }

    #[must_use]
    pub fn field_level(model: &str, field: &str, hook: Hook, method: Method) -> Self {
        Self {
            model: model.to_string(),
            field: Some(field.to_string()),
            hook: Some(hook),
            method: Some(method),
        }
    }
}

///
/// EventIdentifiers
/// The two canonical string forms of one event.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventIdentifiers {
    /// Wire/topic form: `model[.field][.hook][.method]`, model lowercased,
    /// field casing preserved.
    pub dot_case: String,

    /// Export/key form: every present part capitalized and concatenated.
    pub camel_case: String,
}

/// Uppercase the first character, leaving the rest untouched.
/// `createdAt` becomes `CreatedAt`, not `Createdat`.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Build both canonical identifier forms from structured constituents.
/// Absent optional parts are omitted entirely, never left as empty
/// segments, so identifiers compress cleanly (`user.before.create`).
#[must_use]
pub fn compose(constituents: &EventConstituents) -> EventIdentifiers {
    let EventConstituents {
        model,
        field,
        hook,
        method,
    } = constituents;

    let mut dot_case = model.to_lowercase();
    let mut camel_case = capitalize(model);

    if let Some(field) = field {
        dot_case.push('.');
        dot_case.push_str(field);
        camel_case.push_str(&capitalize(field));
    }
    if let Some(hook) = hook {
        dot_case.push('.');
        dot_case.push_str(&hook.to_string());
        camel_case.push_str(&capitalize(&hook.to_string()));
    }
    if let Some(method) = method {
        dot_case.push('.');
        dot_case.push_str(&method.to_string());
        camel_case.push_str(&capitalize(&method.to_string()));
    }

    EventIdentifiers {
        dot_case,
        camel_case,
    }
}

/// Split a dot-case key back into constituents.
///
/// The grammar is positional, not self-describing: three or fewer segments
/// read as `{model, hook, method}`, four or more as
/// `{model, field, hook, method}`. Malformed input (including the empty
/// string) yields an empty model that downstream catalog lookups simply
/// fail to match; this function never errors.
#[must_use]
pub fn decompose(dot_case: &str) -> EventConstituents {
    let chunks: Vec<&str> = dot_case.split('.').collect();

    if chunks.len() <= 3 {
        EventConstituents {
            model: chunks.first().copied().unwrap_or_default().to_string(),
            field: None,
            hook: chunks.get(1).copied().and_then(Hook::from_token),
            method: chunks.get(2).copied().and_then(Method::from_token),
        }
    } else {
        EventConstituents {
            model: chunks[0].to_string(),
            field: Some(chunks[1].to_string()),
            hook: Hook::from_token(chunks[2]),
            method: Method::from_token(chunks[3]),
        }
    }
}
