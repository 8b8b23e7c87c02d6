use serde_json::{Value, json};
use std::{collections::HashMap, sync::RwLock};
use thiserror::Error as ThisError;

///
/// ClientError
///

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("no row matched '{model}' where {filter}")]
    NotFound { model: String, filter: Value },

    #[error("malformed arguments for {model}.{method}: {message}")]
    BadArgs {
        model: String,
        method: &'static str,
        message: String,
    },
}

///
/// DataClient
///
/// The opaque capability generated service wrappers call into. Arguments
/// follow the `{where, data}` envelope convention; results are whatever
/// the backing store returns, passed through untouched.
///

pub trait DataClient: Send + Sync {
    fn find_many(&self, model: &str, args: &Value) -> Result<Value, ClientError>;
    fn find_unique(&self, model: &str, args: &Value) -> Result<Value, ClientError>;
    fn create(&self, model: &str, args: &Value) -> Result<Value, ClientError>;
    fn update(&self, model: &str, args: &Value) -> Result<Value, ClientError>;
    fn delete(&self, model: &str, args: &Value) -> Result<Value, ClientError>;
}

///
/// MemoryClient
///
/// Hash-backed client for single-process use and tests. Rows are plain
/// JSON objects keyed by an auto-assigned integer `id`; lookups match on
/// `where.id` only. Not a query engine.
///

#[derive(Debug, Default)]
pub struct MemoryClient {
    rows: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn where_id(model: &str, method: &'static str, args: &Value) -> Result<Value, ClientError> {
        args.get("where")
            .and_then(|w| w.get("id"))
            .cloned()
            .ok_or_else(|| ClientError::BadArgs {
                model: model.to_string(),
                method,
                message: "missing where.id".to_string(),
            })
    }

    fn data(model: &str, method: &'static str, args: &Value) -> Result<Value, ClientError> {
        match args.get("data") {
            Some(data @ Value::Object(_)) => Ok(data.clone()),
            _ => Err(ClientError::BadArgs {
                model: model.to_string(),
                method,
                message: "missing data object".to_string(),
            }),
        }
    }
}

impl DataClient for MemoryClient {
    fn find_many(&self, model: &str, _args: &Value) -> Result<Value, ClientError> {
        let rows = self.rows.read().expect("row map poisoned");

        Ok(Value::Array(
            rows.get(&model.to_lowercase()).cloned().unwrap_or_default(),
        ))
    }

    fn find_unique(&self, model: &str, args: &Value) -> Result<Value, ClientError> {
        let id = Self::where_id(model, "findUnique", args)?;
        let rows = self.rows.read().expect("row map poisoned");

        Ok(rows
            .get(&model.to_lowercase())
            .and_then(|rows| rows.iter().find(|r| r.get("id") == Some(&id)))
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn create(&self, model: &str, args: &Value) -> Result<Value, ClientError> {
        let mut row = Self::data(model, "create", args)?;
        let mut rows = self.rows.write().expect("row map poisoned");
        let table = rows.entry(model.to_lowercase()).or_default();

        if row.get("id").is_none() {
            let next = table
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_u64))
                .max()
                .unwrap_or(0)
                + 1;
            row["id"] = json!(next);
        }

        table.push(row.clone());

        Ok(row)
    }

    fn update(&self, model: &str, args: &Value) -> Result<Value, ClientError> {
        let id = Self::where_id(model, "update", args)?;
        let data = Self::data(model, "update", args)?;
        let mut rows = self.rows.write().expect("row map poisoned");

        let row = rows
            .get_mut(&model.to_lowercase())
            .and_then(|rows| rows.iter_mut().find(|r| r.get("id") == Some(&id)))
            .ok_or_else(|| ClientError::NotFound {
                model: model.to_string(),
                filter: json!({ "id": id }),
            })?;

        if let (Value::Object(row), Value::Object(data)) = (&mut *row, &data) {
            for (k, v) in data {
                row.insert(k.clone(), v.clone());
            }
        }

        Ok(row.clone())
    }

    fn delete(&self, model: &str, args: &Value) -> Result<Value, ClientError> {
        let id = Self::where_id(model, "delete", args)?;
        let mut rows = self.rows.write().expect("row map poisoned");

        let table = rows
            .get_mut(&model.to_lowercase())
            .ok_or_else(|| ClientError::NotFound {
                model: model.to_string(),
                filter: json!({ "id": id }),
            })?;

        let pos = table
            .iter()
            .position(|r| r.get("id") == Some(&id))
            .ok_or_else(|| ClientError::NotFound {
                model: model.to_string(),
                filter: json!({ "id": id }),
            })?;

        Ok(table.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientError, DataClient, MemoryClient};
    use serde_json::{Value, json};

    #[test]
    fn create_assigns_sequential_ids() {
        let client = MemoryClient::new();
        let a = client.create("User", &json!({"data": {"email": "a"}})).unwrap();
        let b = client.create("User", &json!({"data": {"email": "b"}})).unwrap();

        assert_eq!(a["id"], json!(1));
        assert_eq!(b["id"], json!(2));
    }

    #[test]
    fn update_merges_into_the_matched_row() {
        let client = MemoryClient::new();
        client.create("User", &json!({"data": {"email": "a"}})).unwrap();

        let row = client
            .update("User", &json!({"where": {"id": 1}, "data": {"email": "b"}}))
            .unwrap();
        assert_eq!(row["email"], json!("b"));
        assert_eq!(row["id"], json!(1));
    }

    #[test]
    fn find_unique_misses_return_null() {
        let client = MemoryClient::new();
        let row = client
            .find_unique("User", &json!({"where": {"id": 9}}))
            .unwrap();
        assert_eq!(row, Value::Null);
    }

    #[test]
    fn delete_removes_and_returns_the_row() {
        let client = MemoryClient::new();
        client.create("User", &json!({"data": {"email": "a"}})).unwrap();

        let removed = client.delete("User", &json!({"where": {"id": 1}})).unwrap();
        assert_eq!(removed["email"], json!("a"));

        let err = client.delete("User", &json!({"where": {"id": 1}})).unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }

    #[test]
    fn missing_envelope_parts_are_bad_args() {
        let client = MemoryClient::new();
        let err = client.update("User", &json!({"data": {}})).unwrap_err();
        assert!(matches!(err, ClientError::BadArgs { method: "update", .. }));
    }
}
