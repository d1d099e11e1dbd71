//! Weaviate client implementing [`ShelterBackend`].
//!
//! Uses the REST API for schema management and object inserts, and
//! GraphQL for the aggregate count and bulk fetch. See
//! <https://weaviate.io/developers/weaviate/api/rest>

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::backend::{BackendError, ShelterBackend};

/// Fixed timeout for backend calls. The store degrades to empty on
/// failure, so a hung request must not stall a search indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A Weaviate instance reached over HTTP.
pub struct WeaviateBackend {
    client: reqwest::Client,
    base_url: String,
}

impl WeaviateBackend {
    /// Creates a client for the instance at `base_url`
    /// (e.g., `"http://localhost:8080"`).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn graphql(&self, query: String) -> Result<Value, BackendError> {
        let resp = self
            .client
            .post(format!("{}/v1/graphql", self.base_url))
            .json(&json!({ "query": query }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body: Value = resp.json().await?;
        if let Some(errors) = body.get("errors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            return Err(BackendError::Parse {
                message: format!("GraphQL errors: {}", Value::Array(errors.clone())),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ShelterBackend for WeaviateBackend {
    async fn schema_exists(&self, class: &str) -> Result<bool, BackendError> {
        let resp = self
            .client
            .get(format!("{}/v1/schema", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body: Value = resp.json().await?;
        Ok(parse_schema_classes(&body).iter().any(|c| c == class))
    }

    async fn create_schema(&self, class_definition: &Value) -> Result<(), BackendError> {
        let resp = self
            .client
            .post(format!("{}/v1/schema", self.base_url))
            .json(class_definition)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn delete_schema(&self, class: &str) -> Result<(), BackendError> {
        let resp = self
            .client
            .delete(format!("{}/v1/schema/{class}", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        // A missing class is already the desired end state.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn insert(&self, class: &str, properties: Value) -> Result<String, BackendError> {
        let resp = self
            .client
            .post(format!("{}/v1/objects", self.base_url))
            .json(&json!({ "class": class, "properties": properties }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body: Value = resp.json().await?;
        parse_insert_id(&body)
    }

    async fn count(&self, class: &str) -> Result<u64, BackendError> {
        let query = format!("{{ Aggregate {{ {class} {{ meta {{ count }} }} }} }}");
        let body = self.graphql(query).await?;
        parse_count(&body, class)
    }

    async fn fetch_all(
        &self,
        class: &str,
        fields: &str,
        limit: u64,
    ) -> Result<Vec<Value>, BackendError> {
        let query = format!("{{ Get {{ {class}(limit: {limit}) {{ {fields} }} }} }}");
        let body = self.graphql(query).await?;
        parse_objects(&body, class)
    }
}

/// Extracts class names from a `GET /v1/schema` response.
fn parse_schema_classes(body: &Value) -> Vec<String> {
    body["classes"]
        .as_array()
        .map(|classes| {
            classes
                .iter()
                .filter_map(|c| c["class"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts the object ID from a `POST /v1/objects` response.
fn parse_insert_id(body: &Value) -> Result<String, BackendError> {
    body["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| BackendError::Parse {
            message: "Missing id in object creation response".to_string(),
        })
}

/// Extracts the object count from an `Aggregate` GraphQL response.
fn parse_count(body: &Value, class: &str) -> Result<u64, BackendError> {
    body["data"]["Aggregate"][class][0]["meta"]["count"]
        .as_u64()
        .ok_or_else(|| BackendError::Parse {
            message: format!("Missing Aggregate count for class {class}"),
        })
}

/// Extracts the object list from a `Get` GraphQL response.
fn parse_objects(body: &Value, class: &str) -> Result<Vec<Value>, BackendError> {
    body["data"]["Get"][class]
        .as_array()
        .cloned()
        .ok_or_else(|| BackendError::Parse {
            message: format!("Missing Get results for class {class}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_schema_classes() {
        let body = json!({
            "classes": [
                { "class": "Shelter" },
                { "class": "MissingPerson" },
            ]
        });
        assert_eq!(parse_schema_classes(&body), vec!["Shelter", "MissingPerson"]);
    }

    #[test]
    fn parses_empty_schema() {
        assert!(parse_schema_classes(&json!({})).is_empty());
        assert!(parse_schema_classes(&json!({ "classes": [] })).is_empty());
    }

    #[test]
    fn parses_insert_id() {
        let body = json!({ "id": "4b97a53e-0b1d-4f3a-a0a5-9a6d4e3c2b1a" });
        assert_eq!(
            parse_insert_id(&body).unwrap(),
            "4b97a53e-0b1d-4f3a-a0a5-9a6d4e3c2b1a"
        );
        assert!(parse_insert_id(&json!({})).is_err());
    }

    #[test]
    fn parses_aggregate_count() {
        let body = json!({
            "data": { "Aggregate": { "Shelter": [ { "meta": { "count": 42 } } ] } }
        });
        assert_eq!(parse_count(&body, "Shelter").unwrap(), 42);
    }

    #[test]
    fn count_parse_fails_on_missing_class() {
        let body = json!({ "data": { "Aggregate": {} } });
        assert!(parse_count(&body, "Shelter").is_err());
    }

    #[test]
    fn parses_get_objects() {
        let body = json!({
            "data": { "Get": { "Shelter": [
                { "name": "A", "address": "1 First St" },
                { "name": "B", "address": "2 Second St" },
            ] } }
        });
        let objects = parse_objects(&body, "Shelter").unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0]["name"], "A");
    }

    #[test]
    fn get_parse_fails_on_missing_class() {
        let body = json!({ "data": { "Get": {} } });
        assert!(parse_objects(&body, "Shelter").is_err());
    }
}
