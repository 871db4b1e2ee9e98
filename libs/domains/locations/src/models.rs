use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{LocationError, LocationResult};

/// Page size used when the caller does not pass `limit`
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Largest page a single list call returns
pub const MAX_PAGE_SIZE: usize = 100;
/// Longest client-supplied id accepted on upsert
pub const MAX_ID_LEN: usize = 128;

/// Location entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Unique identifier, immutable once assigned
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Reference to an external image
    pub image_url: String,
    /// First-write time (RFC 3339, UTC); never changed by later upserts
    #[serde(alias = "createdAt")]
    pub timestamp: DateTime<Utc>,
}

/// Request body for create and upsert. Every field is required; upsert is a full replace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    #[validate(required(message = "name is required"), length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(required(message = "description is required"), length(max = 4000))]
    pub description: Option<String>,
    #[validate(required(message = "imageUrl is required"), length(min = 1, max = 2048))]
    pub image_url: Option<String>,
}

impl LocationInput {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            image_url: Some(image_url.into()),
        }
    }

    /// Validate and unwrap into the mutable fields of a [`Location`].
    pub fn into_fields(self) -> LocationResult<LocationFields> {
        self.validate()
            .map_err(|e| LocationError::Validation(e.to_string()))?;

        let missing = |field: &str| LocationError::Validation(format!("{} is required", field));
        Ok(LocationFields {
            name: self.name.ok_or_else(|| missing("name"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            image_url: self.image_url.ok_or_else(|| missing("imageUrl"))?,
        })
    }
}

/// The replaceable part of a location, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFields {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl LocationFields {
    pub fn into_location(self, id: String, timestamp: DateTime<Utc>) -> Location {
        Location {
            id,
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            timestamp,
        }
    }
}

/// One page of a list call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationPage {
    pub items: Vec<Location>,
    /// Opaque token for the next page; absent at the end of the collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Query parameters for listing locations
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Cursor from a previous page's `nextCursor` (alias: `lastLocationID`)
    #[serde(alias = "lastLocationID")]
    pub cursor: Option<String>,
    /// Page size, 1 to 100 (default 50)
    pub limit: Option<usize>,
}

/// Resolve the requested page size against the default and the maximum.
pub fn page_size(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Reject ids a client supplies in a path that could never have been generated or stored.
pub fn validate_id(id: &str) -> LocationResult<()> {
    if id.is_empty() || id.chars().count() > MAX_ID_LEN {
        return Err(LocationError::Validation(format!(
            "id must be between 1 and {} characters",
            MAX_ID_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_serializes_camel_case() {
        let location = Location {
            id: "1".into(),
            name: "Park".into(),
            description: "Riverside".into(),
            image_url: "http://x/1.png".into(),
            timestamp: "2024-05-01T10:00:00Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["imageUrl"], "http://x/1.png");
        assert_eq!(value["timestamp"], "2024-05-01T10:00:00Z");
        assert!(value.get("image_url").is_none());
    }

    #[test]
    fn test_location_accepts_created_at_alias() {
        let location: Location = serde_json::from_value(json!({
            "id": "1",
            "name": "Park",
            "description": "",
            "imageUrl": "http://x/1.png",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(location.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let input: LocationInput = serde_json::from_value(json!({
            "name": "Park",
            "imageUrl": "http://x/1.png"
        }))
        .unwrap();

        let err = input.into_fields().unwrap_err();
        assert!(matches!(err, LocationError::Validation(msg) if msg.contains("description")));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = LocationInput::new("", "d", "http://x").into_fields().unwrap_err();
        assert!(matches!(err, LocationError::Validation(_)));
    }

    #[test]
    fn test_empty_description_is_allowed() {
        let fields = LocationInput::new("Park", "", "http://x").into_fields().unwrap();
        assert_eq!(fields.description, "");
    }

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size(Some(0)), 1);
        assert_eq!(page_size(Some(1000)), MAX_PAGE_SIZE);
        assert_eq!(page_size(Some(7)), 7);
    }

    #[test]
    fn test_page_omits_absent_cursor() {
        let page = LocationPage {
            items: vec![],
            next_cursor: None,
        };
        let value = serde_json::to_value(page).unwrap();
        assert_eq!(value, json!({ "items": [] }));
    }

    #[test]
    fn test_validate_id_length() {
        assert!(validate_id("abc").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id(&"x".repeat(MAX_ID_LEN + 1)).is_err());
    }
}
