//! Remote app-definition API client.
//!
//! The engine only needs two operations, create and update; everything
//! else about the transport lives behind the [`FieldBackend`] trait so
//! tests can substitute a recording backend.

use crate::error::{FieldsmithError, FieldsmithResult};
use crate::types::{FieldRow, RunConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default base URL of the public app-definition API.
pub const DEFAULT_ENDPOINT: &str = "https://api-public-v3.clappia.com/appdefinitionv2";

/// Seam between the engine and the remote system.
pub trait FieldBackend {
    /// Create the field and return the identifier the remote system
    /// assigned to it.
    fn create_field(&self, row: &FieldRow) -> FieldsmithResult<String>;

    /// Re-submit the field's attributes against an existing identifier.
    fn update_field(&self, field_name: &str, row: &FieldRow) -> FieldsmithResult<()>;
}

impl<B: FieldBackend + ?Sized> FieldBackend for &B {
    fn create_field(&self, row: &FieldRow) -> FieldsmithResult<String> {
        (**self).create_field(row)
    }

    fn update_field(&self, field_name: &str, row: &FieldRow) -> FieldsmithResult<()> {
        (**self).update_field(field_name, row)
    }
}

/// Request body shared by `addField` and `editField`.
///
/// Attributes are type-conditional: options only for selector types, the
/// formula only for calculation fields, file constraints only for file
/// uploads. `field_name` is present only on update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldPayload<'a> {
    app_id: &'a str,
    workplace_id: &'a str,
    requesting_user_email_address: &'a str,
    section_index: u32,
    field_index: u32,
    field_type: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    formula: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_file_types: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_condition: Option<&'a str>,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFieldResponse {
    field_name: String,
}

/// HTTP implementation of [`FieldBackend`] over the platform's REST API.
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    config: RunConfig,
}

impl HttpBackend {
    pub fn new(config: RunConfig) -> FieldsmithResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FieldsmithError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn payload<'a>(&'a self, row: &'a FieldRow, field_name: Option<&'a str>) -> FieldPayload<'a> {
        FieldPayload {
            app_id: &self.config.app_id,
            workplace_id: &self.config.workplace_id,
            requesting_user_email_address: &self.config.requesting_user,
            // Templates carry 1-based placement; the wire is 0-based.
            section_index: row.section_index.saturating_sub(1),
            field_index: row.field_index.saturating_sub(1),
            field_type: row.field_type.as_wire(),
            label: &row.label,
            formula: if row.field_type.is_calculation() {
                row.formula.as_deref()
            } else {
                None
            },
            options: if row.field_type.has_options() {
                Some(&row.options)
            } else {
                None
            },
            allowed_file_types: if row.field_type.is_file_upload() {
                Some(&row.allowed_file_types)
            } else {
                None
            },
            display_condition: row.display_condition.as_deref(),
            required: row.required,
            field_name,
        }
    }

    fn post<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        payload: &FieldPayload,
    ) -> FieldsmithResult<T> {
        let url = format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            operation
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(payload)
            .send()
            .map_err(|e| FieldsmithError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FieldsmithError::RemoteCall(format!(
                "{operation} returned {status}: {body}"
            )));
        }

        response.json().map_err(|e| {
            FieldsmithError::RemoteCall(format!("{operation} returned an unreadable body: {e}"))
        })
    }
}

impl FieldBackend for HttpBackend {
    fn create_field(&self, row: &FieldRow) -> FieldsmithResult<String> {
        let payload = self.payload(row, None);
        let response: CreateFieldResponse = self.post("addField", &payload)?;
        Ok(response.field_name)
    }

    fn update_field(&self, field_name: &str, row: &FieldRow) -> FieldsmithResult<()> {
        let payload = self.payload(row, Some(field_name));
        let _: serde_json::Value = self.post("editField", &payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    fn config() -> RunConfig {
        RunConfig {
            app_id: "APP123".to_string(),
            workplace_id: "WP456".to_string(),
            api_key: "secret".to_string(),
            requesting_user: "ops@example.com".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    fn dropdown_row() -> FieldRow {
        FieldRow {
            index: 1,
            section_index: 1,
            field_index: 2,
            field_type: FieldType::Dropdown,
            label: "Department".to_string(),
            options: vec!["HR".to_string(), "Engineering".to_string()],
            formula: None,
            display_condition: None,
            allowed_file_types: Vec::new(),
            required: true,
            field_name: None,
        }
    }

    #[test]
    fn test_payload_shifts_placement_to_zero_based() {
        let backend = HttpBackend::new(config()).unwrap();
        let row = dropdown_row();
        let payload = backend.payload(&row, None);

        assert_eq!(payload.section_index, 0);
        assert_eq!(payload.field_index, 1);
    }

    #[test]
    fn test_payload_is_type_conditional() {
        let backend = HttpBackend::new(config()).unwrap();

        let dropdown = dropdown_row();
        let payload = backend.payload(&dropdown, None);
        assert_eq!(payload.options, Some(&dropdown.options[..]));
        assert!(payload.formula.is_none());
        assert!(payload.allowed_file_types.is_none());

        let mut calc = dropdown_row();
        calc.field_type = FieldType::CalculationsAndLogic;
        calc.options = Vec::new();
        calc.formula = Some("{f1}*12".to_string());
        let payload = backend.payload(&calc, None);
        assert_eq!(payload.formula, Some("{f1}*12"));
        assert!(payload.options.is_none());
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let backend = HttpBackend::new(config()).unwrap();
        let row = dropdown_row();
        let json = serde_json::to_value(backend.payload(&row, Some("dept01"))).unwrap();

        assert_eq!(json["appId"], "APP123");
        assert_eq!(json["workplaceId"], "WP456");
        assert_eq!(json["requestingUserEmailAddress"], "ops@example.com");
        assert_eq!(json["fieldType"], "dropdown");
        assert_eq!(json["fieldName"], "dept01");
        assert_eq!(json["options"][1], "Engineering");
        assert!(json.get("formula").is_none());
        assert!(json.get("allowedFileTypes").is_none());
    }

    #[test]
    fn test_create_response_reads_field_name() {
        let response: CreateFieldResponse =
            serde_json::from_str(r#"{"fieldName": "department01"}"#).unwrap();
        assert_eq!(response.field_name, "department01");
    }
}
