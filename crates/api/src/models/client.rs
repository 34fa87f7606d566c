//! Client records.

use serde::{Deserialize, Serialize};

use client_directory_core::{ClientId, Email};

use super::address::AddressWithLocation;

/// A client. `status` marks whether the client is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub last_name: String,
    /// Mexican tax id (Registro Federal de Contribuyentes).
    #[serde(rename = "RFC")]
    pub rfc: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub status: bool,
}

/// A client with every address it owns, each placed in its location, city
/// and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientWithAddresses {
    #[serde(flatten)]
    pub client: Client,
    pub addresses: Vec<AddressWithLocation>,
}

/// Body of `POST /clients`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientInput {
    pub name: String,
    pub last_name: String,
    #[serde(rename = "RFC", default)]
    pub rfc: Option<String>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "active")]
    pub status: bool,
}

/// Body of `PATCH /clients/{id}`.
///
/// For the nullable fields, the outer `Option` records whether the field was
/// sent at all; `Some(None)` clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientInput {
    pub name: Option<String>,
    pub last_name: Option<String>,
    #[serde(rename = "RFC", default, with = "serde_with::rust::double_option")]
    pub rfc: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub email: Option<Option<Email>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,
    pub status: Option<bool>,
}

const fn active() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_defaults_status_to_active() {
        let input: CreateClientInput =
            serde_json::from_str(r#"{"name":"Ana","lastName":"López"}"#).unwrap();
        assert!(input.status);
        assert!(input.rfc.is_none());
        assert!(input.email.is_none());
    }

    #[test]
    fn test_create_input_reads_rfc_and_email() {
        let input: CreateClientInput = serde_json::from_str(
            r#"{"name":"Ana","lastName":"López","RFC":"LOAA800101XX0","email":"ana@example.mx","status":false}"#,
        )
        .unwrap();
        assert_eq!(input.rfc.as_deref(), Some("LOAA800101XX0"));
        assert_eq!(input.email.unwrap().as_str(), "ana@example.mx");
        assert!(!input.status);
    }

    #[test]
    fn test_create_input_rejects_bad_email() {
        let result = serde_json::from_str::<CreateClientInput>(
            r#"{"name":"Ana","lastName":"López","email":"not-an-email"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_input_tells_null_from_absent() {
        let input: UpdateClientInput =
            serde_json::from_str(r#"{"RFC":null,"phone":"2221234567"}"#).unwrap();
        assert_eq!(input.rfc, Some(None));
        assert_eq!(input.phone, Some(Some("2221234567".to_string())));
        assert!(input.email.is_none());
        assert!(input.name.is_none());
    }

    #[test]
    fn test_client_serializes_camel_case() {
        let client = Client {
            id: ClientId::new(1),
            name: "Ana".to_string(),
            last_name: "López".to_string(),
            rfc: None,
            email: None,
            phone: Some("2221234567".to_string()),
            status: true,
        };
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["lastName"], "López");
        assert!(json["RFC"].is_null());
        assert_eq!(json["phone"], "2221234567");
    }
}
