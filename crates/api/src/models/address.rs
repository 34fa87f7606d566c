//! Client addresses.

use serde::{Deserialize, Serialize};

use client_directory_core::{AddressId, ClientId, LocationId};

use super::client::Client;
use super::location::LocationPlacement;

/// A postal address owned by a client and placed in a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    /// Exterior number.
    pub out_num: String,
    /// Interior number (apartment, suite).
    pub int_num: Option<String>,
    pub zip_code: String,
    pub client_id: ClientId,
    pub location_id: LocationId,
}

/// An address with its location, city and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressWithLocation {
    #[serde(flatten)]
    pub address: Address,
    pub location: LocationPlacement,
}

/// An address with its owner and full placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetail {
    #[serde(flatten)]
    pub address: Address,
    pub client: Client,
    pub location: LocationPlacement,
}

/// Body of `POST /addresses`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressInput {
    pub street: String,
    pub out_num: String,
    #[serde(default)]
    pub int_num: Option<String>,
    pub zip_code: String,
    pub client_id: ClientId,
    pub location_id: LocationId,
}

/// Body of `PATCH /addresses/{id}`. `"intNum": null` clears the interior
/// number; leaving it out keeps it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressInput {
    pub street: Option<String>,
    pub out_num: Option<String>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub int_num: Option<Option<String>>,
    pub zip_code: Option<String>,
    pub client_id: Option<ClientId>,
    pub location_id: Option<LocationId>,
}
