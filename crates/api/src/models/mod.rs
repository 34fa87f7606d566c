//! Domain models for the directory.
//!
//! Each module holds the entity as it is returned to clients, the shapes
//! used by `find_one` to embed related rows, and the create/update inputs
//! accepted by the HTTP surface. JSON field names are camelCase.

pub mod address;
pub mod city;
pub mod client;
pub mod location;
pub mod state;

pub use address::{
    Address, AddressDetail, AddressWithLocation, CreateAddressInput, UpdateAddressInput,
};
pub use city::{
    City, CityChanges, CityWithLocations, CityWithState, CreateCityInput, NewCity, UpdateCityInput,
};
pub use client::{Client, ClientWithAddresses, CreateClientInput, UpdateClientInput};
pub use location::{
    CreateLocationInput, Location, LocationChanges, LocationPlacement, LocationWithCity,
    NewLocation, UpdateLocationInput,
};
pub use state::{
    CreateStateInput, NewState, State, StateChanges, StateWithCities, UpdateStateInput,
};
