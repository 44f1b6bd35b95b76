//! Geographic lookup tables and per-municipality weather.

mod geography_model;
mod geography_service;
mod geography_traits;

#[cfg(test)]
mod geography_service_tests;

pub use geography_model::{
    Municipality, MunicipalityFilter, MunicipalityUpdate, NewMunicipality, NewProvince,
    NewRegion, Province, ProvinceFilter, ProvinceUpdate, Region, RegionFilter, RegionUpdate,
    WeatherObservation, WeatherReading,
};
pub use geography_service::GeographyService;
pub use geography_traits::{
    GeographyServiceTrait, MunicipalityRepositoryTrait, ProvinceRepositoryTrait,
    RegionRepositoryTrait,
};
