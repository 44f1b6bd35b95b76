use async_trait::async_trait;

use super::geography_model::{
    Municipality, MunicipalityFilter, MunicipalityUpdate, NewMunicipality, NewProvince,
    NewRegion, Province, ProvinceFilter, ProvinceUpdate, Region, RegionFilter, RegionUpdate,
    WeatherObservation, WeatherReading,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait RegionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, region_id: &str) -> Result<Region>;
    /// Ordered by name.
    fn list(&self, filter: &RegionFilter, page: PageRequest) -> Result<Paginated<Region>>;
    fn count_provinces(&self, region_id: &str) -> Result<i64>;
    async fn create(&self, new_region: NewRegion) -> Result<Region>;
    async fn update(&self, region: Region) -> Result<Region>;
    async fn delete(&self, region_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait ProvinceRepositoryTrait: Send + Sync {
    fn get_by_id(&self, province_id: &str) -> Result<Province>;
    fn list(&self, filter: &ProvinceFilter, page: PageRequest) -> Result<Paginated<Province>>;
    fn count_municipalities(&self, province_id: &str) -> Result<i64>;
    async fn create(&self, new_province: NewProvince) -> Result<Province>;
    async fn update(&self, province: Province) -> Result<Province>;
    async fn delete(&self, province_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait MunicipalityRepositoryTrait: Send + Sync {
    fn get_by_id(&self, municipality_id: &str) -> Result<Municipality>;
    fn list(
        &self,
        filter: &MunicipalityFilter,
        page: PageRequest,
    ) -> Result<Paginated<Municipality>>;
    fn get_weather(&self, municipality_id: &str) -> Result<Option<WeatherObservation>>;
    async fn create(&self, new_municipality: NewMunicipality) -> Result<Municipality>;
    async fn update(&self, municipality: Municipality) -> Result<Municipality>;
    /// Removes the municipality together with its weather row.
    async fn delete(&self, municipality_id: &str) -> Result<usize>;
    /// Replaces the stored observation, inserting it when missing.
    async fn upsert_weather(
        &self,
        municipality_id: &str,
        reading: WeatherReading,
    ) -> Result<WeatherObservation>;
}

/// Public lookups plus admin-only maintenance of the geographic tables.
#[async_trait]
pub trait GeographyServiceTrait: Send + Sync {
    fn get_region(&self, region_id: &str) -> Result<Region>;
    fn list_regions(&self, filter: RegionFilter, page: PageRequest) -> Result<Paginated<Region>>;
    async fn create_region(&self, actor: &Actor, new_region: NewRegion) -> Result<Region>;
    async fn update_region(
        &self,
        actor: &Actor,
        region_id: &str,
        update: RegionUpdate,
    ) -> Result<Region>;
    async fn delete_region(&self, actor: &Actor, region_id: &str) -> Result<()>;

    fn get_province(&self, province_id: &str) -> Result<Province>;
    fn list_provinces(
        &self,
        filter: ProvinceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Province>>;
    async fn create_province(&self, actor: &Actor, new_province: NewProvince) -> Result<Province>;
    async fn update_province(
        &self,
        actor: &Actor,
        province_id: &str,
        update: ProvinceUpdate,
    ) -> Result<Province>;
    async fn delete_province(&self, actor: &Actor, province_id: &str) -> Result<()>;

    fn get_municipality(&self, municipality_id: &str) -> Result<Municipality>;
    fn list_municipalities(
        &self,
        filter: MunicipalityFilter,
        page: PageRequest,
    ) -> Result<Paginated<Municipality>>;
    async fn create_municipality(
        &self,
        actor: &Actor,
        new_municipality: NewMunicipality,
    ) -> Result<Municipality>;
    async fn update_municipality(
        &self,
        actor: &Actor,
        municipality_id: &str,
        update: MunicipalityUpdate,
    ) -> Result<Municipality>;
    async fn delete_municipality(&self, actor: &Actor, municipality_id: &str) -> Result<()>;

    fn latest_weather(&self, municipality_id: &str) -> Result<WeatherObservation>;
    async fn record_weather(
        &self,
        actor: &Actor,
        municipality_id: &str,
        reading: WeatherReading,
    ) -> Result<WeatherObservation>;
}
