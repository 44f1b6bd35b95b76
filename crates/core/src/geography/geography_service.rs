use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::geography_model::{
    Municipality, MunicipalityFilter, MunicipalityUpdate, NewMunicipality, NewProvince,
    NewRegion, Province, ProvinceFilter, ProvinceUpdate, Region, RegionFilter, RegionUpdate,
    WeatherObservation, WeatherReading,
};
use super::geography_traits::{
    GeographyServiceTrait, MunicipalityRepositoryTrait, ProvinceRepositoryTrait,
    RegionRepositoryTrait,
};
use crate::access::{Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use crate::validation::FieldErrors;

pub struct GeographyService {
    regions: Arc<dyn RegionRepositoryTrait>,
    provinces: Arc<dyn ProvinceRepositoryTrait>,
    municipalities: Arc<dyn MunicipalityRepositoryTrait>,
}

impl GeographyService {
    pub fn new(
        regions: Arc<dyn RegionRepositoryTrait>,
        provinces: Arc<dyn ProvinceRepositoryTrait>,
        municipalities: Arc<dyn MunicipalityRepositoryTrait>,
    ) -> Self {
        Self {
            regions,
            provinces,
            municipalities,
        }
    }
}

/// Turns a missing parent row into a 422 on the referencing field.
fn ensure_reference<T>(lookup: Result<T>, field: &str) -> Result<()> {
    match lookup {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => {
            let mut errors = FieldErrors::default();
            errors.add(field, format!("The selected {} is invalid.", field));
            Err(errors.into())
        }
        Err(e) => Err(e),
    }
}

#[async_trait]
impl GeographyServiceTrait for GeographyService {
    fn get_region(&self, region_id: &str) -> Result<Region> {
        self.regions.get_by_id(region_id)
    }

    fn list_regions(&self, filter: RegionFilter, page: PageRequest) -> Result<Paginated<Region>> {
        self.regions.list(&filter, page)
    }

    async fn create_region(&self, actor: &Actor, new_region: NewRegion) -> Result<Region> {
        actor.require(Role::Admin)?;
        new_region.validate()?;
        self.regions.create(new_region).await
    }

    async fn update_region(
        &self,
        actor: &Actor,
        region_id: &str,
        update: RegionUpdate,
    ) -> Result<Region> {
        actor.require(Role::Admin)?;
        let mut region = self.regions.get_by_id(region_id)?;
        region.apply(update);
        region.validate()?;
        self.regions.update(region).await
    }

    async fn delete_region(&self, actor: &Actor, region_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.regions.get_by_id(region_id)?;
        let provinces = self.regions.count_provinces(region_id)?;
        if provinces > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Region '{}' still has {} province(s)",
                region_id, provinces
            )));
        }
        self.regions.delete(region_id).await?;
        Ok(())
    }

    fn get_province(&self, province_id: &str) -> Result<Province> {
        self.provinces.get_by_id(province_id)
    }

    fn list_provinces(
        &self,
        filter: ProvinceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Province>> {
        self.provinces.list(&filter, page)
    }

    async fn create_province(&self, actor: &Actor, new_province: NewProvince) -> Result<Province> {
        actor.require(Role::Admin)?;
        new_province.validate()?;
        ensure_reference(self.regions.get_by_id(&new_province.region_id), "region_id")?;
        self.provinces.create(new_province).await
    }

    async fn update_province(
        &self,
        actor: &Actor,
        province_id: &str,
        update: ProvinceUpdate,
    ) -> Result<Province> {
        actor.require(Role::Admin)?;
        let mut province = self.provinces.get_by_id(province_id)?;
        province.apply(update);
        province.validate()?;
        ensure_reference(self.regions.get_by_id(&province.region_id), "region_id")?;
        self.provinces.update(province).await
    }

    async fn delete_province(&self, actor: &Actor, province_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.provinces.get_by_id(province_id)?;
        let municipalities = self.provinces.count_municipalities(province_id)?;
        if municipalities > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Province '{}' still has {} municipality(ies)",
                province_id, municipalities
            )));
        }
        self.provinces.delete(province_id).await?;
        Ok(())
    }

    fn get_municipality(&self, municipality_id: &str) -> Result<Municipality> {
        self.municipalities.get_by_id(municipality_id)
    }

    fn list_municipalities(
        &self,
        filter: MunicipalityFilter,
        page: PageRequest,
    ) -> Result<Paginated<Municipality>> {
        self.municipalities.list(&filter, page)
    }

    async fn create_municipality(
        &self,
        actor: &Actor,
        new_municipality: NewMunicipality,
    ) -> Result<Municipality> {
        actor.require(Role::Admin)?;
        new_municipality.validate()?;
        ensure_reference(
            self.provinces.get_by_id(&new_municipality.province_id),
            "province_id",
        )?;
        self.municipalities.create(new_municipality).await
    }

    async fn update_municipality(
        &self,
        actor: &Actor,
        municipality_id: &str,
        update: MunicipalityUpdate,
    ) -> Result<Municipality> {
        actor.require(Role::Admin)?;
        let mut municipality = self.municipalities.get_by_id(municipality_id)?;
        municipality.apply(update);
        municipality.validate()?;
        ensure_reference(
            self.provinces.get_by_id(&municipality.province_id),
            "province_id",
        )?;
        self.municipalities.update(municipality).await
    }

    async fn delete_municipality(&self, actor: &Actor, municipality_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.municipalities.get_by_id(municipality_id)?;
        self.municipalities.delete(municipality_id).await?;
        Ok(())
    }

    fn latest_weather(&self, municipality_id: &str) -> Result<WeatherObservation> {
        self.municipalities.get_by_id(municipality_id)?;
        self.municipalities
            .get_weather(municipality_id)?
            .ok_or_else(|| Error::not_found("Weather observation", municipality_id))
    }

    async fn record_weather(
        &self,
        actor: &Actor,
        municipality_id: &str,
        mut reading: WeatherReading,
    ) -> Result<WeatherObservation> {
        actor.require(Role::Admin)?;
        reading.validate()?;
        self.municipalities.get_by_id(municipality_id)?;
        reading.observed_at.get_or_insert_with(|| Utc::now().naive_utc());
        let observation = self
            .municipalities
            .upsert_weather(municipality_id, reading)
            .await?;
        info!("Recorded weather for municipality {}", municipality_id);
        Ok(observation)
    }
}
