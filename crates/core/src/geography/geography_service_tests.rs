use super::*;
use crate::access::{Actor, Role};
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockGeography {
    regions: Mutex<Vec<Region>>,
    provinces: Mutex<Vec<Province>>,
    municipalities: Mutex<Vec<Municipality>>,
    weather: Mutex<Vec<WeatherObservation>>,
}

#[async_trait]
impl RegionRepositoryTrait for MockGeography {
    fn get_by_id(&self, region_id: &str) -> Result<Region> {
        self.regions
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == region_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Region", region_id))
    }

    fn list(&self, _filter: &RegionFilter, page: PageRequest) -> Result<Paginated<Region>> {
        Ok(Paginated::from_vec(self.regions.lock().unwrap().clone(), page))
    }

    fn count_provinces(&self, region_id: &str) -> Result<i64> {
        Ok(self
            .provinces
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.region_id == region_id)
            .count() as i64)
    }

    async fn create(&self, new_region: NewRegion) -> Result<Region> {
        let now = Utc::now().naive_utc();
        let mut regions = self.regions.lock().unwrap();
        let region = Region {
            id: format!("region-{}", regions.len() + 1),
            name: new_region.name,
            code: new_region.code,
            created_at: now,
            updated_at: now,
        };
        regions.push(region.clone());
        Ok(region)
    }

    async fn update(&self, region: Region) -> Result<Region> {
        Ok(region)
    }

    async fn delete(&self, region_id: &str) -> Result<usize> {
        let mut regions = self.regions.lock().unwrap();
        let before = regions.len();
        regions.retain(|r| r.id != region_id);
        Ok(before - regions.len())
    }
}

#[async_trait]
impl ProvinceRepositoryTrait for MockGeography {
    fn get_by_id(&self, province_id: &str) -> Result<Province> {
        self.provinces
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == province_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Province", province_id))
    }

    fn list(&self, filter: &ProvinceFilter, page: PageRequest) -> Result<Paginated<Province>> {
        let items: Vec<Province> = self
            .provinces
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.region_id.as_deref().map_or(true, |r| p.region_id == r))
            .cloned()
            .collect();
        Ok(Paginated::from_vec(items, page))
    }

    fn count_municipalities(&self, province_id: &str) -> Result<i64> {
        Ok(self
            .municipalities
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.province_id == province_id)
            .count() as i64)
    }

    async fn create(&self, new_province: NewProvince) -> Result<Province> {
        let now = Utc::now().naive_utc();
        let mut provinces = self.provinces.lock().unwrap();
        let province = Province {
            id: format!("province-{}", provinces.len() + 1),
            region_id: new_province.region_id,
            name: new_province.name,
            code: new_province.code,
            created_at: now,
            updated_at: now,
        };
        provinces.push(province.clone());
        Ok(province)
    }

    async fn update(&self, province: Province) -> Result<Province> {
        Ok(province)
    }

    async fn delete(&self, province_id: &str) -> Result<usize> {
        let mut provinces = self.provinces.lock().unwrap();
        let before = provinces.len();
        provinces.retain(|p| p.id != province_id);
        Ok(before - provinces.len())
    }
}

#[async_trait]
impl MunicipalityRepositoryTrait for MockGeography {
    fn get_by_id(&self, municipality_id: &str) -> Result<Municipality> {
        self.municipalities
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == municipality_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Municipality", municipality_id))
    }

    fn list(
        &self,
        _filter: &MunicipalityFilter,
        page: PageRequest,
    ) -> Result<Paginated<Municipality>> {
        Ok(Paginated::from_vec(
            self.municipalities.lock().unwrap().clone(),
            page,
        ))
    }

    fn get_weather(&self, municipality_id: &str) -> Result<Option<WeatherObservation>> {
        Ok(self
            .weather
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.municipality_id == municipality_id)
            .cloned())
    }

    async fn create(&self, new_municipality: NewMunicipality) -> Result<Municipality> {
        let now = Utc::now().naive_utc();
        let mut municipalities = self.municipalities.lock().unwrap();
        let municipality = Municipality {
            id: format!("municipality-{}", municipalities.len() + 1),
            province_id: new_municipality.province_id,
            name: new_municipality.name,
            postal_code: new_municipality.postal_code,
            latitude: new_municipality.latitude,
            longitude: new_municipality.longitude,
            created_at: now,
            updated_at: now,
        };
        municipalities.push(municipality.clone());
        Ok(municipality)
    }

    async fn update(&self, municipality: Municipality) -> Result<Municipality> {
        Ok(municipality)
    }

    async fn delete(&self, municipality_id: &str) -> Result<usize> {
        let mut municipalities = self.municipalities.lock().unwrap();
        let before = municipalities.len();
        municipalities.retain(|m| m.id != municipality_id);
        Ok(before - municipalities.len())
    }

    async fn upsert_weather(
        &self,
        municipality_id: &str,
        reading: WeatherReading,
    ) -> Result<WeatherObservation> {
        let now = Utc::now().naive_utc();
        let observation = WeatherObservation {
            municipality_id: municipality_id.to_string(),
            temperature_c: reading.temperature_c,
            humidity: reading.humidity,
            cloud_cover: reading.cloud_cover,
            wind_speed_kmh: reading.wind_speed_kmh,
            solar_irradiance: reading.solar_irradiance,
            observed_at: reading.observed_at.unwrap_or(now),
            updated_at: now,
        };
        let mut weather = self.weather.lock().unwrap();
        weather.retain(|w| w.municipality_id != municipality_id);
        weather.push(observation.clone());
        Ok(observation)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin, None)
}

fn setup() -> GeographyService {
    let store = Arc::new(MockGeography::default());
    GeographyService::new(store.clone(), store.clone(), store)
}

fn reading(temperature: rust_decimal::Decimal) -> WeatherReading {
    WeatherReading {
        temperature_c: temperature,
        humidity: dec!(40),
        cloud_cover: dec!(15),
        wind_speed_kmh: dec!(8),
        solar_irradiance: dec!(720),
        observed_at: None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_region_with_provinces_cannot_be_deleted() {
    let service = setup();
    let region = service
        .create_region(
            &admin(),
            NewRegion {
                name: "Aragón".to_string(),
                code: "AR".to_string(),
            },
        )
        .await
        .unwrap();
    service
        .create_province(
            &admin(),
            NewProvince {
                region_id: region.id.clone(),
                name: "Huesca".to_string(),
                code: "HU".to_string(),
            },
        )
        .await
        .unwrap();

    let result = service.delete_region(&admin(), &region.id).await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_province_with_municipalities_cannot_be_deleted() {
    let service = setup();
    let region = service
        .create_region(
            &admin(),
            NewRegion {
                name: "Galicia".to_string(),
                code: "GA".to_string(),
            },
        )
        .await
        .unwrap();
    let province = service
        .create_province(
            &admin(),
            NewProvince {
                region_id: region.id.clone(),
                name: "Lugo".to_string(),
                code: "LU".to_string(),
            },
        )
        .await
        .unwrap();
    let town = service
        .create_municipality(
            &admin(),
            NewMunicipality {
                province_id: province.id.clone(),
                name: "Monforte de Lemos".to_string(),
                postal_code: Some("27400".to_string()),
                latitude: None,
                longitude: None,
            },
        )
        .await
        .unwrap();

    let result = service.delete_province(&admin(), &province.id).await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));

    // Children first, then each parent becomes deletable.
    service.delete_municipality(&admin(), &town.id).await.unwrap();
    service.delete_province(&admin(), &province.id).await.unwrap();
    service.delete_region(&admin(), &region.id).await.unwrap();
    assert!(service.get_region(&region.id).unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_province_requires_existing_region() {
    let service = setup();
    let result = service
        .create_province(
            &admin(),
            NewProvince {
                region_id: "missing".to_string(),
                name: "Teruel".to_string(),
                code: "TE".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_weather_upsert_keeps_one_row_per_municipality() {
    let service = setup();
    let region = service
        .create_region(
            &admin(),
            NewRegion {
                name: "Aragón".to_string(),
                code: "AR".to_string(),
            },
        )
        .await
        .unwrap();
    let province = service
        .create_province(
            &admin(),
            NewProvince {
                region_id: region.id,
                name: "Zaragoza".to_string(),
                code: "Z".to_string(),
            },
        )
        .await
        .unwrap();
    let town = service
        .create_municipality(
            &admin(),
            NewMunicipality {
                province_id: province.id,
                name: "Zaragoza".to_string(),
                postal_code: Some("50001".to_string()),
                latitude: None,
                longitude: None,
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        service.latest_weather(&town.id),
        Err(Error::NotFound(_))
    ));

    service
        .record_weather(&admin(), &town.id, reading(dec!(18)))
        .await
        .unwrap();
    service
        .record_weather(&admin(), &town.id, reading(dec!(24.5)))
        .await
        .unwrap();

    let latest = service.latest_weather(&town.id).unwrap();
    assert_eq!(latest.temperature_c, dec!(24.5));
}

#[tokio::test]
async fn test_weather_writes_need_admin() {
    let service = setup();
    let agent = Actor::new("agent-1", Role::Agent, None);
    let result = service
        .record_weather(&agent, "municipality-1", reading(dec!(20)))
        .await;
    assert!(matches!(result, Err(Error::PermissionDenied(_))));
}
