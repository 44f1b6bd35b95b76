//! Regions, provinces, municipalities and their latest weather observation.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Region {
    pub fn apply(&mut self, update: RegionUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.code {
            self.code = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_named_code(&self.name, &self.code)
    }
}

fn validate_named_code(name: &str, code: &str) -> Result<()> {
    let mut v = Validator::new();
    v.required("name", name).max_len("name", name, 255);
    v.required("code", code).max_len("code", code, 10);
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegion {
    pub name: String,
    pub code: String,
}

impl NewRegion {
    pub fn validate(&self) -> Result<()> {
        validate_named_code(&self.name, &self.code)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionFilter {
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    pub region_id: String,
    pub name: String,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Province {
    pub fn apply(&mut self, update: ProvinceUpdate) {
        if let Some(v) = update.region_id {
            self.region_id = v;
        }
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.code {
            self.code = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_named_code(&self.name, &self.code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProvince {
    pub region_id: String,
    pub name: String,
    pub code: String,
}

impl NewProvince {
    pub fn validate(&self) -> Result<()> {
        validate_named_code(&self.name, &self.code)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvinceUpdate {
    pub region_id: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvinceFilter {
    pub region_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: String,
    pub province_id: String,
    pub name: String,
    pub postal_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Municipality {
    pub fn apply(&mut self, update: MunicipalityUpdate) {
        if let Some(v) = update.province_id {
            self.province_id = v;
        }
        if let Some(v) = update.name {
            self.name = v;
        }
        if update.postal_code.is_some() {
            self.postal_code = update.postal_code;
        }
        if update.latitude.is_some() {
            self.latitude = update.latitude;
        }
        if update.longitude.is_some() {
            self.longitude = update.longitude;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_municipality(
            &self.name,
            self.postal_code.as_deref(),
            self.latitude,
            self.longitude,
        )
    }
}

fn validate_municipality(
    name: &str,
    postal_code: Option<&str>,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
) -> Result<()> {
    let mut v = Validator::new();
    v.required("name", name).max_len("name", name, 255);
    if let Some(code) = postal_code {
        v.check(
            code.len() == 5 && code.chars().all(|c| c.is_ascii_digit()),
            "postal_code",
            "The postal_code must be 5 digits.",
        );
    }
    if let Some(lat) = latitude {
        v.between("latitude", lat, dec!(-90), dec!(90));
    }
    if let Some(lng) = longitude {
        v.between("longitude", lng, dec!(-180), dec!(180));
    }
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMunicipality {
    pub province_id: String,
    pub name: String,
    pub postal_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl NewMunicipality {
    pub fn validate(&self) -> Result<()> {
        validate_municipality(
            &self.name,
            self.postal_code.as_deref(),
            self.latitude,
            self.longitude,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MunicipalityUpdate {
    pub province_id: Option<String>,
    pub name: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MunicipalityFilter {
    pub province_id: Option<String>,
    /// Matches the name or the postal code.
    pub search: Option<String>,
}

/// Latest observation for a municipality; at most one row each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub municipality_id: String,
    pub temperature_c: Decimal,
    pub humidity: Decimal,
    pub cloud_cover: Decimal,
    pub wind_speed_kmh: Decimal,
    /// W/m².
    pub solar_irradiance: Decimal,
    pub observed_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Body of `PUT /municipalities/{id}/weather`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: Decimal,
    pub humidity: Decimal,
    pub cloud_cover: Decimal,
    pub wind_speed_kmh: Decimal,
    pub solar_irradiance: Decimal,
    pub observed_at: Option<NaiveDateTime>,
}

impl WeatherReading {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.between("temperature_c", self.temperature_c, dec!(-90), dec!(60));
        v.between("humidity", self.humidity, dec!(0), dec!(100));
        v.between("cloud_cover", self.cloud_cover, dec!(0), dec!(100));
        v.non_negative("wind_speed_kmh", self.wind_speed_kmh);
        v.non_negative("solar_irradiance", self.solar_irradiance);
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_municipality_rules() {
        let mut m = NewMunicipality {
            province_id: "p1".to_string(),
            name: "Zaragoza".to_string(),
            postal_code: Some("50001".to_string()),
            latitude: Some(dec!(41.6488)),
            longitude: Some(dec!(-0.8891)),
        };
        assert!(m.validate().is_ok());

        m.postal_code = Some("5001A".to_string());
        m.latitude = Some(dec!(91));
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_weather_ranges() {
        let reading = WeatherReading {
            temperature_c: dec!(21.5),
            humidity: dec!(130),
            cloud_cover: dec!(10),
            wind_speed_kmh: dec!(12),
            solar_irradiance: dec!(640),
            observed_at: None,
        };
        assert!(reading.validate().is_err());
    }
}
