//! Database models for regions, provinces, municipalities and weather.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::geography::{
    Municipality, NewMunicipality, NewProvince, NewRegion, Province, Region, WeatherObservation,
    WeatherReading,
};

use crate::utils::{decimal_to_text, new_id, parse_decimal, parse_optional_decimal};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::regions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RegionDB {
    pub id: String,
    pub name: String,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<RegionDB> for Region {
    fn from(db: RegionDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            code: db.code,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Region> for RegionDB {
    fn from(r: Region) -> Self {
        Self {
            id: r.id,
            name: r.name,
            code: r.code,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<NewRegion> for RegionDB {
    fn from(new: NewRegion) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            name: new.name,
            code: new.code,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::provinces)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProvinceDB {
    pub id: String,
    pub region_id: String,
    pub name: String,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProvinceDB> for Province {
    fn from(db: ProvinceDB) -> Self {
        Self {
            id: db.id,
            region_id: db.region_id,
            name: db.name,
            code: db.code,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Province> for ProvinceDB {
    fn from(p: Province) -> Self {
        Self {
            id: p.id,
            region_id: p.region_id,
            name: p.name,
            code: p.code,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<NewProvince> for ProvinceDB {
    fn from(new: NewProvince) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            region_id: new.region_id,
            name: new.name,
            code: new.code,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::municipalities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct MunicipalityDB {
    pub id: String,
    pub province_id: String,
    pub name: String,
    pub postal_code: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<MunicipalityDB> for Municipality {
    fn from(db: MunicipalityDB) -> Self {
        Self {
            latitude: parse_optional_decimal(db.latitude.as_deref(), "municipalities.latitude"),
            longitude: parse_optional_decimal(db.longitude.as_deref(), "municipalities.longitude"),
            id: db.id,
            province_id: db.province_id,
            name: db.name,
            postal_code: db.postal_code,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Municipality> for MunicipalityDB {
    fn from(m: Municipality) -> Self {
        Self {
            latitude: m.latitude.map(decimal_to_text),
            longitude: m.longitude.map(decimal_to_text),
            id: m.id,
            province_id: m.province_id,
            name: m.name,
            postal_code: m.postal_code,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<NewMunicipality> for MunicipalityDB {
    fn from(new: NewMunicipality) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            province_id: new.province_id,
            name: new.name,
            postal_code: new.postal_code,
            latitude: new.latitude.map(decimal_to_text),
            longitude: new.longitude.map(decimal_to_text),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::weather_observations)]
#[diesel(primary_key(municipality_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WeatherObservationDB {
    pub municipality_id: String,
    pub temperature_c: String,
    pub humidity: String,
    pub cloud_cover: String,
    pub wind_speed_kmh: String,
    pub solar_irradiance: String,
    pub observed_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WeatherObservationDB {
    pub fn from_reading(municipality_id: String, reading: WeatherReading) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            municipality_id,
            temperature_c: decimal_to_text(reading.temperature_c),
            humidity: decimal_to_text(reading.humidity),
            cloud_cover: decimal_to_text(reading.cloud_cover),
            wind_speed_kmh: decimal_to_text(reading.wind_speed_kmh),
            solar_irradiance: decimal_to_text(reading.solar_irradiance),
            observed_at: reading.observed_at.unwrap_or(now),
            updated_at: now,
        }
    }
}

impl From<WeatherObservationDB> for WeatherObservation {
    fn from(db: WeatherObservationDB) -> Self {
        Self {
            temperature_c: parse_decimal(&db.temperature_c, "weather_observations.temperature_c"),
            humidity: parse_decimal(&db.humidity, "weather_observations.humidity"),
            cloud_cover: parse_decimal(&db.cloud_cover, "weather_observations.cloud_cover"),
            wind_speed_kmh: parse_decimal(
                &db.wind_speed_kmh,
                "weather_observations.wind_speed_kmh",
            ),
            solar_irradiance: parse_decimal(
                &db.solar_irradiance,
                "weather_observations.solar_irradiance",
            ),
            municipality_id: db.municipality_id,
            observed_at: db.observed_at,
            updated_at: db.updated_at,
        }
    }
}
