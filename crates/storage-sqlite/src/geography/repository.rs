use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use energycoop_core::errors::{Error, Result};
use energycoop_core::geography::{
    Municipality, MunicipalityFilter, MunicipalityRepositoryTrait, NewMunicipality, NewProvince,
    NewRegion, Province, ProvinceFilter, ProvinceRepositoryTrait, Region, RegionFilter,
    RegionRepositoryTrait, WeatherObservation, WeatherReading,
};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::{MunicipalityDB, ProvinceDB, RegionDB, WeatherObservationDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{municipalities, provinces, regions, weather_observations};
use crate::utils::like_pattern;

pub struct RegionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RegionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl RegionRepositoryTrait for RegionRepository {
    fn get_by_id(&self, region_id: &str) -> Result<Region> {
        let mut conn = get_connection(&self.pool)?;
        regions::table
            .find(region_id)
            .select(RegionDB::as_select())
            .first::<RegionDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Region::from)
            .ok_or_else(|| Error::not_found("Region", region_id))
    }

    fn list(&self, filter: &RegionFilter, page: PageRequest) -> Result<Paginated<Region>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = regions::table.into_boxed();
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(regions::name.like(pattern.clone()).or(regions::code.like(pattern)));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(RegionDB::as_select())
            .order(regions::name.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<RegionDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Region::from).collect(),
            total,
            page,
        ))
    }

    fn count_provinces(&self, region_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        provinces::table
            .filter(provinces::region_id.eq(region_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_region: NewRegion) -> Result<Region> {
        self.writer
            .exec(move |conn| {
                let row: RegionDB = new_region.into();
                diesel::insert_into(regions::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, region: Region) -> Result<Region> {
        self.writer
            .exec(move |conn| {
                let mut row: RegionDB = region.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(regions::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Region", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, region_id: &str) -> Result<usize> {
        let region_id = region_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(regions::table.find(region_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

pub struct ProvinceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProvinceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProvinceRepositoryTrait for ProvinceRepository {
    fn get_by_id(&self, province_id: &str) -> Result<Province> {
        let mut conn = get_connection(&self.pool)?;
        provinces::table
            .find(province_id)
            .select(ProvinceDB::as_select())
            .first::<ProvinceDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Province::from)
            .ok_or_else(|| Error::not_found("Province", province_id))
    }

    fn list(&self, filter: &ProvinceFilter, page: PageRequest) -> Result<Paginated<Province>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = provinces::table.into_boxed();
            if let Some(ref region_id) = filter.region_id {
                query = query.filter(provinces::region_id.eq(region_id.clone()));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    provinces::name
                        .like(pattern.clone())
                        .or(provinces::code.like(pattern)),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(ProvinceDB::as_select())
            .order(provinces::name.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<ProvinceDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Province::from).collect(),
            total,
            page,
        ))
    }

    fn count_municipalities(&self, province_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        municipalities::table
            .filter(municipalities::province_id.eq(province_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_province: NewProvince) -> Result<Province> {
        self.writer
            .exec(move |conn| {
                let row: ProvinceDB = new_province.into();
                diesel::insert_into(provinces::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, province: Province) -> Result<Province> {
        self.writer
            .exec(move |conn| {
                let mut row: ProvinceDB = province.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(provinces::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Province", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, province_id: &str) -> Result<usize> {
        let province_id = province_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(provinces::table.find(province_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

pub struct MunicipalityRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MunicipalityRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl MunicipalityRepositoryTrait for MunicipalityRepository {
    fn get_by_id(&self, municipality_id: &str) -> Result<Municipality> {
        let mut conn = get_connection(&self.pool)?;
        municipalities::table
            .find(municipality_id)
            .select(MunicipalityDB::as_select())
            .first::<MunicipalityDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Municipality::from)
            .ok_or_else(|| Error::not_found("Municipality", municipality_id))
    }

    fn list(
        &self,
        filter: &MunicipalityFilter,
        page: PageRequest,
    ) -> Result<Paginated<Municipality>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = municipalities::table.into_boxed();
            if let Some(ref province_id) = filter.province_id {
                query = query.filter(municipalities::province_id.eq(province_id.clone()));
            }
            if let Some(ref term) = filter.search {
                let pattern = like_pattern(term);
                query = query.filter(
                    municipalities::name
                        .like(pattern.clone())
                        .or(municipalities::postal_code.like(pattern).assume_not_null()),
                );
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        let rows = create_base_query()
            .select(MunicipalityDB::as_select())
            .order(municipalities::name.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<MunicipalityDB>(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Municipality::from).collect(),
            total,
            page,
        ))
    }

    fn get_weather(&self, municipality_id: &str) -> Result<Option<WeatherObservation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = weather_observations::table
            .find(municipality_id)
            .select(WeatherObservationDB::as_select())
            .first::<WeatherObservationDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(WeatherObservation::from))
    }

    async fn create(&self, new_municipality: NewMunicipality) -> Result<Municipality> {
        self.writer
            .exec(move |conn| {
                let row: MunicipalityDB = new_municipality.into();
                diesel::insert_into(municipalities::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, municipality: Municipality) -> Result<Municipality> {
        self.writer
            .exec(move |conn| {
                let mut row: MunicipalityDB = municipality.into();
                row.updated_at = chrono::Utc::now().naive_utc();
                let affected = diesel::update(municipalities::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Municipality", &row.id));
                }
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, municipality_id: &str) -> Result<usize> {
        let municipality_id = municipality_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(weather_observations::table.find(&municipality_id))
                    .execute(conn)
                    .into_core()?;
                diesel::delete(municipalities::table.find(&municipality_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn upsert_weather(
        &self,
        municipality_id: &str,
        reading: WeatherReading,
    ) -> Result<WeatherObservation> {
        let municipality_id = municipality_id.to_string();
        self.writer
            .exec(move |conn| {
                let row = WeatherObservationDB::from_reading(municipality_id, reading);
                diesel::insert_into(weather_observations::table)
                    .values(&row)
                    .on_conflict(weather_observations::municipality_id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }
}
