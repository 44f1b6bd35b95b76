mod model;
mod repository;

pub use model::{MunicipalityDB, ProvinceDB, RegionDB, WeatherObservationDB};
pub use repository::{MunicipalityRepository, ProvinceRepository, RegionRepository};
