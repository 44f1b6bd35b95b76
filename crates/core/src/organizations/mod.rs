//! Organizations customers belong to.

mod organizations_model;
mod organizations_service;
mod organizations_traits;


pub use organizations_model::{
    NewOrganization, Organization, OrganizationFilter, OrganizationUpdate,
};
pub use organizations_service::OrganizationService;
pub use organizations_traits::{OrganizationRepositoryTrait, OrganizationServiceTrait};
