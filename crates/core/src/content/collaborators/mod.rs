mod collaborators_model;
mod collaborators_service;
mod collaborators_traits;

#[cfg(test)]
mod collaborators_service_tests;

pub use collaborators_model::{
    Collaborator, CollaboratorFilter, CollaboratorType, CollaboratorUpdate, NewCollaborator,
};
pub use collaborators_service::CollaboratorService;
pub use collaborators_traits::{CollaboratorRepositoryTrait, CollaboratorServiceTrait};
