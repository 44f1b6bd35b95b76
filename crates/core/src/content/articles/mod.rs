mod articles_model;
mod articles_service;
mod articles_traits;

#[cfg(test)]
mod articles_service_tests;

pub use articles_model::{
    Article, ArticleFilter, ArticleStatus, ArticleUpdate, NewArticle, NewArticleRecord,
};
pub use articles_service::ArticleService;
pub use articles_traits::{ArticleRepositoryTrait, ArticleServiceTrait};
