mod faqs_model;
mod faqs_service;
mod faqs_traits;

#[cfg(test)]
mod faqs_service_tests;

pub use faqs_model::{Faq, FaqFeedback, FaqFilter, FaqUpdate, NewFaq};
pub use faqs_service::FaqService;
pub use faqs_traits::{FaqRepositoryTrait, FaqServiceTrait};
