//! Frequently asked question models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::MONEY_PRECISION;
use crate::errors::Result;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub helpful_yes: i64,
    pub helpful_no: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Faq {
    /// Share of "helpful" votes in percent; 0 without votes.
    pub fn helpful_rate(&self) -> Decimal {
        let total = self.helpful_yes + self.helpful_no;
        if total == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.helpful_yes) / Decimal::from(total) * dec!(100))
            .round_dp(MONEY_PRECISION)
    }

    pub fn apply(&mut self, update: FaqUpdate) {
        if let Some(v) = update.question {
            self.question = v;
        }
        if let Some(v) = update.answer {
            self.answer = v;
        }
        if update.category.is_some() {
            self.category = update.category;
        }
        if let Some(v) = update.position {
            self.position = v;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_faq(&self.question, &self.answer, self.position)
    }
}

fn validate_faq(question: &str, answer: &str, position: i32) -> Result<()> {
    let mut v = Validator::new();
    v.required("question", question)
        .max_len("question", question, 500);
    v.required("answer", answer);
    v.check(position >= 0, "position", "The position must be at least 0.");
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewFaq {
    pub fn validate(&self) -> Result<()> {
        validate_faq(&self.question, &self.answer, self.position)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqFilter {
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

/// Body of `POST /faqs/{id}/feedback`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FaqFeedback {
    pub helpful: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq(yes: i64, no: i64) -> Faq {
        Faq {
            id: "faq-1".to_string(),
            question: "How are yields paid?".to_string(),
            answer: "Daily.".to_string(),
            category: None,
            position: 0,
            is_active: true,
            helpful_yes: yes,
            helpful_no: no,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_helpful_rate() {
        assert_eq!(faq(0, 0).helpful_rate(), Decimal::ZERO);
        assert_eq!(faq(3, 1).helpful_rate(), dec!(75));
        assert_eq!(faq(1, 2).helpful_rate(), dec!(33.33));
    }
}
