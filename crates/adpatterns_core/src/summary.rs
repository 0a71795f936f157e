//! crates/adpatterns_core/src/summary.rs
//!
//! Audience, CTA and interest hints derived locally from a product payload,
//! shown next to the generated copy.

use crate::domain::{field, ProductPayload};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_AGE_RANGE: &str = "25-45";

fn age_span_regex() -> &'static Regex {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"(\d+)[-–](\d+)").expect("valid age span regex"))
}

fn is_service(product_type: Option<&str>) -> bool {
    product_type.map(str::trim) == Some("Service")
}

/// A short description of who the product is for.
pub fn infer_audience(
    category: Option<&str>,
    product_type: Option<&str>,
    target: Option<&str>,
) -> String {
    if let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) {
        return target.to_string();
    }
    let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return "General audience".to_string();
    };
    let cat = category.to_lowercase();
    let audience = if cat.contains("clothing") {
        "Fashion shoppers, 18-45"
    } else if cat.contains("education") {
        "Students & lifelong learners, 16-35"
    } else if cat.contains("restaurant") {
        "Local diners, food lovers, 18-50"
    } else if cat.contains("software") || cat.contains("technology") {
        "Tech-savvy professionals aged 25-45"
    } else if cat.contains("health") {
        "Health-conscious adults, 25-60"
    } else if is_service(product_type) {
        "Local customers looking for services"
    } else {
        "Online shoppers, interested in related categories"
    };
    audience.to_string()
}

/// Priced products sell, services book, everything else informs.
pub fn pick_cta(has_price: bool, product_type: Option<&str>) -> &'static str {
    if has_price {
        "Shop Now"
    } else if is_service(product_type) {
        "Book Now"
    } else {
        "Learn More"
    }
}

/// `"min-max"` from the age fields, else the first span written in the target.
pub fn infer_age_range(age_min: Option<&str>, age_max: Option<&str>, target: Option<&str>) -> String {
    fn non_empty(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }
    if let (Some(min), Some(max)) = (non_empty(age_min), non_empty(age_max)) {
        return format!("{}-{}", min, max);
    }
    non_empty(target)
        .and_then(|t| age_span_regex().captures(t))
        .map(|c| format!("{}-{}", &c[1], &c[2]))
        .unwrap_or_else(|| DEFAULT_AGE_RANGE.to_string())
}

fn push_unique(list: &mut Vec<String>, items: &[&str]) {
    for item in items {
        if !list.iter().any(|existing| existing == item) {
            list.push(item.to_string());
        }
    }
}

/// Audience segments suggested by the target text and the category.
pub fn infer_audience_tags(category: Option<&str>, target: Option<&str>) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some(target) = target {
        let lower = target.to_lowercase();
        if lower.contains("fitness") || lower.contains("health") {
            push_unique(&mut tags, &["Fitness Enthusiasts", "Health-Conscious Individuals"]);
        }
        if lower.contains("tech") || lower.contains("professional") {
            push_unique(&mut tags, &["Tech Early Adopters", "Busy Professionals"]);
        }
        if lower.contains("student") {
            push_unique(&mut tags, &["Students"]);
        }
    }
    if let Some(category) = category {
        let cat = category.to_lowercase();
        if cat.contains("technology") || cat.contains("software") {
            push_unique(&mut tags, &["Tech Early Adopters", "Busy Professionals"]);
        }
        if cat.contains("fitness") || cat.contains("health") {
            push_unique(&mut tags, &["Fitness Enthusiasts", "Health-Conscious Individuals"]);
        }
    }
    if tags.is_empty() {
        tags.push("General Audience".to_string());
    }
    tags
}

/// Interest categories for campaign targeting.
pub fn infer_interests(category: Option<&str>, target: Option<&str>) -> Vec<String> {
    let mut interests = Vec::new();
    if let Some(target) = target {
        let lower = target.to_lowercase();
        if lower.contains("tech") {
            push_unique(&mut interests, &["Technology"]);
        }
        if lower.contains("fitness") || lower.contains("health") {
            push_unique(&mut interests, &["Fitness"]);
        }
        if lower.contains("professional") || lower.contains("business") {
            push_unique(&mut interests, &["Productivity"]);
        }
    }
    if let Some(category) = category {
        let cat = category.to_lowercase();
        if cat.contains("technology") || cat.contains("software") {
            push_unique(&mut interests, &["Technology"]);
        }
        if cat.contains("fitness") || cat.contains("health") {
            push_unique(&mut interests, &["Fitness"]);
        }
    }
    if interests.is_empty() {
        interests.push("General".to_string());
    }
    interests
}

//=========================================================================================
// Payload Summary
//=========================================================================================

/// Every derived hint for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadSummary {
    pub audience: String,
    pub cta: String,
    pub age_range: String,
    pub audience_tags: Vec<String>,
    pub interests: Vec<String>,
}

impl PayloadSummary {
    pub fn of(payload: &ProductPayload) -> Self {
        let category = field(&payload.category);
        let product_type = field(&payload.product_type);
        let target = field(&payload.target);
        // Any single price field counts, even half a range.
        let has_price = [&payload.price, &payload.price_min, &payload.price_max]
            .into_iter()
            .any(|p| field(p).is_some());

        Self {
            audience: infer_audience(category, product_type, target),
            cta: pick_cta(has_price, product_type).to_string(),
            age_range: infer_age_range(field(&payload.age_min), field(&payload.age_max), target),
            audience_tags: infer_audience_tags(category, target),
            interests: infer_interests(category, target),
        }
    }
}
