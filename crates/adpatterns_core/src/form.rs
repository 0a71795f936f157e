//! crates/adpatterns_core/src/form.rs
//!
//! The multi-step product intake form.
//!
//! The form walks through a fixed list of steps. Each step names the fields
//! that must be filled before moving forward; going back is always allowed.
//! The step before the last one is the submit step: submitting persists the
//! payload and lands on the terminal confirmation step.

use crate::domain::ProductPayload;
use crate::store::DraftStore;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::info;

pub const DESCRIPTION_MAX_CHARS: usize = 280;
const MAX_LOCATION_SUGGESTIONS: usize = 10;

/// The areas the audience step can target.
pub const JAIPUR_AREAS: &[&str] = &[
    "Malviya Nagar", "Vaishali Nagar", "Mansarovar", "Jagatpura", "Pratap Nagar",
    "C Scheme", "Civil Lines", "Raja Park", "Sanganer", "Ajmer Road", "Bapu Nagar",
    "Sodala", "Durgapura", "Gopalpura", "Jhotwara", "Bani Park", "Shyam Nagar",
    "Tonk Road", "Vidhyadhar Nagar", "Nirman Nagar", "Ambabari", "Sirsi Road",
    "Mahesh Nagar", "Lal Kothi", "Transport Nagar", "Sitapura", "Chitrakoot",
    "Hasanpura", "Patrakar Colony", "Adarsh Nagar", "Subhash Nagar", "Brahmpuri",
    "Tilak Nagar", "Shastri Nagar", "Khatipura", "Murlipura", "Kalwar Road",
    "Harmada", "Bhankrota", "Mahapura", "Sirsi Extension", "Kukas", "Amer Road",
    "Kanota", "Achrol", "Bagru", "Phagi", "Chaksu", "Jobner Road", "Bindayaka",
    "Vatika", "Beelwa", "Agra Road", "Jamwa Ramgarh", "Gandhi Path", "Queens Road",
    "New Sanganer Road", "Gopalpura Bypass", "Triveni Nagar", "SFS Mansarovar",
    "Heerapura", "Kartarpura", "Barkat Nagar",
];

//=========================================================================================
// Steps, Errors and Outcomes
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: &'static str,
    pub validation_fields: &'static [&'static str],
}

pub fn default_steps() -> Vec<Step> {
    vec![
        Step { label: "Product", validation_fields: &["productType", "name"] },
        Step { label: "Description", validation_fields: &["description"] },
        Step { label: "Audience", validation_fields: &["location"] },
        Step { label: "Review", validation_fields: &["termsAccepted"] },
        Step { label: "Complete", validation_fields: &[] },
    ]
}

/// Which way the last transition went. Only used for animating the step change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Right,
    Left,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fix the highlighted fields")]
    Invalid(BTreeMap<String, String>),
    #[error("Submission is only possible from the review step")]
    NotOnSubmitStep,
    #[error("A submission is already in progress")]
    AlreadySubmitting,
    #[error("No submission is in progress")]
    NotSubmitting,
}

/// What `handle_next` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Advanced,
    /// Validation failed; `errors` holds the messages.
    Blocked,
    /// The current step is the submit step; use `begin_submit`.
    SubmitRequired,
    /// Already on the terminal step.
    Finished,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

//=========================================================================================
// The Form Engine
//=========================================================================================

#[derive(Debug, Clone)]
pub struct ProductForm {
    steps: Vec<Step>,
    current_step: usize,
    form_data: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    direction: Direction,
    submitting: bool,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductForm {
    pub fn new() -> Self {
        Self::with_steps(default_steps())
    }

    pub fn with_steps(steps: Vec<Step>) -> Self {
        let form_data = BTreeMap::from([
            ("productType".to_string(), "Product".to_string()),
            ("category".to_string(), "Clothing".to_string()),
        ]);
        Self {
            steps,
            current_step: 0,
            form_data,
            errors: BTreeMap::new(),
            direction: Direction::Right,
            submitting: false,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn form_data(&self) -> &BTreeMap<String, String> {
        &self.form_data
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn last_step(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    fn submit_step(&self) -> usize {
        self.last_step().saturating_sub(1)
    }

    pub fn is_complete(&self) -> bool {
        self.current_step == self.last_step()
    }

    pub fn is_on_submit_step(&self) -> bool {
        self.current_step == self.submit_step() && !self.is_complete()
    }

    fn value(&self, field: &str) -> &str {
        self.form_data.get(field).map(String::as_str).unwrap_or("")
    }

    /// Sets a field, keeping the single price and the price range exclusive.
    pub fn update_form_data(&mut self, field: &str, value: &str) {
        let value = if field == "description" {
            value.chars().take(DESCRIPTION_MAX_CHARS).collect()
        } else {
            value.to_string()
        };

        if !value.is_empty() {
            match field {
                "price" => {
                    self.form_data.insert("priceMin".to_string(), String::new());
                    self.form_data.insert("priceMax".to_string(), String::new());
                }
                "priceMin" | "priceMax" => {
                    self.form_data.insert("price".to_string(), String::new());
                }
                _ => {}
            }
        }
        self.form_data.insert(field.to_string(), value);
        self.errors.remove(field);
    }

    /// Checks the current step's required fields and records an error for each failure.
    pub fn validate_step(&mut self) -> bool {
        let mut errors = BTreeMap::new();
        let fields = self
            .steps
            .get(self.current_step)
            .map(|s| s.validation_fields)
            .unwrap_or(&[]);

        for &field in fields {
            let value = self.value(field);
            if field == "termsAccepted" {
                if value != "true" {
                    errors.insert(
                        field.to_string(),
                        "You must accept the terms and conditions".to_string(),
                    );
                }
            } else if value.trim().is_empty() {
                errors.insert(field.to_string(), "This field is required".to_string());
            }

            if field == "email" && !value.is_empty() && !email_regex().is_match(value) {
                errors.insert(
                    "email".to_string(),
                    "Please enter a valid email address".to_string(),
                );
            }
        }

        let ok = errors.is_empty();
        self.errors = errors;
        ok
    }

    pub fn handle_next(&mut self) -> NextOutcome {
        if self.is_complete() {
            return NextOutcome::Finished;
        }
        if self.is_on_submit_step() {
            return NextOutcome::SubmitRequired;
        }
        if !self.validate_step() {
            return NextOutcome::Blocked;
        }
        self.direction = Direction::Right;
        self.current_step += 1;
        NextOutcome::Advanced
    }

    /// Goes back one step without validating. Returns whether the step changed.
    pub fn handle_previous(&mut self) -> bool {
        if self.current_step == 0 || self.submitting {
            return false;
        }
        self.direction = Direction::Left;
        self.current_step -= 1;
        true
    }

    /// Validates the submit step and persists the payload.
    ///
    /// The form stays on the submit step, marked as submitting, until
    /// [`ProductForm::complete_submit`] is called.
    pub fn begin_submit(&mut self, store: &DraftStore) -> Result<ProductPayload, FormError> {
        if !self.is_on_submit_step() {
            return Err(FormError::NotOnSubmitStep);
        }
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        if !self.validate_step() {
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let payload = self.payload();
        store.save_payload(&payload);
        info!(
            "Product payload for '{}' saved",
            payload.name.as_deref().unwrap_or("untitled")
        );
        self.submitting = true;
        Ok(payload)
    }

    /// Moves to the terminal confirmation step after a submission.
    pub fn complete_submit(&mut self) -> Result<(), FormError> {
        if !self.submitting {
            return Err(FormError::NotSubmitting);
        }
        self.submitting = false;
        self.direction = Direction::Right;
        self.current_step = self.last_step();
        Ok(())
    }

    //-------------------------------------------------------------------------------------
    // Audience location picker
    //-------------------------------------------------------------------------------------

    pub fn selected_locations(&self) -> Vec<String> {
        self.value("location")
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Areas matching `query` that are not selected yet, at most ten.
    pub fn location_suggestions(&self, query: &str) -> Vec<&'static str> {
        if query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();
        let selected = self.selected_locations();
        JAIPUR_AREAS
            .iter()
            .copied()
            .filter(|area| area.to_lowercase().contains(&query))
            .filter(|area| !selected.iter().any(|s| s == area))
            .take(MAX_LOCATION_SUGGESTIONS)
            .collect()
    }

    pub fn add_location(&mut self, area: &str) {
        let mut selected = self.selected_locations();
        if selected.iter().any(|s| s == area) {
            return;
        }
        selected.push(area.to_string());
        self.update_form_data("location", &selected.join(", "));
    }

    pub fn remove_location(&mut self, area: &str) {
        let selected: Vec<String> = self
            .selected_locations()
            .into_iter()
            .filter(|s| s != area)
            .collect();
        self.update_form_data("location", &selected.join(", "));
    }

    /// Projects the form data into a product payload.
    pub fn payload(&self) -> ProductPayload {
        let get = |field: &str| {
            self.form_data
                .get(field)
                .filter(|v| !v.is_empty())
                .cloned()
        };
        ProductPayload {
            product_type: get("productType"),
            name: get("name"),
            category: get("category"),
            description: get("description"),
            price: get("price"),
            price_min: get("priceMin"),
            price_max: get("priceMax"),
            location: get("location"),
            target: get("target"),
            age_min: get("ageMin"),
            age_max: get("ageMax"),
            gender: get("gender"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn store() -> DraftStore {
        DraftStore::new(Arc::new(MemoryStore::new()))
    }

    fn filled_to_review() -> ProductForm {
        let mut form = ProductForm::new();
        form.update_form_data("name", "QuickClean");
        assert_eq!(form.handle_next(), NextOutcome::Advanced);
        form.update_form_data("description", "Laundry picked up and delivered.");
        form.update_form_data("price", "500");
        assert_eq!(form.handle_next(), NextOutcome::Advanced);
        form.add_location("C Scheme");
        assert_eq!(form.handle_next(), NextOutcome::Advanced);
        form
    }

    #[test]
    fn price_fields_stay_exclusive() {
        let mut form = ProductForm::new();
        form.update_form_data("priceMin", "100");
        form.update_form_data("priceMax", "300");
        form.update_form_data("price", "250");
        assert_eq!(form.payload().price.as_deref(), Some("250"));
        assert_eq!(form.payload().price_min, None);
        assert_eq!(form.payload().price_max, None);

        form.update_form_data("priceMax", "900");
        let payload = form.payload();
        assert_eq!(payload.price, None);
        assert_eq!(payload.price_max.as_deref(), Some("900"));

        // Clearing a field never clears the other side.
        form.update_form_data("priceMax", "");
        form.update_form_data("price", "");
        assert_eq!(form.payload().price_min, None);
    }

    #[test]
    fn validation_fails_only_on_blank_required_fields() {
        let mut form = ProductForm::new();
        assert!(!form.validate_step());
        assert_eq!(form.errors().get("name").map(String::as_str), Some("This field is required"));

        form.update_form_data("name", "   ");
        assert!(!form.validate_step());

        form.update_form_data("name", "QuickClean");
        assert!(form.errors().is_empty());
        assert!(form.validate_step());
    }

    #[test]
    fn terms_must_be_exactly_true() {
        let mut form = filled_to_review();
        assert_eq!(form.current_step(), 3);
        form.update_form_data("termsAccepted", "yes");
        assert!(!form.validate_step());
        assert_eq!(
            form.errors().get("termsAccepted").map(String::as_str),
            Some("You must accept the terms and conditions")
        );
        form.update_form_data("termsAccepted", "true");
        assert!(form.validate_step());
    }

    #[test]
    fn email_is_checked_when_required() {
        let steps = vec![
            Step { label: "Contact", validation_fields: &["email"] },
            Step { label: "Done", validation_fields: &[] },
        ];
        let mut form = ProductForm::with_steps(steps);
        form.update_form_data("email", "not-an-address");
        assert!(!form.validate_step());
        form.update_form_data("email", "ada@example.com");
        assert!(form.validate_step());
    }

    #[test]
    fn blocked_next_keeps_the_step() {
        let mut form = ProductForm::new();
        assert_eq!(form.handle_next(), NextOutcome::Blocked);
        assert_eq!(form.current_step(), 0);
    }

    #[test]
    fn previous_skips_validation_and_sets_direction() {
        let mut form = filled_to_review();
        form.update_form_data("location", "");
        assert!(form.handle_previous());
        assert_eq!(form.current_step(), 2);
        assert_eq!(form.direction(), Direction::Left);

        let mut fresh = ProductForm::new();
        assert!(!fresh.handle_previous());
    }

    #[test]
    fn next_on_review_requires_submission() {
        let mut form = filled_to_review();
        form.update_form_data("termsAccepted", "true");
        assert_eq!(form.handle_next(), NextOutcome::SubmitRequired);
        assert_eq!(form.current_step(), 3);
    }

    #[test]
    fn submit_persists_then_completes() {
        let store = store();
        let mut form = filled_to_review();

        assert!(matches!(form.begin_submit(&store), Err(FormError::Invalid(_))));
        assert_eq!(store.last_payload(), None);

        form.update_form_data("termsAccepted", "true");
        let payload = form.begin_submit(&store).unwrap();
        assert!(form.is_submitting());
        assert_eq!(store.last_payload(), Some(payload.clone()));
        assert_eq!(form.begin_submit(&store), Err(FormError::AlreadySubmitting));
        assert!(!form.handle_previous());

        form.complete_submit().unwrap();
        assert!(form.is_complete());
        assert_eq!(form.handle_next(), NextOutcome::Finished);
        assert_eq!(payload.price.as_deref(), Some("500"));
        assert_eq!(payload.price_min, None);
    }

    #[test]
    fn submit_is_rejected_off_the_review_step() {
        let mut form = ProductForm::new();
        assert_eq!(form.begin_submit(&store()), Err(FormError::NotOnSubmitStep));
        assert_eq!(form.complete_submit(), Err(FormError::NotSubmitting));
    }

    #[test]
    fn description_is_capped() {
        let mut form = ProductForm::new();
        form.update_form_data("description", &"x".repeat(400));
        assert_eq!(form.form_data()["description"].chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn location_picker_tracks_selection() {
        let mut form = ProductForm::new();
        let suggestions = form.location_suggestions("nagar");
        assert_eq!(suggestions.len(), 10);
        assert!(form.location_suggestions("").is_empty());

        form.add_location("Malviya Nagar");
        form.add_location("Bani Park");
        form.add_location("Bani Park");
        assert_eq!(form.form_data()["location"], "Malviya Nagar, Bani Park");
        assert!(!form.location_suggestions("malviya").contains(&"Malviya Nagar"));

        form.remove_location("Malviya Nagar");
        assert_eq!(form.selected_locations(), vec!["Bani Park"]);
    }
}
