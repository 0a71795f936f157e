//! crates/adpatterns_core/src/suggestions.rs
//!
//! Fetching generated ad copy and handing it out without repeats.

use crate::domain::{Creative, Notification, SuggestionCriteria, SuggestionResult};
use crate::ports::{RandomSource, SuggestionService};
use rand::Rng;
use std::collections::HashSet;
use tracing::{info, warn};

pub const CTA_OPTIONS: &[&str] = &[
    "Shop Now",
    "Learn More",
    "Sign Up",
    "Get Offer",
    "Contact Us",
    "Book Now",
];

pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/600x314.png?text=AI+Generated+Image";

/// Fetches suggestions, degrading to an empty result instead of failing.
pub async fn fetch_suggestions(
    service: &dyn SuggestionService,
    criteria: &SuggestionCriteria,
) -> SuggestionResult {
    match service.generate_suggestions(criteria).await {
        Ok(result) => {
            info!(
                "Received {} headlines and {} descriptions ({} matches)",
                result.headlines.len(),
                result.descriptions.len(),
                result.total_matches
            );
            result
        }
        Err(e) => {
            warn!("Error fetching model suggestions: {}", e);
            SuggestionResult::degraded(criteria)
        }
    }
}

/// A [`RandomSource`] backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Picks two distinct indices in `0..len`. `len` must be at least two.
///
/// The second index is drawn from the `len - 1` slots left after the first,
/// so a source that keeps returning the same value still terminates.
pub(crate) fn pick_two(rng: &mut dyn RandomSource, len: usize) -> (usize, usize) {
    let first = rng.pick(len);
    let mut second = rng.pick(len - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}

/// The candidates in their original order with repeats removed.
pub(crate) fn distinct<'a>(candidates: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(*c))
        .cloned()
        .collect()
}

//=========================================================================================
// The Creative Editor
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyKind {
    Headline,
    Description,
}

/// What a regenerate request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regenerated {
    /// A new option was appended to the option list.
    Added(String),
    /// Every candidate has been shown already.
    Exhausted,
    /// The backend returned nothing to choose from.
    Unavailable,
}

/// Editing state for a draft's creative.
///
/// The used-sets live as long as the editor: once an option has been shown it
/// is never offered again by [`CreativeEditor::regenerate`]. Recreating the
/// editor is the only way to reset them.
#[derive(Debug, Clone, Default)]
pub struct CreativeEditor {
    creative: Creative,
    suggestions: Option<SuggestionResult>,
    headline_options: Vec<String>,
    description_options: Vec<String>,
    used_headlines: HashSet<String>,
    used_descriptions: HashSet<String>,
    notifications: Vec<Notification>,
}

impl CreativeEditor {
    pub fn new(creative: Creative) -> Self {
        Self {
            creative,
            ..Self::default()
        }
    }

    pub fn creative(&self) -> &Creative {
        &self.creative
    }

    pub fn suggestions(&self) -> Option<&SuggestionResult> {
        self.suggestions.as_ref()
    }

    pub fn headline_options(&self) -> &[String] {
        &self.headline_options
    }

    pub fn description_options(&self) -> &[String] {
        &self.description_options
    }

    pub fn used_headlines(&self) -> &HashSet<String> {
        &self.used_headlines
    }

    pub fn used_descriptions(&self) -> &HashSet<String> {
        &self.used_descriptions
    }

    /// Drains the notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn candidates(&self, kind: CopyKind) -> &[String] {
        match (&self.suggestions, kind) {
            (Some(s), CopyKind::Headline) => &s.headlines,
            (Some(s), CopyKind::Description) => &s.descriptions,
            (None, _) => &[],
        }
    }

    /// Offers a fresh, never-shown option of the given kind.
    pub async fn regenerate(
        &mut self,
        kind: CopyKind,
        service: &dyn SuggestionService,
        criteria: &SuggestionCriteria,
        rng: &mut dyn RandomSource,
    ) -> Regenerated {
        if self.candidates(kind).is_empty() {
            self.suggestions = Some(fetch_suggestions(service, criteria).await);
        }
        if self.candidates(kind).is_empty() {
            self.notifications
                .push(Notification::warning("No suggestions available right now. Please edit manually."));
            return Regenerated::Unavailable;
        }

        match kind {
            CopyKind::Headline => self.next_headline(rng),
            CopyKind::Description => self.next_description(rng),
        }
    }

    fn next_headline(&mut self, rng: &mut dyn RandomSource) -> Regenerated {
        let available = distinct(
            self.candidates(CopyKind::Headline)
                .iter()
                .filter(|h| !self.used_headlines.contains(*h)),
        );
        if available.is_empty() {
            self.notifications.push(Notification::warning(
                "All available headlines have been shown. Please fetch new suggestions or edit manually.",
            ));
            return Regenerated::Exhausted;
        }

        let headline = available[rng.pick(available.len())].clone();
        self.headline_options.push(headline.clone());
        self.used_headlines.insert(headline.clone());
        Regenerated::Added(headline)
    }

    fn next_description(&mut self, rng: &mut dyn RandomSource) -> Regenerated {
        let available = distinct(
            self.candidates(CopyKind::Description)
                .iter()
                .filter(|d| !self.used_descriptions.contains(*d)),
        );

        let description = match available.len() {
            0 => {
                self.notifications.push(Notification::warning(
                    "All available descriptions have been shown. Please fetch new suggestions or edit manually.",
                ));
                return Regenerated::Exhausted;
            }
            1 => {
                self.used_descriptions.insert(available[0].clone());
                available[0].clone()
            }
            len => {
                let (a, b) = pick_two(rng, len);
                self.used_descriptions.insert(available[a].clone());
                self.used_descriptions.insert(available[b].clone());
                format!("{} {}", available[a], available[b])
            }
        };
        self.description_options.push(description.clone());
        Regenerated::Added(description)
    }

    //-------------------------------------------------------------------------------------
    // Edits on the live creative
    //-------------------------------------------------------------------------------------

    /// Writes a previously offered headline into the creative.
    pub fn select_headline(&mut self, index: usize) -> Option<&Creative> {
        let headline = self.headline_options.get(index)?.clone();
        self.creative.headline = headline;
        Some(&self.creative)
    }

    /// Writes a previously offered description into the creative.
    pub fn select_description(&mut self, index: usize) -> Option<&Creative> {
        let description = self.description_options.get(index)?.clone();
        self.creative.description = description;
        Some(&self.creative)
    }

    pub fn set_headline(&mut self, headline: impl Into<String>) {
        self.creative.headline = headline.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.creative.description = description.into();
    }

    /// Sets the call to action. Only the fixed CTA options are accepted.
    pub fn set_cta(&mut self, cta: &str) -> bool {
        if !CTA_OPTIONS.contains(&cta) {
            return false;
        }
        self.creative.cta = cta.to_string();
        true
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.creative.image = image;
    }

    pub fn simulate_image(&mut self) {
        self.creative.image = Some(PLACEHOLDER_IMAGE_URL.to_string());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{NotificationLevel, Platform, ProductPayload};
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed index sequence, wrapping each into range.
    pub(crate) struct ScriptedRandom(pub VecDeque<usize>);

    impl ScriptedRandom {
        pub(crate) fn new(seq: &[usize]) -> Self {
            Self(seq.iter().copied().collect())
        }
    }

    impl RandomSource for ScriptedRandom {
        fn pick(&mut self, len: usize) -> usize {
            self.0.pop_front().unwrap_or(0) % len
        }
    }

    /// Serves queued responses and counts calls.
    #[derive(Default)]
    pub(crate) struct FakeSuggestions {
        pub responses: Mutex<VecDeque<PortResult<SuggestionResult>>>,
        pub calls: AtomicUsize,
    }

    impl FakeSuggestions {
        pub(crate) fn serving(results: Vec<PortResult<SuggestionResult>>) -> Self {
            Self {
                responses: Mutex::new(results.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SuggestionService for FakeSuggestions {
        async fn generate_suggestions(
            &self,
            _criteria: &SuggestionCriteria,
        ) -> PortResult<SuggestionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PortError::Unexpected("no response queued".to_string())))
        }
    }

    pub(crate) fn result(headlines: &[&str], descriptions: &[&str]) -> SuggestionResult {
        SuggestionResult {
            headlines: headlines.iter().map(|s| s.to_string()).collect(),
            descriptions: descriptions.iter().map(|s| s.to_string()).collect(),
            keywords: vec!["fashion".to_string()],
            cta: "Shop Now".to_string(),
            total_matches: 3,
            ..Default::default()
        }
    }

    fn criteria() -> SuggestionCriteria {
        SuggestionCriteria::from_payload(&ProductPayload::default(), Platform::Meta)
    }

    #[tokio::test]
    async fn failed_fetch_degrades_to_empty_result() {
        let service = FakeSuggestions::serving(vec![Err(PortError::Rejected(
            "Error generating suggestions".to_string(),
        ))]);
        let result = fetch_suggestions(&service, &criteria()).await;
        assert!(result.degraded);
        assert_eq!(result.headlines, Vec::<String>::new());
        assert_eq!(result.descriptions, Vec::<String>::new());
        assert_eq!(result.cta, "Learn More");
    }

    #[tokio::test]
    async fn headlines_never_repeat_until_exhausted() {
        let service = FakeSuggestions::serving(vec![Ok(result(&["A", "B", "C"], &[]))]);
        let mut editor = CreativeEditor::new(Creative::default());
        let mut rng = ScriptedRandom::new(&[1, 1, 0, 0]);

        let mut seen = Vec::new();
        for _ in 0..3 {
            match editor.regenerate(CopyKind::Headline, &service, &criteria(), &mut rng).await {
                Regenerated::Added(h) => {
                    assert!(!seen.contains(&h));
                    seen.push(h);
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(seen, vec!["B", "C", "A"]);
        assert_eq!(service.calls(), 1);

        let before = editor.headline_options().to_vec();
        let outcome = editor.regenerate(CopyKind::Headline, &service, &criteria(), &mut rng).await;
        assert_eq!(outcome, Regenerated::Exhausted);
        assert_eq!(editor.headline_options(), before.as_slice());
        assert_eq!(service.calls(), 1);

        let notes = editor.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
        assert!(editor.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn descriptions_pair_distinct_candidates() {
        let service = FakeSuggestions::serving(vec![Ok(result(&[], &["One.", "Two.", "Three."]))]);
        let mut editor = CreativeEditor::new(Creative::default());
        // The second draw skips over the first pick.
        let mut rng = ScriptedRandom::new(&[2, 0]);

        let outcome = editor
            .regenerate(CopyKind::Description, &service, &criteria(), &mut rng)
            .await;
        assert_eq!(outcome, Regenerated::Added("Three. One.".to_string()));
        assert!(editor.used_descriptions().contains("One."));
        assert!(editor.used_descriptions().contains("Three."));
    }

    #[tokio::test]
    async fn last_description_is_used_alone() {
        let service = FakeSuggestions::serving(vec![Ok(result(&[], &["One.", "Two.", "Three."]))]);
        let mut editor = CreativeEditor::new(Creative::default());
        let mut rng = ScriptedRandom::new(&[0, 0]);

        editor.regenerate(CopyKind::Description, &service, &criteria(), &mut rng).await;
        let outcome = editor
            .regenerate(CopyKind::Description, &service, &criteria(), &mut rng)
            .await;
        assert_eq!(outcome, Regenerated::Added("Three.".to_string()));

        let outcome = editor
            .regenerate(CopyKind::Description, &service, &criteria(), &mut rng)
            .await;
        assert_eq!(outcome, Regenerated::Exhausted);
        assert_eq!(editor.description_options(), &["One. Two.".to_string(), "Three.".to_string()]);
    }

    /// Always answers the same index.
    struct ConstantRandom(usize);

    impl RandomSource for ConstantRandom {
        fn pick(&mut self, len: usize) -> usize {
            self.0.min(len - 1)
        }
    }

    #[test]
    fn pick_two_terminates_with_a_constant_source() {
        for len in 2..6 {
            for value in 0..len {
                let (a, b) = pick_two(&mut ConstantRandom(value), len);
                assert_ne!(a, b);
                assert!(a < len && b < len);
            }
        }
    }

    #[tokio::test]
    async fn constant_source_still_pairs_descriptions() {
        let service = FakeSuggestions::serving(vec![Ok(result(&[], &["One.", "Two."]))]);
        let mut editor = CreativeEditor::new(Creative::default());
        let outcome = editor
            .regenerate(CopyKind::Description, &service, &criteria(), &mut ConstantRandom(0))
            .await;
        assert_eq!(outcome, Regenerated::Added("One. Two.".to_string()));
    }

    #[tokio::test]
    async fn repeated_candidates_are_offered_once() {
        let service = FakeSuggestions::serving(vec![Ok(result(&["Hi", "Hi"], &["Same.", "Same."]))]);
        let mut editor = CreativeEditor::new(Creative::default());
        let mut rng = SystemRandom;

        let outcome = editor
            .regenerate(CopyKind::Description, &service, &criteria(), &mut rng)
            .await;
        assert_eq!(outcome, Regenerated::Added("Same.".to_string()));

        let outcome = editor.regenerate(CopyKind::Headline, &service, &criteria(), &mut rng).await;
        assert_eq!(outcome, Regenerated::Added("Hi".to_string()));
        let outcome = editor.regenerate(CopyKind::Headline, &service, &criteria(), &mut rng).await;
        assert_eq!(outcome, Regenerated::Exhausted);
    }

    #[tokio::test]
    async fn empty_backend_reports_unavailable() {
        let service = FakeSuggestions::serving(vec![Err(PortError::Unexpected("down".to_string()))]);
        let mut editor = CreativeEditor::new(Creative::default());
        let outcome = editor
            .regenerate(CopyKind::Headline, &service, &criteria(), &mut SystemRandom)
            .await;
        assert_eq!(outcome, Regenerated::Unavailable);
        assert!(editor.headline_options().is_empty());
        assert_eq!(editor.take_notifications().len(), 1);
    }

    #[tokio::test]
    async fn selecting_an_option_updates_the_creative() {
        let service = FakeSuggestions::serving(vec![Ok(result(&["Fresh looks"], &[]))]);
        let mut editor = CreativeEditor::new(Creative {
            headline: "Old".to_string(),
            ..Default::default()
        });
        editor
            .regenerate(CopyKind::Headline, &service, &criteria(), &mut SystemRandom)
            .await;
        assert_eq!(editor.select_headline(0).map(|c| c.headline.as_str()), Some("Fresh looks"));
        assert!(editor.select_headline(5).is_none());
        assert!(editor.select_description(0).is_none());
    }

    #[test]
    fn cta_must_be_a_known_option() {
        let mut editor = CreativeEditor::new(Creative::default());
        assert!(editor.set_cta("Book Now"));
        assert!(!editor.set_cta("Click here"));
        assert_eq!(editor.creative().cta, "Book Now");

        editor.simulate_image();
        assert_eq!(editor.creative().image.as_deref(), Some(PLACEHOLDER_IMAGE_URL));
    }

    #[test]
    fn system_random_stays_in_range() {
        let mut rng = SystemRandom;
        for len in 1..20 {
            assert!(rng.pick(len) < len);
        }
    }
}
