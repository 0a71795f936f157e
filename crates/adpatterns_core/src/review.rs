//! crates/adpatterns_core/src/review.rs
//!
//! The campaign review workspace: one draft, its creative editor and its
//! publish flow. Every mutation of the draft is written back to the store.

use crate::domain::{AdSet, CampaignDraft, Creative, Notification, SuggestionCriteria};
use crate::draft::regenerate_all;
use crate::ports::{CampaignService, RandomSource, SuggestionService};
use crate::publish::{PublishError, PublishFlow, PublishState};
use crate::store::DraftStore;
use crate::suggestions::{fetch_suggestions, CopyKind, CreativeEditor, Regenerated};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

/// Where the client should go after a successful publish, and how long to wait first.
pub const DASHBOARD_ROUTE: &str = "/ads-dashboard";
pub const REDIRECT_DELAY_MS: u64 = 1500;

/// A partial update of the campaign-level fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaUpdate {
    pub campaign_name: Option<String>,
    pub objective: Option<String>,
    pub budget_daily: Option<String>,
}

/// A partial update of the creative, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreativeUpdate {
    pub headline: Option<String>,
    pub description: Option<String>,
    pub cta: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub simulate_image: bool,
}

pub struct ReviewSession {
    draft: CampaignDraft,
    editor: CreativeEditor,
    /// Bumped whenever the editor is recreated, which resets its used-sets.
    editor_generation: u64,
    publish: PublishFlow,
    store: DraftStore,
    rng: Box<dyn RandomSource>,
    notifications: Vec<Notification>,
}

impl ReviewSession {
    pub fn new(draft: CampaignDraft, store: DraftStore, rng: Box<dyn RandomSource>) -> Self {
        let editor = CreativeEditor::new(draft.creative.clone());
        Self {
            draft,
            editor,
            editor_generation: 0,
            publish: PublishFlow::new(),
            store,
            rng,
            notifications: Vec::new(),
        }
    }

    /// Opens the last generated draft, if one was stored.
    pub fn open(store: DraftStore, rng: Box<dyn RandomSource>) -> Option<Self> {
        let draft = store.last_campaign()?;
        Some(Self::new(draft, store, rng))
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn editor(&self) -> &CreativeEditor {
        &self.editor
    }

    pub fn editor_generation(&self) -> u64 {
        self.editor_generation
    }

    pub fn publish_state(&self) -> &PublishState {
        self.publish.state()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        let mut notes = std::mem::take(&mut self.notifications);
        notes.extend(self.editor.take_notifications());
        notes
    }

    fn save(&self) {
        if !self.store.save_campaign(&self.draft) {
            warn!("Draft '{}' could not be persisted", self.draft.campaign_name);
        }
    }

    fn sync_creative(&mut self) {
        self.draft.creative = self.editor.creative().clone();
        self.save();
    }

    fn criteria(&self) -> SuggestionCriteria {
        let payload = self.store.last_payload().unwrap_or_default();
        SuggestionCriteria::from_payload(&payload, self.store.selected_platform())
    }

    //-------------------------------------------------------------------------------------
    // Field edits
    //-------------------------------------------------------------------------------------

    pub fn update_meta(&mut self, update: MetaUpdate) -> &CampaignDraft {
        if let Some(name) = update.campaign_name {
            self.draft.campaign_name = name;
        }
        if let Some(objective) = update.objective {
            self.draft.objective = objective;
        }
        if let Some(budget) = update.budget_daily {
            self.draft.budget_daily = budget;
        }
        self.save();
        &self.draft
    }

    pub fn update_adset(&mut self, adset: AdSet) -> &CampaignDraft {
        self.draft.adset = adset;
        self.save();
        &self.draft
    }

    /// Applies manual creative edits. Returns `false` when the CTA is not one of the fixed options.
    pub fn update_creative(&mut self, update: CreativeUpdate) -> bool {
        let mut accepted = true;
        if let Some(headline) = update.headline {
            self.editor.set_headline(headline);
        }
        if let Some(description) = update.description {
            self.editor.set_description(description);
        }
        if let Some(cta) = update.cta {
            accepted = self.editor.set_cta(&cta);
        }
        if update.simulate_image {
            self.editor.simulate_image();
        } else if let Some(image) = update.image {
            self.editor.set_image(Some(image).filter(|i| !i.is_empty()));
        }
        self.sync_creative();
        accepted
    }

    //-------------------------------------------------------------------------------------
    // Regeneration
    //-------------------------------------------------------------------------------------

    /// Offers a new, never-shown headline or description option.
    pub async fn regenerate(&mut self, kind: CopyKind, service: &dyn SuggestionService) -> Regenerated {
        let criteria = self.criteria();
        self.editor
            .regenerate(kind, service, &criteria, self.rng.as_mut())
            .await
    }

    /// Writes an offered option into the creative. Returns `None` for an unknown index.
    pub fn select_option(&mut self, kind: CopyKind, index: usize) -> Option<&Creative> {
        let selected = match kind {
            CopyKind::Headline => self.editor.select_headline(index).is_some(),
            CopyKind::Description => self.editor.select_description(index).is_some(),
        };
        if !selected {
            return None;
        }
        self.sync_creative();
        Some(&self.draft.creative)
    }

    /// Refreshes headline, description, CTA and keywords from a fresh fetch.
    ///
    /// On success the creative editor is recreated, so previously shown
    /// options become eligible again.
    pub async fn regenerate_all(&mut self, service: &dyn SuggestionService) -> bool {
        let criteria = self.criteria();
        let fresh = fetch_suggestions(service, &criteria).await;

        match regenerate_all(&self.draft, &fresh, self.rng.as_mut()) {
            Some(updated) => {
                self.draft = updated;
                self.save();
                self.editor = CreativeEditor::new(self.draft.creative.clone());
                self.editor_generation += 1;
                self.notifications
                    .push(Notification::success("Campaign content regenerated successfully!"));
                true
            }
            None => {
                self.notifications
                    .push(Notification::error("Failed to regenerate content. Please try again."));
                false
            }
        }
    }

    //-------------------------------------------------------------------------------------
    // Publishing
    //-------------------------------------------------------------------------------------

    /// Creates and publishes the campaign using the stored access token.
    pub async fn publish(&mut self, service: &dyn CampaignService) -> Result<String, PublishError> {
        let token = self.store.auth_token();
        let payload = self.store.last_payload();
        let platform = self.store.selected_platform();
        let campaign = self
            .draft
            .to_campaign_create(payload.as_ref(), platform, Utc::now());

        let result = self.publish.publish(service, token.as_deref(), &campaign).await;
        match &result {
            Ok(id) => {
                info!("Campaign {} published from draft '{}'", id, self.draft.campaign_name);
                self.notifications.push(Notification::success(
                    "Campaign Published Successfully! Your campaign has been submitted and will be reviewed shortly.",
                ));
            }
            Err(e) => self.notifications.push(Notification::error(e.to_string())),
        }
        result
    }
}
