pub mod account;
pub mod domain;
pub mod draft;
pub mod form;
pub mod ports;
pub mod publish;
pub mod review;
pub mod store;
pub mod suggestions;
pub mod summary;

pub use account::AuthError;
pub use domain::{
    AdAccount, AdSet, CampaignCreate, CampaignDraft, Creative, Notification, NotificationLevel,
    PayloadUpdate, Platform, ProductPayload, SuggestionCriteria, SuggestionResult, Theme,
};
pub use form::{Direction, FormError, NextOutcome, ProductForm};
pub use ports::{
    AuthService, CampaignService, KeyValueStore, PortError, PortResult, RandomSource, Registration,
    SuggestionService,
};
pub use publish::{PublishError, PublishFlow, PublishState};
pub use review::ReviewSession;
pub use store::{DraftStore, MemoryStore};
pub use suggestions::{CopyKind, CreativeEditor, Regenerated, SystemRandom};
pub use summary::PayloadSummary;
