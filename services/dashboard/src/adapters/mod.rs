pub mod auth;
pub mod backend;
pub mod campaigns;
pub mod file_store;
pub mod suggestions;

pub use auth::HttpAuthAdapter;
pub use backend::BackendClient;
pub use campaigns::HttpCampaignAdapter;
pub use file_store::JsonFileStore;
pub use suggestions::HttpSuggestionAdapter;
