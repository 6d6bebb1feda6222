pub mod error;
pub mod store;
pub mod layout;
pub mod models;
pub mod repositories;
pub mod reconciler;
pub mod client;
pub mod builder;

pub use error::{PersistError, Result};
pub use store::FileStore;
pub use models::{
    ApiConfigFile, ApiEntry, ApiEntryUpdate, Collection, ConversationLog, NewApiEntry, NewPrompt,
    Prompt, PromptUpdate, ThreadDocument,
};
pub use repositories::{
    slugify, ApiConfigRepository, CollectionRepository, ConversationLogRepository,
    PromptRepository, ThreadRepository,
};
pub use reconciler::{filter_for_model, merge_histories, MigrationOutcome, ThreadReconciler, TurnContext};
pub use client::PersistClient;
pub use builder::PersistClientBuilder;
