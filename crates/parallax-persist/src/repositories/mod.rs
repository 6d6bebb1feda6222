mod thread;
mod prompt;
mod collection;
mod api_config;
mod conversation_log;

pub use thread::ThreadRepository;
pub use prompt::{slugify, PromptRepository};
pub use collection::CollectionRepository;
pub use api_config::ApiConfigRepository;
pub use conversation_log::ConversationLogRepository;
