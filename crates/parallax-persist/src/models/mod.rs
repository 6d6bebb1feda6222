mod thread_document;
mod prompt;
mod collection;
mod api_config;
mod conversation_log;

pub use thread_document::ThreadDocument;
pub use prompt::{NewPrompt, Prompt, PromptUpdate};
pub use collection::Collection;
pub use api_config::{ApiConfigFile, ApiEntry, ApiEntryUpdate, NewApiEntry};
pub use conversation_log::ConversationLog;
