pub mod message;
pub mod thread;
pub mod response;

pub use message::{Role, ThreadMessage};
pub use thread::Thread;
pub use response::{ModelResponse, ERROR_PREFIX};
pub use parallax_llm::TokenUsage;
