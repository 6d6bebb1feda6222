mod client;

pub use client::{OpenAIClient, DEEPSEEK_API_BASE, OPENAI_API_BASE};
