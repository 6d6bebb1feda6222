use parallax_llm::{ChatOptions, ChatRequest, Message, TokenUsage};

#[test]
fn test_chat_request_creation() {
    let messages = vec![Message::human("Hello")];
    let request = ChatRequest::new("gpt-4o", messages);
    
    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.options.temperature, None);
}

#[test]
fn test_chat_request_with_options() {
    let options = ChatOptions::new()
        .temperature(0.7)
        .max_tokens(100);
    
    let request = ChatRequest::new("claude-3-5-sonnet-latest", vec![Message::human("Hello")])
        .with_options(options);
    
    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_tokens, Some(100));
}

#[test]
fn test_token_usage_totals() {
    let usage = TokenUsage::new(12, 30);
    assert_eq!(usage.total_tokens, 42);
    
    let json = serde_json::to_value(usage).unwrap();
    assert_eq!(json["prompt_tokens"], 12);
    assert_eq!(json["completion_tokens"], 30);
}
