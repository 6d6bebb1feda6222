//! Thread identity resolution and history merging.
//!
//! The server hands out a UUID for every conversation that arrives without a
//! thread id. A client that later adopts its own id reports the old one as
//! `previousThreadId`, and the histories are folded together here. Merging is
//! keyed on `(role, content, model)` so replays never duplicate entries.

use parallax_types::{ModelResponse, Thread, ThreadMessage};

use crate::error::Result;
use crate::repositories::ThreadRepository;

/// Result of a `migrate` call. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    SameId,
    SourceMissing,
    Migrated { messages: usize },
    Failed(String),
}

impl MigrationOutcome {
    pub fn is_migrated(&self) -> bool {
        matches!(self, Self::Migrated { .. })
    }
}

/// Thread id and the history to use as context for the next turn
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub thread_id: String,
    pub history: Vec<ThreadMessage>,
}

#[derive(Debug, Clone)]
pub struct ThreadReconciler {
    threads: ThreadRepository,
}

impl ThreadReconciler {
    pub fn new(threads: ThreadRepository) -> Self {
        Self { threads }
    }
    
    pub fn threads(&self) -> &ThreadRepository {
        &self.threads
    }
    
    /// Client id if one was supplied, otherwise a fresh UUID v4.
    /// Browsers serialize missing values as `"null"`/`"undefined"`; those count as absent.
    pub fn resolve(client_thread_id: Option<&str>) -> String {
        match client_thread_id.map(str::trim) {
            Some(id) if !id.is_empty() && id != "null" && id != "undefined" => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        }
    }
    
    /// Whether `id` has the shape of a server-generated id
    pub fn is_generated_id(id: &str) -> bool {
        uuid::Uuid::parse_str(id).is_ok()
    }
    
    /// Fold the history stored under `old_id` into `new_id` and remove `old_id`.
    pub async fn migrate(&self, old_id: &str, new_id: &str) -> MigrationOutcome {
        match self.try_migrate(old_id, new_id).await {
            Ok(outcome) => {
                if let MigrationOutcome::Migrated { messages } = outcome {
                    tracing::info!(from = %old_id, to = %new_id, messages, "Migrated thread");
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(from = %old_id, to = %new_id, error = %e, "Thread migration failed");
                MigrationOutcome::Failed(e.to_string())
            }
        }
    }
    
    async fn try_migrate(&self, old_id: &str, new_id: &str) -> Result<MigrationOutcome> {
        if old_id == new_id {
            return Ok(MigrationOutcome::SameId);
        }
        let Some(old) = self.threads.find(old_id).await? else {
            return Ok(MigrationOutcome::SourceMissing);
        };
        
        let mut target = match self.threads.find(new_id).await? {
            Some(existing) => existing,
            None => Thread {
                id: new_id.to_string(),
                messages: Vec::new(),
                models: Vec::new(),
                created_at: old.created_at,
                updated_at: old.updated_at,
            },
        };
        
        target.messages = merge_histories(&old.messages, &target.messages);
        let mut models = old.models.clone();
        models.extend(target.models.iter().cloned());
        target.models.clear();
        target.add_models(&models);
        target.touch();
        
        self.threads.save(&target).await?;
        self.threads.delete(old_id).await?;
        Ok(MigrationOutcome::Migrated {
            messages: target.messages.len(),
        })
    }
    
    /// Most recently updated generated-id thread whose first user message is
    /// `prompt`. Linear scan over every thread file.
    pub async fn find_by_first_prompt(&self, prompt: &str, exclude: &str) -> Result<Option<String>> {
        let mut best: Option<Thread> = None;
        for id in self.threads.list_ids().await? {
            if id == exclude || !Self::is_generated_id(&id) {
                continue;
            }
            let thread = match self.threads.get(&id).await {
                Ok(thread) => thread,
                Err(e) => {
                    tracing::debug!(thread_id = %id, error = %e, "Skipping thread during prompt scan");
                    continue;
                }
            };
            if thread.first_prompt() != Some(prompt) {
                continue;
            }
            if best.as_ref().map_or(true, |b| thread.updated_at > b.updated_at) {
                best = Some(thread);
            }
        }
        Ok(best.map(|t| t.id))
    }
    
    /// Resolve the thread id for a turn, run any pending migration and load
    /// the history. Client-held `previous_messages` seed an empty thread.
    pub async fn prepare_turn(
        &self,
        client_thread_id: Option<&str>,
        previous_thread_id: Option<&str>,
        previous_messages: &[ThreadMessage],
    ) -> Result<TurnContext> {
        let thread_id = Self::resolve(client_thread_id);
        let client_supplied = client_thread_id.map(str::trim) == Some(thread_id.as_str());
        
        match previous_thread_id.filter(|id| !id.trim().is_empty()) {
            Some(previous) if Self::is_generated_id(previous) && previous != thread_id => {
                self.migrate(previous, &thread_id).await;
            }
            Some(_) => {}
            None => {
                if client_supplied && !self.threads.exists(&thread_id).await? {
                    self.migrate_by_first_prompt(&thread_id, previous_messages).await;
                }
            }
        }
        
        let mut thread = self
            .threads
            .find(&thread_id)
            .await?
            .unwrap_or_else(|| Thread::new(&thread_id));
        
        let seed: Vec<ThreadMessage> = previous_messages
            .iter()
            .filter(|m| !m.is_error())
            .cloned()
            .collect();
        if thread.is_empty() && !seed.is_empty() {
            thread.messages = merge_histories(&[], &seed);
            thread.touch();
            self.threads.save(&thread).await?;
            tracing::debug!(thread_id = %thread_id, seeded = thread.messages.len(), "Seeded thread from client history");
        }
        
        Ok(TurnContext {
            thread_id,
            history: thread.messages,
        })
    }
    
    async fn migrate_by_first_prompt(&self, thread_id: &str, previous_messages: &[ThreadMessage]) {
        let Some(first_prompt) = previous_messages.iter().find(|m| m.is_user()) else {
            return;
        };
        match self.find_by_first_prompt(&first_prompt.content, thread_id).await {
            Ok(Some(source)) => {
                self.migrate(&source, thread_id).await;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(thread_id = %thread_id, error = %e, "Prompt scan failed"),
        }
    }
    
    /// Persist one turn: the user prompt plus every successful response.
    ///
    /// Error responses are never stored. A resubmitted prompt whose replies are
    /// all already recorded under the last user message changes nothing; any
    /// new reply starts a fresh turn.
    pub async fn save_turn(
        &self,
        thread_id: &str,
        prompt: &str,
        responses: &[ModelResponse],
        active_models: &[String],
    ) -> Result<Thread> {
        let mut thread = self
            .threads
            .find(thread_id)
            .await?
            .unwrap_or_else(|| Thread::new(thread_id));
        
        if let Some(fallback) = active_models.first() {
            backfill_models(&mut thread.messages, fallback);
        }
        
        let replies: Vec<ThreadMessage> = responses
            .iter()
            .filter(|r| !r.is_error())
            .map(|r| ThreadMessage::assistant(r.response.as_str(), r.model.as_str()).with_usage(r.usage))
            .collect();
        
        if is_retry(&thread.messages, prompt, &replies) {
            tracing::debug!(thread_id = %thread_id, "Resubmitted turn already recorded");
        } else {
            thread.messages.push(ThreadMessage::user(prompt));
            let turn_start = thread.messages.len();
            for reply in replies {
                if !thread.messages[turn_start..].iter().any(|m| m.same_entry(&reply)) {
                    thread.messages.push(reply);
                }
            }
        }
        
        thread.add_models(active_models);
        thread.touch();
        self.threads.save(&thread).await?;
        Ok(thread)
    }
}

/// Append each entry of `incoming` to `base` unless its dedup key is already present
pub fn merge_histories(base: &[ThreadMessage], incoming: &[ThreadMessage]) -> Vec<ThreadMessage> {
    let mut merged = base.to_vec();
    for message in incoming {
        if !merged.iter().any(|m| m.same_entry(message)) {
            merged.push(message.clone());
        }
    }
    merged
}

/// Context for one model: every user message plus the assistant messages
/// produced by `model` or untagged. Failed-call entries are dropped.
pub fn filter_for_model(messages: &[ThreadMessage], model: &str) -> Vec<ThreadMessage> {
    messages
        .iter()
        .filter(|m| {
            m.is_user()
                || (m.is_assistant()
                    && !m.is_error()
                    && m.model.as_deref().map_or(true, |tag| tag == model))
        })
        .cloned()
        .collect()
}

/// Tag untagged assistant messages with `fallback`
fn backfill_models(messages: &mut [ThreadMessage], fallback: &str) {
    for message in messages.iter_mut().filter(|m| m.is_assistant() && m.model.is_none()) {
        message.model = Some(fallback.to_string());
    }
}

/// The last user message repeats `prompt` and every reply is already among
/// the assistant messages that follow it
fn is_retry(messages: &[ThreadMessage], prompt: &str, replies: &[ThreadMessage]) -> bool {
    let Some(index) = messages.iter().rposition(|m| m.is_user()) else {
        return false;
    };
    let turn = &messages[index + 1..];
    messages[index].content == prompt
        && turn.iter().all(|m| m.is_assistant())
        && replies.iter().all(|r| turn.iter().any(|m| m.same_entry(r)))
}
