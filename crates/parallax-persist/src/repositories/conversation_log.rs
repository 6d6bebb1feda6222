use chrono::NaiveDate;

use crate::error::{PersistError, Result};
use crate::layout::{JSON_SUFFIX, LOGS_DIR};
use crate::models::ConversationLog;
use crate::store::FileStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-day log of every comparison request
#[derive(Debug, Clone)]
pub struct ConversationLogRepository {
    store: FileStore,
}

impl ConversationLogRepository {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
    
    fn key(log: &ConversationLog) -> String {
        let date = log.timestamp.format(DATE_FORMAT);
        let time = log.timestamp.format("%H%M%S-%3f");
        let short_id: String = log.id.chars().take(8).collect();
        format!("{}/{}/{}-{}{}", LOGS_DIR, date, time, short_id, JSON_SUFFIX)
    }
    
    fn parse_date(date: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| PersistError::Validation(format!("invalid date: {date}")))
    }
    
    pub async fn write(&self, log: &ConversationLog) -> Result<()> {
        self.store.write(&Self::key(log), log).await
    }
    
    /// Write a log entry; failures are logged and swallowed
    pub async fn record(&self, log: &ConversationLog) {
        if let Err(e) = self.write(log).await {
            tracing::warn!(log_id = %log.id, error = %e, "Failed to write conversation log");
        }
    }
    
    /// Dates that have logs, newest first
    pub async fn list_dates(&self) -> Result<Vec<String>> {
        let mut dates: Vec<String> = self
            .store
            .list_dirs(LOGS_DIR)
            .await?
            .into_iter()
            .filter(|d| Self::parse_date(d).is_ok())
            .collect();
        dates.reverse();
        Ok(dates)
    }
    
    /// Entries logged on `date`, in write order
    pub async fn list(&self, date: &str) -> Result<Vec<ConversationLog>> {
        Self::parse_date(date)?;
        let dir = format!("{}/{}", LOGS_DIR, date);
        let mut logs = Vec::new();
        for name in self.store.list(&dir, Some(JSON_SUFFIX)).await? {
            match self.store.read::<ConversationLog>(&format!("{}/{}", dir, name)).await {
                Ok(log) => logs.push(log),
                Err(e) => tracing::warn!(file = %name, error = %e, "Skipping unreadable log file"),
            }
        }
        logs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use parallax_types::ModelResponse;
    use tempfile::TempDir;
    
    #[tokio::test]
    async fn test_log_layout_and_listing() {
        let dir = TempDir::new().unwrap();
        let logs = ConversationLogRepository::new(FileStore::new(dir.path()));
        
        let mut log = ConversationLog::new(
            Some("t1".to_string()),
            "Hello",
            vec!["a".to_string()],
            vec![ModelResponse::success("a", "Hi", None)],
        );
        log.timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        logs.record(&log).await;
        
        let mut older = log.clone();
        older.timestamp = Utc.with_ymd_and_hms(2024, 3, 8, 9, 0, 0).unwrap();
        logs.record(&older).await;
        
        let short_id: String = log.id.chars().take(8).collect();
        let expected = dir
            .path()
            .join(format!("logs/2024-03-09/140507-000-{}.json", short_id));
        assert!(expected.exists());
        
        assert_eq!(logs.list_dates().await.unwrap(), vec!["2024-03-09", "2024-03-08"]);
        assert_eq!(logs.list("2024-03-09").await.unwrap(), vec![log]);
        assert!(logs.list("2024-01-01").await.unwrap().is_empty());
    }
    
    #[tokio::test]
    async fn test_list_rejects_bad_date() {
        let dir = TempDir::new().unwrap();
        let logs = ConversationLogRepository::new(FileStore::new(dir.path()));
        assert!(matches!(
            logs.list("../config").await.unwrap_err(),
            PersistError::Validation(_)
        ));
    }
}
