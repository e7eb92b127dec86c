use crate::domain::models::notification::FallbackEntry;
use crate::domain::ports::FallbackLog;
use crate::error::AppError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Append-only JSON-lines file of notifications no channel could
/// deliver. One entry per line so an operator can grep or tail it.
pub struct JsonFallbackLog {
    path: PathBuf,
}

impl JsonFallbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FallbackLog for JsonFallbackLog {
    async fn append(&self, entry: &FallbackEntry) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::InternalWithMsg(format!("Fallback log directory error: {}", e)))?;
        }

        let mut line = serde_json::to_string(entry)
            .map_err(|e| AppError::InternalWithMsg(format!("Fallback entry serialization error: {}", e)))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Fallback log open error: {}", e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Fallback log write error: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Fallback log flush error: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn appends_one_json_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("undelivered.jsonl");
        let log = JsonFallbackLog::new(&path);

        let entry = FallbackEntry {
            recipient: "customer@example.com".to_string(),
            subject: "Deposit due".to_string(),
            html_body: "<p>hello</p>".to_string(),
            booking_id: Some("b-1".to_string()),
            payment_link: Some("http://venue.example/pay?bookingId=b-1".to_string()),
            queued_at: Utc::now(),
        };
        log.append(&entry).await.unwrap();
        log.append(&entry).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FallbackEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.recipient, "customer@example.com");
        assert_eq!(
            parsed.payment_link.as_deref(),
            Some("http://venue.example/pay?bookingId=b-1")
        );

        // Wire names stay camelCase so operator tooling can rely on them.
        assert!(lines[0].contains("\"paymentLink\""));
        assert!(lines[0].contains("\"htmlBody\""));
    }
}
