use crate::core::Storage;
use crate::domain::model::ChatEntry;
use crate::utils::error::Result;

pub const HISTORY_FILE: &str = "history.jsonl";

/// Question/answer log stored as JSON lines next to the reports.
pub struct ChatHistory<S: Storage> {
    storage: S,
    file: String,
}

impl<S: Storage> ChatHistory<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            file: HISTORY_FILE.to_string(),
        }
    }

    pub async fn append(&self, entry: &ChatEntry) -> Result<()> {
        let mut data = if self.storage.exists(&self.file).await {
            self.storage.read_file(&self.file).await?
        } else {
            Vec::new()
        };
        if !data.is_empty() && !data.ends_with(b"\n") {
            data.push(b'\n');
        }
        data.extend(serde_json::to_vec(entry)?);
        data.push(b'\n');

        self.storage.write_file(&self.file, &data).await
    }

    /// All entries, oldest first. Unreadable lines are skipped.
    pub async fn entries(&self) -> Result<Vec<ChatEntry>> {
        if !self.storage.exists(&self.file).await {
            return Ok(Vec::new());
        }
        let data = self.storage.read_file(&self.file).await?;
        let text = String::from_utf8_lossy(&data);

        let mut entries = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ChatEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!("Skipping history line {}: {}", line_no + 1, e),
            }
        }
        Ok(entries)
    }

    /// Newest first, optionally capped.
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<ChatEntry>> {
        let mut entries = self.entries().await?;
        entries.reverse();
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    pub async fn clear(&self) -> Result<()> {
        tracing::info!("🗑️ Clearing chat history");
        self.storage.write_file(&self.file, &[]).await
    }
}
