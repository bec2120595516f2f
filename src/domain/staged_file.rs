use super::StoragePath;

/// Transient on-disk artifact between upload receipt and provider submission.
///
/// Owned by exactly one pipeline invocation; the orchestrator deletes it on
/// every exit path once the provider has been contacted.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub path: StoragePath,
    pub original_name: String,
    pub size_bytes: u64,
    pub media_type: String,
}

impl StagedFile {
    pub fn new(
        path: StoragePath,
        original_name: String,
        size_bytes: u64,
        media_type: String,
    ) -> Self {
        Self {
            path,
            original_name,
            size_bytes,
            media_type,
        }
    }
}
