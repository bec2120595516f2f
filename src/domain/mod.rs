mod owner;
mod provider_job;
mod staged_file;
mod storage_path;
mod transcript;

pub use owner::OwnerId;
pub use provider_job::{JobId, JobStatus, UploadHandle};
pub use staged_file::StagedFile;
pub use storage_path::StoragePath;
pub use transcript::{RecordStatus, TranscriptId, TranscriptRecord};
