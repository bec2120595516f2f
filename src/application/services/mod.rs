mod intake_validator;
mod job_poller;
mod transcription_service;

pub use intake_validator::{IntakeError, IntakeLimits, IntakeValidator, Upload, ValidationError};
pub use job_poller::{JobOutcome, JobPoller, NO_SPEECH_FALLBACK};
pub use transcription_service::{PipelineError, TranscriptionService};
