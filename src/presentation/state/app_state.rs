use std::sync::Arc;

use crate::application::ports::{IdentityResolver, SpeechProvider};
use crate::application::services::TranscriptionService;

pub struct AppState<P>
where
    P: SpeechProvider,
{
    pub transcription_service: Arc<TranscriptionService<P>>,
    pub identity_resolver: Arc<dyn IdentityResolver>,
}

impl<P> Clone for AppState<P>
where
    P: SpeechProvider,
{
    fn clone(&self) -> Self {
        Self {
            transcription_service: Arc::clone(&self.transcription_service),
            identity_resolver: Arc::clone(&self.identity_resolver),
        }
    }
}
