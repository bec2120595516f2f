mod settings;

pub use settings::{
    AuthSettings, DatabaseSettings, IntakeSettings, LoggingSettings, PollingSettings,
    ProviderSettings, ServerSettings, Settings, StagingSettings,
};
