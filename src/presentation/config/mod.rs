mod settings;

pub use settings::{
    AnnotatorProvider, DatabaseSettings, LlmSettings, LoggingSettings, ServerSettings, Settings,
    SettingsError, StorageSettings,
};
