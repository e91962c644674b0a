mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    LimitSettings, LoggingSettings, ModelProvider, ModelSettings, ServerSettings, Settings,
};
