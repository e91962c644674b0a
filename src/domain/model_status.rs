use std::fmt;

/// Whether the classifier came up at startup. Decided once; there is no
/// transition out of `Unavailable` short of restarting the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loaded,
    Unavailable,
}

impl ModelStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelStatus::Loaded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Loaded => "loaded",
            ModelStatus::Unavailable => "not loaded",
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
