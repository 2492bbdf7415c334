// Loading state for async data.

/// Where an async load stands. Only one variant holds at a time, so a
/// second `Loading` while already loading is detectable, not representable twice.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadingState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let idle: LoadingState<u8> = LoadingState::default();
        assert!(!idle.is_loading() && idle.data().is_none());

        assert!(LoadingState::<u8>::Loading.is_loading());

        let loaded = LoadingState::Loaded(7u8);
        assert!(loaded.is_loaded());
        assert_eq!(loaded.data(), Some(&7));

        let failed: LoadingState<u8> = LoadingState::Error("boom".into());
        assert_eq!(failed.error(), Some("boom"));
    }
}
