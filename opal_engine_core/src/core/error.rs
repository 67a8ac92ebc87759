use std::fmt;

/// Unrecoverable engine failures.
///
/// Every variant is fatal: the driver refuses to proceed past the failed
/// lifecycle transition, unwinds whatever was already acquired, and the
/// binary terminates with a failure status. Nothing here is retried.
#[derive(Debug)]
pub enum EngineError {
    /// The event system failed to initialize.
    EventSystemInit,
    /// The platform window could not be created.
    WindowCreation(String),
    /// The graphics backend or GPU-side resources could not be brought up.
    GraphicsInit(String),
    /// A critical, unrecoverable rendering failure (e.g. the device ran out
    /// of memory while acquiring a frame).
    Render(String),
    /// The platform event loop itself failed.
    EventLoop(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EventSystemInit => {
                write!(f, "Failed to initialize the event system")
            }
            EngineError::WindowCreation(msg) => {
                write!(f, "Failed to create the platform window: {msg}")
            }
            EngineError::GraphicsInit(msg) => {
                write!(f, "Failed to initialize the graphics backend: {msg}")
            }
            EngineError::Render(msg) => {
                write!(f, "A critical rendering operation failed: {msg}")
            }
            EngineError::EventLoop(msg) => {
                write!(f, "The platform event loop failed: {msg}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failed_transition() {
        assert_eq!(
            format!("{}", EngineError::EventSystemInit),
            "Failed to initialize the event system"
        );
        assert_eq!(
            format!("{}", EngineError::WindowCreation("no display".to_string())),
            "Failed to create the platform window: no display"
        );
        assert_eq!(
            format!("{}", EngineError::GraphicsInit("no adapter".to_string())),
            "Failed to initialize the graphics backend: no adapter"
        );
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(EngineError::Render("oom".to_string()));
        assert!(err.source().is_none());
    }
}
