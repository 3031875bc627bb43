use crate::window::Window;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WinsysError {
    #[error("another window manager is already running")]
    AnotherWmRunning,
    #[error("unable to set up window manager")]
    SetupFailed,
    #[error("could not parse setup information")]
    InvalidSetup,
    #[error("no usable screens are attached")]
    NoScreens,
    #[error("could not load keyboard mapping")]
    NoKeyboardMapping,
    #[error("request on window {window:#0x} rejected: {reason}")]
    Protocol {
        window: Window,
        reason: String,
    },
}

impl WinsysError {
    pub fn protocol(
        window: Window,
        reason: impl ToString,
    ) -> Self {
        Self::Protocol {
            window,
            reason: reason.to_string(),
        }
    }
}
