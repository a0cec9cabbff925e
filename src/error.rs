use thiserror::Error;

/// Failures while opening the capture device. All of these are fatal to
/// `start()` and leave the loop idle; none of them is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("camera permission denied; grant camera access and start again")]
    PermissionDenied,

    #[error("no capture device available")]
    DeviceUnavailable,

    #[error("capture device is busy; close the application holding it")]
    DeviceBusy,
}

/// Why `start()` refused to bring the loop up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("expression model is not ready; load it before starting")]
    ProviderNotReady,
}

/// A single inference call failed. Per-tick and non-fatal: the tick is
/// treated as a no-detection tick and the next scheduled tick is the only
/// retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expression inference failed: {0}")]
pub struct InferenceError(pub String);
