//! Controller errors

use tremolo_core::request::RequestError;
use tremolo_core::traits::ActuatorError;
use tremolo_protocol::CodecError;

/// Errors returned by the controller to the request source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    /// Inbound bytes are not a control message
    Decode(CodecError),
    /// Request rejected at the boundary; nothing changed
    Invalid(RequestError),
    /// Direct write to the device failed
    Actuator(ActuatorError),
}

impl From<RequestError> for ControlError {
    fn from(e: RequestError) -> Self {
        ControlError::Invalid(e)
    }
}

impl From<ActuatorError> for ControlError {
    fn from(e: ActuatorError) -> Self {
        ControlError::Actuator(e)
    }
}

impl From<CodecError> for ControlError {
    fn from(e: CodecError) -> Self {
        ControlError::Decode(e)
    }
}
