//! Request listener
//!
//! Receives control messages from the bus side, validates them, and hands
//! them to the controller. Invalid requests are logged and dropped.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use tremolo_core::request::Request;
use tremolo_core::traits::Actuator;
use tremolo_protocol::ControlMessage;

use crate::controller::Controller;
use crate::error::ControlError;

/// Listener loop
///
/// Never returns. Errors are logged; the loop keeps going.
pub async fn listener_loop<M, A, const N: usize>(
    controller: &mut Controller<'_, M, A>,
    inbox: &Channel<M, ControlMessage, N>,
) where
    M: RawMutex,
    A: Actuator,
{
    log_info!("Feedback listener started");

    loop {
        let message = inbox.receive().await;
        // Failures are already logged by dispatch
        let _ = dispatch(controller, &message).await;
    }
}

/// Validate one message and hand it to the controller
pub async fn dispatch<M, A>(
    controller: &mut Controller<'_, M, A>,
    message: &ControlMessage,
) -> Result<(), ControlError>
where
    M: RawMutex,
    A: Actuator,
{
    let request = Request::from_message(message).map_err(|e| {
        log_warn!("Invalid feedback request ignored: {:?}", e);
        ControlError::Invalid(e)
    })?;

    log_debug!("Feedback request for {:?}", request.kind());
    controller.handle(request).await.map_err(|e| {
        log_warn!("Feedback request failed: {:?}", e);
        e
    })
}

/// Decode a postcard-encoded message and dispatch it
pub async fn dispatch_bytes<M, A>(
    controller: &mut Controller<'_, M, A>,
    bytes: &[u8],
) -> Result<(), ControlError>
where
    M: RawMutex,
    A: Actuator,
{
    let message = ControlMessage::decode(bytes).map_err(|e| {
        log_warn!("Undecodable feedback message ({} bytes): {:?}", bytes.len(), e);
        ControlError::Decode(e)
    })?;
    dispatch(controller, &message).await
}
