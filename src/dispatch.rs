//! Request dispatcher: protocol operation → registry call → envelope.
//!
//! [`Dispatcher`] is stateless per call; the injected [`VolumeRegistry`] is
//! the only component with state transitions.  Domain errors never escape
//! as transport failures: they are flattened into the envelope's `Err`
//! string.  The sole exception is a violation of the wire contract itself
//! (unknown method, undecodable body, unencodable response), which
//! surfaces as [`DriverError::Protocol`].

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::error::DriverError;
use crate::protocol::{DriverRequest, DriverResponse};
use crate::registry::VolumeRegistry;

/// Translates protocol operations into registry calls.
pub struct Dispatcher {
    registry: Arc<VolumeRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher serving the given registry.
    pub fn new(registry: Arc<VolumeRegistry>) -> Self {
        Self { registry }
    }

    /// Handle one protocol exchange: decode the request, invoke the
    /// registry, and encode the response envelope.
    ///
    /// The returned bytes are always a well-formed envelope; callers
    /// distinguish failure purely by the `Err` field.  An `Err` return
    /// from this function means the exchange itself was malformed and the
    /// transport should report a fault.
    #[instrument(skip(self, body))]
    pub async fn handle(&self, method: &str, body: &[u8]) -> Result<Vec<u8>, DriverError> {
        let request = DriverRequest::parse(method, body)?;
        debug!(%request, "request received");

        let response = self.dispatch(request).await;
        serde_json::to_vec(&response).map_err(|e| {
            error!(error = %e, "response envelope failed to encode");
            DriverError::protocol(e)
        })
    }

    /// Map a decoded operation to the corresponding registry method and
    /// wrap the result in the response envelope.
    pub async fn dispatch(&self, request: DriverRequest) -> DriverResponse {
        match request {
            DriverRequest::Capabilities => {
                DriverResponse::with_capabilities(self.registry.capabilities())
            }
            DriverRequest::List => DriverResponse::with_volumes(self.registry.list().await),
            DriverRequest::Create(req) => match self.registry.create(&req.name, req.options).await
            {
                Ok(()) => DriverResponse::ok(),
                Err(e) => DriverResponse::error(&e),
            },
            DriverRequest::Remove(req) => match self.registry.remove(&req.name).await {
                Ok(()) => DriverResponse::ok(),
                Err(e) => DriverResponse::error(&e),
            },
            DriverRequest::Get(req) => match self.registry.get(&req.name).await {
                Ok(record) => DriverResponse::with_volume(record),
                Err(e) => DriverResponse::error(&e),
            },
        }
    }
}
