//! BoxCompletionGateway -- object-safe dynamic dispatch wrapper for CompletionGateway.
//!
//! 1. `CompletionGatewayDyn` is the object-safe twin with a boxed future
//! 2. Blanket-impl `CompletionGatewayDyn` for all `T: CompletionGateway`
//! 3. `BoxCompletionGateway` wraps `Box<dyn CompletionGatewayDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use coursebot_types::llm::{CompletionRequest, LlmError};

use super::gateway::CompletionGateway;

/// Object-safe version of [`CompletionGateway`] with a boxed future.
pub trait CompletionGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;
}

impl<T: CompletionGateway> CompletionGatewayDyn for T {
    fn name(&self) -> &str {
        CompletionGateway::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased completion gateway.
///
/// `CompletionGateway` uses RPITIT and cannot be a trait object directly, so
/// application state holds this wrapper instead.
pub struct BoxCompletionGateway {
    inner: Box<dyn CompletionGatewayDyn + Send + Sync>,
}

impl BoxCompletionGateway {
    pub fn new<T: CompletionGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.inner.complete_boxed(request).await
    }
}
