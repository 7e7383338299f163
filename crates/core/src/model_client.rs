use std::pin::Pin;
use std::sync::Arc;

use alduin_model::{
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // Erase `P` so that the agent doesn't need a generic parameter.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!(
                        "sending a request with {} turns and {} tools",
                        req.turns.len(),
                        req.tools.len()
                    );
                    match fut.await {
                        Ok(resp) => {
                            trace!("got a response: {resp:?}");
                            Ok(resp)
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn ModelProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the complete response.
    #[inline]
    pub async fn send_request(&self, req: ModelRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}
