use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tracing::Instrument;

use super::{Approval, Error, Tool, ToolResult};
use crate::schema::Signature;

pub(crate) type ApprovalHandler = Box<dyn Fn(Approval) + Send + Sync>;
pub(crate) type BoxedToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// A type-erased tool, as stored in the registry.
pub(crate) trait ToolObject: Send + Sync + 'static {
    fn signature(&self) -> Signature;

    fn execute(
        self: Arc<Self>,
        arguments: Map<String, Value>,
        on_request: &Option<ApprovalHandler>,
    ) -> BoxedToolFuture;
}

pub(crate) struct AnyTool<T: Tool>(pub T);

impl<T: Tool> ToolObject for AnyTool<T> {
    #[inline]
    fn signature(&self) -> Signature {
        self.0.signature()
    }

    fn execute(
        self: Arc<Self>,
        arguments: Map<String, Value>,
        on_request: &Option<ApprovalHandler>,
    ) -> BoxedToolFuture {
        let input: T::Input = match serde_json::from_value(Value::Object(arguments)) {
            Ok(input) => input,
            Err(err) => {
                let reason = format!("{err}");
                return Box::pin(std::future::ready(ToolResult::Err(
                    Error::invalid_input().with_reason(reason),
                )));
            }
        };

        let Some(mut approval) = self.0.make_approval(&input) else {
            return Box::pin(
                self.0.execute(input).instrument(debug_span!("tool execute")),
            );
        };

        let (approval_res_tx, approval_res_rx) = oneshot::channel();
        approval.set_tool(self.0.name());
        approval.on_result = Some(Box::new(move |result| {
            approval_res_tx.send(result).ok();
        }));

        if let Some(on_request) = on_request {
            on_request(approval);
        } else {
            // No request handler provided, assuming yolo mode.
            approval.approve();
        }

        Box::pin(
            async move {
                let Ok(approval_res) = approval_res_rx.await else {
                    return ToolResult::Err(
                        Error::permission_denied()
                            .with_reason("the approval was dropped"),
                    );
                };
                trace!("tool call approval result: {approval_res:?}");
                if !approval_res.approved {
                    let reason = approval_res
                        .why
                        .unwrap_or_else(|| "the user rejected the call".to_owned());
                    return ToolResult::Err(
                        Error::permission_denied().with_reason(reason),
                    );
                }
                self.0.execute(input).await
            }
            .instrument(debug_span!("tool execute")),
        )
    }
}
