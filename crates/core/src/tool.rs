//! Tool call supports.

mod approval;
mod error;
mod function;
mod object;
mod registry;

use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;

pub use approval::Approval;
pub use error::{Error, ErrorKind};
pub use function::{Arguments, FnTool};
pub(crate) use object::AnyTool;
pub use registry::{Outcome, Registry};

use crate::schema::Signature;

/// The result of a tool call.
pub type ToolResult = Result<String, Error>;

/// A tool that can be called by the model.
///
/// Implementations of this trait should be stateless, and may not maintain any
/// internal state.
///
/// The tool can be context-aware, meaning it can access additional information
/// about the current execution context, such as the working directory or the
/// current user. To do this, make the context an immutable state of the tool,
/// which can be set during initialization, and copy it when executing.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    ///
    /// Its `JsonSchema` implementation is where the parameter list comes
    /// from: field names, types, defaults, and field doc comments.
    type Input: DeserializeOwned + JsonSchema + Send + 'static;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the Google-style doc text of the tool.
    ///
    /// The summary becomes the tool description. Entries of an `Args:`
    /// section describe parameters whose fields carry no doc comment.
    fn doc(&self) -> &str;

    /// Returns the signature of the tool.
    fn signature(&self) -> Signature {
        let schema = schema_for!(Self::Input).to_value();
        Signature::from_schema(self.name(), &schema).with_doc(self.doc())
    }

    /// Asks for the user's approval before the tool runs, if needed.
    fn make_approval(&self, _input: &Self::Input) -> Option<Approval> {
        None
    }

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}
