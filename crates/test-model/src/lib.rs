//! A local fake model for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::sync::{Arc, Mutex};

use alduin_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
    Turn,
};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Recorder {
    requests: Vec<ModelRequest>,
    attempts: HashMap<usize, u64>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. The step is selected by
/// the number of assistant turns already in the request, so the first query
/// gets the first preset, the query after one assistant turn gets the second
/// one, and so on. If there are no enough steps in the script, an error will
/// be returned.
///
/// Every request is recorded, and clones of the provider share the same
/// record, so a test can keep a clone around and inspect what the agent
/// sent.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Vec<PresetResponse>,
    recorder: Arc<Mutex<Recorder>>,
}

impl TestModelProvider {
    /// Creates a provider that answers with the given presets in order.
    #[inline]
    pub fn with_script(script: impl Into<Vec<PresetResponse>>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    /// Returns all requests received so far.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.recorder
            .lock()
            .map(|recorder| recorder.requests.clone())
            .unwrap_or_default()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.recorder
            .lock()
            .map(|recorder| recorder.requests.len())
            .unwrap_or_default()
    }

    fn respond(&self, req: &ModelRequest) -> Result<ModelResponse, Error> {
        let mut recorder = self.recorder.lock().map_err(|_| Error {
            message: "recorder is poisoned",
            kind: ErrorKind::Other,
        })?;
        recorder.requests.push(req.clone());

        let step_idx = req
            .turns
            .iter()
            .filter(|turn| matches!(turn, Turn::Assistant(_)))
            .count();
        let Some(preset) = self.script.get(step_idx) else {
            return Err(Error {
                message: "no enough steps",
                kind: ErrorKind::Other,
            });
        };

        if let Some(failures) = preset.failures {
            let attempts = recorder.attempts.entry(step_idx).or_default();
            *attempts += 1;
            if failures == 0 || *attempts <= failures {
                return Err(Error {
                    message: "preset failure",
                    kind: ErrorKind::RateLimitExceeded,
                });
            }
        }

        Ok(preset.to_response())
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        ready(self.respond(req))
    }
}
