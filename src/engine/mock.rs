use std::collections::VecDeque;
use std::sync::Mutex;

use crate::engine::{Engine, EngineOutput, EngineRequest};
use crate::error::Result;

/// Records every request and answers with scripted exit codes
///
/// On a zero exit the output file is created, the way the real engine would.
pub(crate) struct MockEngine {
    calls: Mutex<Vec<EngineRequest>>,
    exit_codes: Mutex<VecDeque<i32>>,
}

impl MockEngine {
    pub(crate) fn succeeding() -> Self {
        Self::with_exit_codes(&[])
    }

    /// Codes are consumed in call order; once exhausted every call succeeds
    pub(crate) fn with_exit_codes(codes: &[i32]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_codes: Mutex::new(codes.iter().copied().collect()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<EngineRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Engine for MockEngine {
    async fn invoke(&self, request: &EngineRequest) -> Result<EngineOutput> {
        self.calls.lock().unwrap().push(request.clone());
        let code = self.exit_codes.lock().unwrap().pop_front().unwrap_or(0);

        if code == 0 {
            std::fs::write(&request.output, b"mock output")?;
            return Ok(EngineOutput {
                exit_code: Some(0),
                diagnostics: String::new(),
            });
        }

        Ok(EngineOutput {
            exit_code: Some(code),
            diagnostics: format!("{}: Conversion failed!", request.output.display()),
        })
    }
}
