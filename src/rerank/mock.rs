use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::RerankError;
use super::RerankScorer;

/// In-memory scorer for tests.
///
/// Logit pairs are programmed per document substring; prompts that match no
/// programmed entry get `(0.0, 0.0)` (calibrates to 0.5). Call counts are
/// tracked so tests can assert the scorer was never invoked.
#[derive(Default)]
pub struct MockRerankScorer {
    programmed: Vec<(String, (f32, f32))>,
    fail: bool,
    truncate_batch: bool,
    calls: Mutex<u64>,
}

impl MockRerankScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores any prompt containing `doc_substr` with the given logit pair.
    pub fn with_logits(mut self, doc_substr: impl Into<String>, logits: (f32, f32)) -> Self {
        self.programmed.push((doc_substr.into(), logits));
        self
    }

    /// Makes every call fail, for exercising degradation paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Returns one pair fewer than requested, for exercising the
    /// mismatched-batch path.
    pub fn truncating() -> Self {
        Self {
            truncate_batch: true,
            ..Self::default()
        }
    }

    /// Number of `score_batch` calls made so far.
    pub fn call_count(&self) -> u64 {
        *self.calls.lock()
    }
}

#[async_trait]
impl RerankScorer for MockRerankScorer {
    async fn score_batch(&self, prompts: &[String]) -> Result<Vec<(f32, f32)>, RerankError> {
        *self.calls.lock() += 1;

        if self.fail {
            return Err(RerankError::RequestFailed {
                url: "mock://reranker".to_string(),
                message: "mock failure".to_string(),
            });
        }

        let mut logits: Vec<(f32, f32)> = prompts
            .iter()
            .map(|prompt| {
                self.programmed
                    .iter()
                    .find(|(substr, _)| prompt.contains(substr.as_str()))
                    .map(|(_, pair)| *pair)
                    .unwrap_or((0.0, 0.0))
            })
            .collect();

        if self.truncate_batch {
            logits.pop();
        }

        Ok(logits)
    }
}
