// file: src/utils/telemetry.rs
// description: operation timing for pipeline stages and cli commands
// reference: elapsed-time checkpoints logged through tracing

use std::time::{Duration, Instant};
use tracing::info;

/// Logs the start, checkpoints and completion of a named operation
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    /// Finish and log the throughput of `count` units of work (model calls, results).
    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} - {} calls in {:.2}s ({:.2}s per call)",
            self.operation,
            count,
            elapsed.as_secs_f64(),
            if count > 0 {
                elapsed.as_secs_f64() / count as f64
            } else {
                0.0
            }
        );
        elapsed
    }

    pub fn checkpoint(&self, message: &str) {
        info!(
            "Operation checkpoint [{}]: {} at {:.2}s",
            self.operation,
            message,
            self.elapsed().as_secs_f64()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test");
        std::thread::sleep(Duration::from_millis(10));
        timer.checkpoint("halfway");
        let elapsed = timer.finish();
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn test_finish_with_zero_count() {
        let timer = OperationTimer::new("empty");
        assert!(timer.finish_with_count(0) < Duration::from_secs(5));
    }
}
