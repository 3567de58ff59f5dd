// Simulated unit of work
//
// Stand-in for real task execution: sleeps a uniformly random duration
// within the configured range, as the service's placeholder behavior.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use taskpool_core::{ExecutionError, Task, TaskExecutor};

/// Executes a task by sleeping a random duration in `[min_delay, max_delay]`.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    min_delay: Duration,
    max_delay: Duration,
}

impl SimulatedExecutor {
    /// # Panics
    ///
    /// Panics if `min_delay > max_delay`.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        assert!(min_delay <= max_delay, "delay range must be ordered");
        Self {
            min_delay,
            max_delay,
        }
    }
}

impl Default for SimulatedExecutor {
    /// 1-5 seconds, the original placeholder range
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(5))
    }
}

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn execute(&self, _task: &Task) -> Result<(), ExecutionError> {
        let millis = rand::thread_rng()
            .gen_range(self.min_delay.as_millis()..=self.max_delay.as_millis());
        tokio::time::sleep(Duration::from_millis(millis as u64)).await;
        Ok(())
    }
}
