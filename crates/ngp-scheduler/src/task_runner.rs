//! Walks the task catalogue once for an account and claims what is left.

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use ngp_client::RewardsApi;
use ngp_core::{TASK_CATALOGUE, TaskDefinition, TaskOutcome};

use crate::report::{ProgressEvent, Reporter};

#[derive(Debug, Clone)]
pub struct TaskRunner {
    catalogue: &'static [TaskDefinition],
    claim_delay: Duration,
}

impl TaskRunner {
    pub fn new(claim_delay: Duration) -> Self {
        Self {
            catalogue: &TASK_CATALOGUE,
            claim_delay,
        }
    }

    pub fn with_catalogue(mut self, catalogue: &'static [TaskDefinition]) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Produce one outcome per catalogue entry, in catalogue order.
    ///
    /// Completed codes are skipped without a request. Every claim is preceded
    /// by the full claim delay and attempted exactly once; a failed claim does
    /// not stop the ones after it.
    pub async fn run<C>(
        &self,
        client: &C,
        completed: &HashSet<String>,
        account: &str,
        reporter: &dyn Reporter,
    ) -> Vec<TaskOutcome>
    where
        C: RewardsApi + ?Sized,
    {
        let mut outcomes = Vec::with_capacity(self.catalogue.len());

        for task in self.catalogue {
            let outcome = if completed.contains(task.code) {
                TaskOutcome::skipped(task)
            } else {
                tokio::time::sleep(self.claim_delay).await;
                match client.claim_task(task.code).await {
                    Ok(reply) => TaskOutcome::succeeded(task, reply),
                    Err(e) => {
                        debug!(account, task = task.code, "claim failed: {e}");
                        TaskOutcome::failed(task, &e)
                    }
                }
            };

            reporter.report(&ProgressEvent::TaskSettled {
                account: account.to_string(),
                outcome: outcome.clone(),
            });
            outcomes.push(outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;
    use async_trait::async_trait;
    use ngp_core::{ActionReply, ApiError, PingReply, Profile, TaskStatus};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Claims fail for codes in `rejected`; every claim instant is recorded.
    #[derive(Default)]
    struct ClaimRecorder {
        rejected: HashSet<&'static str>,
        claims: Mutex<Vec<(String, Instant)>>,
    }

    #[async_trait]
    impl RewardsApi for ClaimRecorder {
        async fn fetch_profile(&self) -> Result<Profile, ApiError> {
            Ok(Profile::default())
        }

        async fn check_in(&self) -> Result<ActionReply, ApiError> {
            unreachable!("task runner never checks in")
        }

        async fn claim_task(&self, code: &str) -> Result<ActionReply, ApiError> {
            self.claims
                .lock()
                .unwrap()
                .push((code.to_string(), Instant::now()));
            if self.rejected.contains(code) {
                return Err(ApiError::Remote {
                    result_code: 400,
                    message: format!("{code} not eligible"),
                });
            }
            Ok(ActionReply {
                result_code: 200,
                message: "Task claimed".into(),
            })
        }

        async fn ping(&mut self) -> Result<PingReply, ApiError> {
            unreachable!("task runner never pings")
        }
    }

    fn completed(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_follow_catalogue_order_with_skips() {
        let client = ClaimRecorder::default();
        let reporter = RecordingReporter::new();
        let runner = TaskRunner::new(Duration::from_millis(1000));

        let outcomes = runner
            .run(&client, &completed(&["T001", "T002"]), "acct", &reporter)
            .await;

        assert_eq!(outcomes.len(), TASK_CATALOGUE.len());
        let codes: Vec<_> = outcomes.iter().map(|o| o.code.as_str()).collect();
        let expected: Vec<_> = TASK_CATALOGUE.iter().map(|t| t.code).collect();
        assert_eq!(codes, expected);

        assert_eq!(outcomes[0].status, TaskStatus::Skipped);
        assert_eq!(outcomes[1].status, TaskStatus::Skipped);
        assert_eq!(outcomes[0].result_code, 200);
        assert!(outcomes[2..].iter().all(|o| o.status == TaskStatus::Succeeded));

        let claimed: Vec<String> = client
            .claims
            .lock()
            .unwrap()
            .iter()
            .map(|(c, _)| c.clone())
            .collect();
        assert_eq!(claimed.len(), 14);
        assert!(!claimed.iter().any(|c| c == "T001" || c == "T002"));
        assert_eq!(reporter.events().len(), 16);
    }

    #[tokio::test(start_paused = true)]
    async fn test_claims_are_at_least_one_second_apart() {
        let client = ClaimRecorder::default();
        let runner = TaskRunner::new(Duration::from_millis(1000));
        let start = Instant::now();

        runner
            .run(&client, &HashSet::new(), "acct", &RecordingReporter::new())
            .await;

        let claims = client.claims.lock().unwrap();
        assert_eq!(claims.len(), 16);
        assert!(claims[0].1.duration_since(start) >= Duration::from_millis(1000));
        for pair in claims.windows(2) {
            assert!(pair[1].1.duration_since(pair[0].1) >= Duration::from_millis(1000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_claim_does_not_block_later_tasks() {
        let client = ClaimRecorder {
            rejected: ["T003", "T100"].into_iter().collect(),
            ..Default::default()
        };
        let runner = TaskRunner::new(Duration::from_millis(1000));

        let outcomes = runner
            .run(&client, &HashSet::new(), "acct", &RecordingReporter::new())
            .await;

        let failed: Vec<_> = outcomes
            .iter()
            .filter(|o| o.status == TaskStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].code, "T003");
        assert_eq!(failed[0].result_code, 400);
        assert_eq!(failed[0].message, "T003 not eligible");
        assert_eq!(outcomes.last().unwrap().status, TaskStatus::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_everything_completed_makes_no_requests_and_no_waits() {
        let client = ClaimRecorder::default();
        let runner = TaskRunner::new(Duration::from_millis(1000));
        let all: HashSet<String> = TASK_CATALOGUE.iter().map(|t| t.code.to_string()).collect();
        let start = Instant::now();

        let outcomes = runner
            .run(&client, &all, "acct", &RecordingReporter::new())
            .await;

        assert!(outcomes.iter().all(|o| o.status == TaskStatus::Skipped));
        assert!(client.claims.lock().unwrap().is_empty());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_catalogue() {
        static SHORT: [TaskDefinition; 2] = [
            TaskDefinition {
                code: "X1",
                display_name: "First",
            },
            TaskDefinition {
                code: "X2",
                display_name: "Second",
            },
        ];
        let client = ClaimRecorder::default();
        let runner = TaskRunner::new(Duration::from_millis(10)).with_catalogue(&SHORT);

        let outcomes = runner
            .run(&client, &completed(&["X2"]), "acct", &RecordingReporter::new())
            .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status, TaskStatus::Succeeded);
        assert_eq!(outcomes[1].status, TaskStatus::Skipped);
    }
}
