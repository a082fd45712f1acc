//! Account orchestration: load-once roster, sequential onboarding, then the
//! repeating ping cycle until cancelled.
//!
//! Accounts are processed strictly one after another. Cancellation is checked
//! before each account and before the inter-cycle sleep; an account already
//! in progress finishes its calls. A fresh client is built for every account
//! turn, so ping spacing is only enforced within one turn, not across cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ngp_client::{ClientFactory, RewardsApi};
use ngp_core::{Account, ActionReply, ApiError, PingReply, TASK_CATALOGUE, TaskDefinition, TaskOutcome};

use crate::report::{Phase, ProgressEvent, Reporter};
use crate::task_runner::TaskRunner;

/// Fixed delays driving the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub claim_delay: Duration,
    pub cycle_delay: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            claim_delay: Duration::from_millis(1000),
            cycle_delay: Duration::from_millis(15000),
        }
    }
}

/// What happened to one account during onboarding.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingReport {
    pub account_index: usize,
    pub username: Option<String>,
    pub check_in: Option<Result<ActionReply, ApiError>>,
    pub outcomes: Vec<TaskOutcome>,
    /// Set when the account could not be onboarded at all.
    pub error: Option<ApiError>,
}

impl OnboardingReport {
    fn new(account_index: usize) -> Self {
        Self {
            account_index,
            username: None,
            check_in: None,
            outcomes: Vec::new(),
            error: None,
        }
    }

    pub fn completed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// True when cancellation cut the pass short.
    pub cancelled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub onboarding: Vec<OnboardingReport>,
    pub cycles: Vec<CycleReport>,
}

pub struct Orchestrator<F: ClientFactory> {
    roster: Vec<Account>,
    factory: F,
    schedule: Schedule,
    catalogue: &'static [TaskDefinition],
    reporter: Arc<dyn Reporter>,
}

impl<F: ClientFactory> Orchestrator<F> {
    pub fn new(
        roster: Vec<Account>,
        factory: F,
        schedule: Schedule,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            roster,
            factory,
            schedule,
            catalogue: &TASK_CATALOGUE,
            reporter,
        }
    }

    pub fn with_catalogue(mut self, catalogue: &'static [TaskDefinition]) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Onboard every account once, then ping forever until `cancel` fires.
    pub async fn run(&self, cancel: &CancellationToken) -> RunSummary {
        let mut summary = RunSummary {
            onboarding: self.onboard_all(cancel).await,
            cycles: Vec::new(),
        };

        if !cancel.is_cancelled() {
            self.reporter.report(&ProgressEvent::PingPhaseStarted);
        }

        let mut cycle = 0u64;
        while !cancel.is_cancelled() {
            cycle += 1;
            let report = self.ping_cycle(cycle, cancel).await;
            info!(
                cycle,
                succeeded = report.succeeded,
                failed = report.failed,
                "ping cycle finished"
            );
            summary.cycles.push(report);

            if cancel.is_cancelled() {
                break;
            }
            self.reporter.report(&ProgressEvent::Waiting {
                delay: self.schedule.cycle_delay,
            });
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.schedule.cycle_delay) => {}
            }
        }

        debug!("orchestrator stopped after {} cycle(s)", summary.cycles.len());
        summary
    }

    /// Run onboarding for each account in roster order.
    pub async fn onboard_all(&self, cancel: &CancellationToken) -> Vec<OnboardingReport> {
        self.reporter.report(&ProgressEvent::OnboardingPhaseStarted {
            accounts: self.roster.len(),
        });

        let mut reports = Vec::with_capacity(self.roster.len());
        for account in &self.roster {
            if cancel.is_cancelled() {
                info!("onboarding interrupted by shutdown");
                break;
            }
            reports.push(self.onboard_account(account).await);
        }
        reports
    }

    /// Profile, check-in, then the task catalogue. Only a failure to build
    /// the client or fetch the profile aborts the account.
    pub async fn onboard_account(&self, account: &Account) -> OnboardingReport {
        let label = account.label();
        let mut report = OnboardingReport::new(account.index);

        let client = match self.factory.connect(account) {
            Ok(client) => client,
            Err(e) => return self.fail_onboarding(report, &label, e),
        };

        let profile = match client.fetch_profile().await {
            Ok(profile) => profile,
            Err(e) => return self.fail_onboarding(report, &label, e),
        };
        self.reporter.report(&ProgressEvent::OnboardingStarted {
            account: label.clone(),
            username: profile.username.clone(),
            email: profile.email.clone(),
        });
        report.username = Some(profile.username.clone());

        let check_in = client.check_in().await;
        if let Err(e) = &check_in {
            warn!(account = %label, "daily check-in failed: {e}");
        }
        self.reporter.report(&ProgressEvent::CheckIn {
            account: label.clone(),
            result: check_in.clone(),
        });
        report.check_in = Some(check_in);

        self.reporter.report(&ProgressEvent::TasksStarted {
            account: label.clone(),
        });
        let runner = TaskRunner::new(self.schedule.claim_delay).with_catalogue(self.catalogue);
        report.outcomes = runner
            .run(
                &client,
                &profile.completed_task_codes,
                &label,
                self.reporter.as_ref(),
            )
            .await;

        self.reporter
            .report(&ProgressEvent::OnboardingFinished { account: label });
        report
    }

    fn fail_onboarding(
        &self,
        mut report: OnboardingReport,
        label: &str,
        error: ApiError,
    ) -> OnboardingReport {
        warn!(account = %label, "onboarding aborted: {error}");
        self.reporter.report(&ProgressEvent::AccountFailed {
            account: label.to_string(),
            phase: Phase::Onboarding,
            error: error.clone(),
        });
        report.error = Some(error);
        report
    }

    /// One pass over the roster. Errors are contained per account.
    pub async fn ping_cycle(&self, cycle: u64, cancel: &CancellationToken) -> CycleReport {
        self.reporter.report(&ProgressEvent::CycleStarted { cycle });
        let mut report = CycleReport {
            cycle,
            ..Default::default()
        };

        for account in &self.roster {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            report.attempted += 1;
            match self.ping_account(account).await {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    report.failed += 1;
                    self.reporter.report(&ProgressEvent::AccountFailed {
                        account: account.label(),
                        phase: Phase::Ping,
                        error: e,
                    });
                }
            }
        }
        report
    }

    /// Profile, ping, then a refreshed profile for node points.
    pub async fn ping_account(&self, account: &Account) -> Result<PingReply, ApiError> {
        let label = account.label();
        let mut client = self.factory.connect(account)?;

        let profile = client.fetch_profile().await?;
        self.reporter.report(&ProgressEvent::PingStarted {
            account: label.clone(),
            username: profile.username,
        });

        let reply = client.ping().await?;
        self.reporter.report(&ProgressEvent::Pinged {
            account: label.clone(),
            reply: reply.clone(),
        });

        let refreshed = client.fetch_profile().await?;
        if !refreshed.nodes.is_empty() {
            self.reporter.report(&ProgressEvent::NodeStatus {
                account: label,
                nodes: refreshed.nodes,
            });
        }
        Ok(reply)
    }
}
