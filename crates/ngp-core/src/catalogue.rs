//! The fixed catalogue of one-time reward tasks, in claim order.

use crate::types::TaskDefinition;

const fn task(code: &'static str, display_name: &'static str) -> TaskDefinition {
    TaskDefinition { code, display_name }
}

pub const TASK_CATALOGUE: [TaskDefinition; 16] = [
    task("T001", "Verify Email"),
    task("T002", "Join Telegram Channel"),
    task("T003", "Join Telegram Group"),
    task("T004", "Boost Telegram Channel"),
    task("T005", "Follow us on X"),
    task("T006", "Rate Chrome Extension"),
    task("T007", "Join Telegram MiniApp"),
    task("T009", "Join Discord Channel"),
    task("T010", "Add NodeGo.Ai to name"),
    task("T011", "Share Referral Link on X"),
    task("T012", "Retweet US"),
    task("T014", "Comment and Tag 3 friends"),
    task("T100", "Invite 1 friend"),
    task("T101", "Invite 3 friends"),
    task("T102", "Invite 5 friends"),
    task("T103", "Invite 10 friends"),
];
