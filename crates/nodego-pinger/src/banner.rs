use chrono::{DateTime, Local};

const BANNER_WIDTH: usize = 50;

pub fn banner_lines(started: DateTime<Local>) -> Vec<String> {
    let rule = "=".repeat(BANNER_WIDTH);
    vec![
        rule.clone(),
        format!("Started at: {}", started.format("%Y-%m-%d %H:%M:%S")),
        rule,
    ]
}

pub fn print_banner() {
    for line in banner_lines(Local::now()) {
        println!("{line}");
    }
}
