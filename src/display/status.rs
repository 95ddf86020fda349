//! Status and summary formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::classifier::TierDecision;
use crate::backup::coordinator::FilesystemOutcome;
use crate::backup::inventory::TierSummary;
use crate::models::RetentionPolicy;

#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Snapshots")]
    count: usize,
    #[tabled(rename = "Keep")]
    keep: u32,
    #[tabled(rename = "Newest")]
    newest: String,
    #[tabled(rename = "Taken")]
    taken: String,
}

/// Format one filesystem's tier inventory and today's decision
pub fn format_status(
    filesystem: &str,
    summaries: &[TierSummary],
    policy: &RetentionPolicy,
    decision: &TierDecision,
) -> String {
    let rows: Vec<TierRow> = summaries
        .iter()
        .map(|summary| TierRow {
            tier: summary.tier.to_string(),
            count: summary.count,
            keep: policy.keep_for(summary.tier),
            newest: summary
                .newest
                .as_ref()
                .map(|label| label.to_string())
                .unwrap_or_else(|| "-".to_string()),
            taken: summary
                .newest
                .as_ref()
                .and_then(|label| label.date())
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!(
        "{}\n{}\nNext run: {} ({})\n",
        filesystem,
        table,
        decision.label,
        decision.reason()
    )
}

/// Format the end-of-run summary, one line per processed filesystem
pub fn format_run_summary(outcomes: &[FilesystemOutcome]) -> String {
    let mut output = String::new();
    for outcome in outcomes {
        output.push_str(&format!(
            "  {}: {} ({}), {} snapshot(s) destroyed, {} store(s) archived\n",
            outcome.filesystem,
            outcome.decision.label,
            if outcome.decision.forced {
                "forced"
            } else {
                "scheduled"
            },
            outcome.destroyed.len(),
            outcome.archived.len(),
        ));
    }
    output
}
