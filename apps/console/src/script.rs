use chrono::{DateTime, Utc};
use planner_core::{
    ChangeWizard, EligibilityWindow, FixedClock, GatingMode, InMemoryRepository,
    SimulatedBackend, WizardConfig,
};
use serde::Deserialize;
use shared::{
    domain::{ChangeKind, Urgency},
    error::ApiError,
    protocol::Session,
};
use tracing::debug;

/// Scripted host interaction for one wizard. A `window` makes it a suggestion wizard.
#[derive(Debug, Clone, Deserialize)]
pub struct WizardScript {
    pub session: Session,
    #[serde(default)]
    pub window: Option<EligibilityWindow>,
    #[serde(default)]
    pub gating: Option<GatingMode>,
    pub steps: Vec<TimedStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimedStep {
    /// Evaluation time for gates. Defaults to the wall clock.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub step: ScriptStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    SelectKind { kind: ChangeKind },
    UpdateField { field: String, value: String },
    SetUrgency { urgency: Urgency },
    Review,
    Preview,
    Back,
    Confirm,
    Cancel,
    Restart,
}

impl ScriptStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptStep::SelectKind { .. } => "select_kind",
            ScriptStep::UpdateField { .. } => "update_field",
            ScriptStep::SetUrgency { .. } => "set_urgency",
            ScriptStep::Review => "review",
            ScriptStep::Preview => "preview",
            ScriptStep::Back => "back",
            ScriptStep::Confirm => "confirm",
            ScriptStep::Cancel => "cancel",
            ScriptStep::Restart => "restart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub action: &'static str,
    pub step_after: String,
    pub outcome: Result<String, ApiError>,
}

pub fn parse_script(raw: &str) -> serde_json::Result<WizardScript> {
    serde_json::from_str(raw)
}

/// Drives a fresh wizard through every step. Rejections are reported, never fatal.
pub async fn run_script(
    script: &WizardScript,
    default_gating: GatingMode,
    backend: &SimulatedBackend,
) -> (ChangeWizard, Vec<StepReport>) {
    let config = match script.window {
        Some(window) => WizardConfig::suggestion(window),
        None => WizardConfig::session_change(),
    }
    .with_gating(script.gating.unwrap_or(default_gating));
    let repository = InMemoryRepository::with_data(vec![script.session.clone()], Vec::new());
    let mut wizard = ChangeWizard::open(script.session.id, config);

    let mut reports = Vec::with_capacity(script.steps.len());
    for timed in &script.steps {
        let now = timed.now.unwrap_or_else(Utc::now);
        let outcome = match &timed.step {
            ScriptStep::SelectKind { kind } => wizard
                .select_kind(*kind)
                .map(|_| format!("kind={kind}")),
            ScriptStep::UpdateField { field, value } => wizard
                .update_field_named(field, value.as_str())
                .map(|_| format!("{field} updated")),
            ScriptStep::SetUrgency { urgency } => wizard
                .set_urgency(*urgency)
                .map(|_| format!("urgency={urgency:?}")),
            ScriptStep::Review => wizard.review(now).map(|_| "entered review".to_string()),
            ScriptStep::Preview => wizard.preview(&repository).await.map(|preview| {
                preview
                    .rows
                    .iter()
                    .map(|row| {
                        format!(
                            "{}: {} -> {}",
                            row.field,
                            row.before.as_deref().unwrap_or("-"),
                            row.after
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("; ")
            }),
            ScriptStep::Back => wizard.back().map(|_| "went back".to_string()),
            ScriptStep::Confirm => wizard
                .confirm(backend, &FixedClock(now))
                .await
                .map(|ack| format!("acknowledged as {}", ack.reference)),
            ScriptStep::Cancel => wizard.cancel().map(|_| "closed".to_string()),
            ScriptStep::Restart => wizard.restart().map(|_| "restarted".to_string()),
        };
        let outcome = outcome.map_err(|err| ApiError::from(&err));
        debug!(action = timed.step.name(), ok = outcome.is_ok(), "script step applied");
        reports.push(StepReport {
            action: timed.step.name(),
            step_after: wizard.step().to_string(),
            outcome,
        });
    }

    (wizard, reports)
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;
