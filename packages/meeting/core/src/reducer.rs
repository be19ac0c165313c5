use crate::{
    actions::Action,
    effects::Effect,
    events::*,
    state::{DroppedEvent, SessionState},
    types::*,
};
use tracing::{debug, warn};

/// Applies `action` to a clone of `state`, leaving the input untouched.
///
/// Same transitions as [`apply`]; returns the new state and the effects the
/// host should run.
pub fn reduce(state: &SessionState, action: &Action) -> (SessionState, Vec<Effect>) {
    let mut new_state = state.clone();
    let effects = apply(&mut new_state, action.clone());
    (new_state, effects)
}

/// Applies `action` to `state` in place and returns the effects to run.
pub fn apply(state: &mut SessionState, action: Action) -> Vec<Effect> {
    let mut effects = Vec::new();

    match action {
        // Session lifecycle
        Action::SetSymbol { symbol } => {
            *state = SessionState::new(symbol);
        }

        Action::ClearHistory => {
            state.messages.clear();
        }

        Action::RequestClearHistory => {
            state.messages.clear();
            if state.has_symbol() {
                effects.push(Effect::ClearRemoteHistory {
                    symbol_key: state.active_symbol.clone(),
                });
            }
        }

        // Direct mutations
        Action::AddMessage { message } => {
            state.messages.push(message);
        }

        Action::SetSimulating { simulating } => {
            state.is_simulating = simulating;
        }

        Action::SetStatus { text } => {
            state.current_status = text;
        }

        // Query submission
        Action::SubmitQuery { query, author } => {
            let query = query.trim();
            if !query.is_empty() && state.has_symbol() {
                let round = state.current_round();
                state
                    .messages
                    .push(Message::from_user(author, query, round));
                state.is_simulating = true;
                effects.push(Effect::StartSession {
                    symbol_key: state.active_symbol.clone(),
                    query: query.to_string(),
                });
            }
        }

        Action::SubmissionFailed { error } => {
            state.is_simulating = false;
            state.current_status = error_status(&error);
        }

        Action::Ingest(event) => ingest(state, event),
    }

    effects
}

fn ingest(state: &mut SessionState, event: MeetingEvent) {
    debug!(event_type = event.event_type(), "applying meeting event");

    match event {
        MeetingEvent::Status(StatusPayload { message }) => {
            state.current_status = message.unwrap_or_default();
        }

        MeetingEvent::Message(message) => {
            state.messages.push(message);
        }

        MeetingEvent::PlanGenerated(plan) => {
            for step in &plan.steps {
                if let Some(previous) = state.steps.get(&step.step_id) {
                    if previous.plan_id != plan.plan_id {
                        warn!(
                            step_id = %step.step_id,
                            previous_plan = previous.plan_id,
                            plan_id = plan.plan_id,
                            "step id re-declared by another plan, replacing its live state"
                        );
                    }
                }
                state.steps.insert(
                    step.step_id.clone(),
                    StepState::pending(plan.plan_id, step.clone()),
                );
            }
            state.current_plan_id = Some(plan.plan_id);
            state.research_plans.push(plan);
        }

        MeetingEvent::ToolStart(payload) => {
            if let Some(step) = state.steps.get_mut(&payload.step_id) {
                step.status = StepStatus::Running;
                if let Some(progress) = payload.progress() {
                    step.progress = Some(progress);
                }
            }
        }

        MeetingEvent::ToolComplete(ToolCompletePayload {
            step_id,
            quality,
            has_data,
        }) => {
            if let Some(step) = state.steps.get_mut(&step_id) {
                step.status = StepStatus::Completed;
                step.quality = quality;
                step.has_data = has_data;
            }
        }

        MeetingEvent::ToolError(ToolErrorPayload { step_id, error }) => {
            if let Some(step) = state.steps.get_mut(&step_id) {
                step.status = StepStatus::Error;
                step.error = error;
            }
        }

        MeetingEvent::StateChange(StateChangePayload { status }) => {
            if status == "done" || status == "error" {
                state.is_simulating = false;
            }
        }

        MeetingEvent::Error(ErrorPayload { message }) => {
            state.current_status = error_status(&message);
            state.is_simulating = false;
        }

        MeetingEvent::Report(report) => {
            state.report = Some(report);
        }

        MeetingEvent::Finished(FinishedPayload { message }) => {
            state.current_status = message.unwrap_or_else(|| "Meeting finished".to_string());
            state.is_simulating = false;
        }

        MeetingEvent::Unknown { .. } => {}
    }
}

/// Reports whether `event` will be ignored by the reducer in `state`.
///
/// Unknown event types and `tool_*` events for untracked steps are dropped.
pub fn dropped_by(state: &SessionState, event: &MeetingEvent) -> Option<DroppedEvent> {
    let dropped = match event {
        MeetingEvent::Unknown { event_type } => DroppedEvent {
            event_type: event_type.clone(),
            step_id: None,
        },
        _ => {
            let step_id = event.step_id()?;
            if state.steps.contains_key(step_id) {
                return None;
            }
            DroppedEvent {
                event_type: event.event_type().to_string(),
                step_id: Some(step_id.to_string()),
            }
        }
    };

    warn!(
        event_type = %dropped.event_type,
        step_id = dropped.step_id.as_deref().unwrap_or("-"),
        "dropping meeting event"
    );
    Some(dropped)
}

fn error_status(message: &str) -> String {
    format!("Error: {}", message)
}
