use crate::types::*;
use std::collections::HashMap;

/// Canonical view of one meeting session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Symbol under discussion, e.g. `US:AAPL`. Empty until the host picks one.
    pub active_symbol: String,

    /// Transcript in arrival order
    pub messages: Vec<Message>,

    /// True while a remote turn is in flight
    pub is_simulating: bool,

    /// Human-readable progress line
    pub current_status: String,

    /// Plans in arrival order
    pub research_plans: Vec<ResearchPlan>,

    /// Id of the most recently arrived plan
    pub current_plan_id: Option<i64>,

    /// Live step state keyed by `step_id`, shared across all plans
    pub steps: HashMap<String, StepState>,

    /// Latest final report, if the producer sent one
    pub report: Option<StructuredReport>,
}

/// Counters for events the reducer had to ignore.
/// Held by the store, outside [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DropStats {
    pub unknown_events: u64,
    pub orphaned_steps: u64,
    pub last_dropped: Option<DroppedEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEvent {
    pub event_type: String,
    pub step_id: Option<String>,
}

impl DropStats {
    pub fn record(&mut self, dropped: DroppedEvent) {
        if dropped.step_id.is_some() {
            self.orphaned_steps += 1;
        } else {
            self.unknown_events += 1;
        }
        self.last_dropped = Some(dropped);
    }

    pub fn total(&self) -> u64 {
        self.unknown_events + self.orphaned_steps
    }
}

impl SessionState {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            active_symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn has_symbol(&self) -> bool {
        !self.active_symbol.is_empty()
    }

    pub fn plan(&self, plan_id: i64) -> Option<&ResearchPlan> {
        self.research_plans.iter().find(|p| p.plan_id == plan_id)
    }

    pub fn current_plan(&self) -> Option<&ResearchPlan> {
        self.current_plan_id.and_then(|id| self.plan(id))
    }

    pub fn step(&self, step_id: &str) -> Option<&StepState> {
        self.steps.get(step_id)
    }

    /// Live state of a plan's steps, in declared order.
    ///
    /// Steps whose id was re-declared by a later plan show that plan's state.
    pub fn steps_for_plan(&self, plan_id: i64) -> Vec<&StepState> {
        self.plan(plan_id)
            .map(|plan| {
                plan.steps
                    .iter()
                    .filter_map(|s| self.steps.get(&s.step_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn plan_progress(&self, plan_id: i64) -> Option<PlanProgress> {
        let plan = self.plan(plan_id)?;
        let finished = self
            .steps_for_plan(plan_id)
            .into_iter()
            .filter(|s| s.is_finished())
            .count();
        Some(PlanProgress {
            finished,
            total: plan.steps.len(),
        })
    }

    /// Round the next local message belongs to
    pub fn current_round(&self) -> u32 {
        self.messages.last().map(|m| m.round).unwrap_or(1)
    }
}
