mod decode_tests;

use crate::types::*;
use std::collections::HashMap;

pub(crate) fn agent_message(agent_id: &str, content: &str) -> Message {
    Message {
        agent_id: agent_id.to_string(),
        agent_name: format!("{} Analyst", agent_id),
        role: MessageRole::Technical,
        content: content.to_string(),
        msg_type: MsgType::Opinion,
        round: 1,
        timestamp: "2025-01-01T09:30:00".to_string(),
        data_references: vec![],
        confidence: 1.0,
    }
}

pub(crate) fn plan_step(step_id: &str, tool_name: &str) -> PlanStep {
    PlanStep {
        step_id: step_id.to_string(),
        tool_name: tool_name.to_string(),
        args_schema: HashMap::new(),
        expected_output: format!("output of {}", tool_name),
        validation_rules: vec!["price_range_valid".to_string()],
    }
}

pub(crate) fn research_plan(plan_id: i64, step_ids: &[&str]) -> ResearchPlan {
    ResearchPlan {
        plan_id,
        objective: format!("objective {}", plan_id),
        constraints: HashMap::new(),
        steps: step_ids
            .iter()
            .map(|id| plan_step(id, "market.bars"))
            .collect(),
        symbol_key: Some("US:AAPL".to_string()),
        trigger_reason: TriggerReason::Initial,
        requester: None,
        created_at: None,
    }
}
