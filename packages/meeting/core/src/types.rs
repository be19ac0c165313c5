use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Treats an explicit `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_round() -> u32 {
    1
}

fn default_confidence() -> f64 {
    1.0
}

/// Seat a participant occupies in the meeting room
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageRole {
    Moderator,
    Technical,
    Fundamental,
    Sentiment,
    Risk,
    Debater,
    User,
    Other(String),
}

impl MessageRole {
    pub fn as_str(&self) -> &str {
        match self {
            MessageRole::Moderator => "moderator",
            MessageRole::Technical => "technical",
            MessageRole::Fundamental => "fundamental",
            MessageRole::Sentiment => "sentiment",
            MessageRole::Risk => "risk",
            MessageRole::Debater => "debater",
            MessageRole::User => "user",
            MessageRole::Other(role) => role,
        }
    }
}

impl From<String> for MessageRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "moderator" => MessageRole::Moderator,
            "technical" => MessageRole::Technical,
            "fundamental" => MessageRole::Fundamental,
            "sentiment" => MessageRole::Sentiment,
            "risk" => MessageRole::Risk,
            "debater" => MessageRole::Debater,
            "user" => MessageRole::User,
            _ => MessageRole::Other(value),
        }
    }
}

impl From<MessageRole> for String {
    fn from(value: MessageRole) -> Self {
        match value {
            MessageRole::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MsgType {
    Opening,
    Thinking,
    #[default]
    Opinion,
    ToolCall,
    ToolResult,
    Summary,
    Report,
    Other(String),
}

impl MsgType {
    pub fn as_str(&self) -> &str {
        match self {
            MsgType::Opening => "opening",
            MsgType::Thinking => "thinking",
            MsgType::Opinion => "opinion",
            MsgType::ToolCall => "tool_call",
            MsgType::ToolResult => "tool_result",
            MsgType::Summary => "summary",
            MsgType::Report => "report",
            MsgType::Other(kind) => kind,
        }
    }
}

impl From<String> for MsgType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "opening" => MsgType::Opening,
            "thinking" => MsgType::Thinking,
            "opinion" => MsgType::Opinion,
            "tool_call" => MsgType::ToolCall,
            "tool_result" => MsgType::ToolResult,
            "summary" => MsgType::Summary,
            "report" => MsgType::Report,
            _ => MsgType::Other(value),
        }
    }
}

impl From<MsgType> for String {
    fn from(value: MsgType) -> Self {
        match value {
            MsgType::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

/// One transcript entry. Never mutated once appended to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub agent_id: String,
    pub agent_name: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg_type: MsgType,
    #[serde(default = "default_round")]
    pub round: u32,
    /// ISO-8601, kept exactly as the producer formatted it
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_references: Vec<serde_json::Value>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Message {
    /// Optimistic entry for a query typed by the local user.
    pub fn from_user(agent_name: impl Into<String>, content: impl Into<String>, round: u32) -> Self {
        Self {
            agent_id: "user".to_string(),
            agent_name: agent_name.into(),
            role: MessageRole::User,
            content: content.into(),
            msg_type: MsgType::Opinion,
            round,
            timestamp: chrono::Utc::now().to_rfc3339(),
            data_references: Vec::new(),
            confidence: default_confidence(),
        }
    }
}

/// Why the producer drew up a plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerReason {
    #[default]
    Initial,
    ExpertRequest,
    Iteration,
    Execution,
    Other(String),
}

impl From<String> for TriggerReason {
    fn from(value: String) -> Self {
        match value.as_str() {
            "initial" => TriggerReason::Initial,
            "expert_request" => TriggerReason::ExpertRequest,
            "iteration" => TriggerReason::Iteration,
            "execution" => TriggerReason::Execution,
            _ => TriggerReason::Other(value),
        }
    }
}

impl From<TriggerReason> for String {
    fn from(value: TriggerReason) -> Self {
        match value {
            TriggerReason::Initial => "initial".to_string(),
            TriggerReason::ExpertRequest => "expert_request".to_string(),
            TriggerReason::Iteration => "iteration".to_string(),
            TriggerReason::Execution => "execution".to_string(),
            TriggerReason::Other(reason) => reason,
        }
    }
}

/// A step as declared by the plan, before anything ran
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_id: String,
    pub tool_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub args_schema: HashMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected_output: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub plan_id: i64,
    pub objective: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constraints: HashMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<PlanStep>,
    #[serde(default)]
    pub symbol_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger_reason: TriggerReason,
    /// Participant that asked for a follow-up plan
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
}

/// Freshness class of the data a tool returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataQuality {
    Realtime,
    Eod,
    Delayed,
    Missing,
    Other(String),
}

impl DataQuality {
    pub fn as_str(&self) -> &str {
        match self {
            DataQuality::Realtime => "REALTIME",
            DataQuality::Eod => "EOD",
            DataQuality::Delayed => "DELAYED",
            DataQuality::Missing => "MISSING",
            DataQuality::Other(quality) => quality,
        }
    }
}

impl From<String> for DataQuality {
    fn from(value: String) -> Self {
        match value.as_str() {
            "REALTIME" => DataQuality::Realtime,
            "EOD" => DataQuality::Eod,
            "DELAYED" => DataQuality::Delayed,
            "MISSING" => DataQuality::Missing,
            _ => DataQuality::Other(value),
        }
    }
}

impl From<DataQuality> for String {
    fn from(value: DataQuality) -> Self {
        match value {
            DataQuality::Other(quality) => quality,
            known => known.as_str().to_string(),
        }
    }
}

/// Position of a running step within its plan, as reported by `tool_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub step: u32,
    pub total: u32,
}

/// Live execution state of one declared step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepState {
    /// Plan that most recently declared this step id
    pub plan_id: i64,
    pub spec: PlanStep,
    pub status: StepStatus,
    pub quality: Option<DataQuality>,
    pub has_data: Option<bool>,
    pub error: Option<String>,
    pub progress: Option<StepProgress>,
}

impl StepState {
    pub fn pending(plan_id: i64, spec: PlanStep) -> Self {
        Self {
            plan_id,
            spec,
            status: StepStatus::Pending,
            quality: None,
            has_data: None,
            error: None,
            progress: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, StepStatus::Completed | StepStatus::Error)
    }
}

/// Final synthesis published at the end of a meeting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredReport {
    pub symbol_key: String,
    pub title: String,
    pub thesis: String,
    pub bull_case: Vec<String>,
    pub bear_case: Vec<String>,
    pub risks: Vec<String>,
    pub assumptions: Vec<String>,
    pub valuation_gap: Option<String>,
    pub target_price: Option<HashMap<String, serde_json::Value>>,
    pub conclusion: String,
    pub generated_at: Option<String>,
}

/// Completion ratio of a plan's declared steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanProgress {
    pub finished: usize,
    pub total: usize,
}

impl PlanProgress {
    pub fn is_complete(&self) -> bool {
        self.finished == self.total
    }
}
