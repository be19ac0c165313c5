//! Wire format of the meeting event stream.
//!
//! Every frame is an envelope `{event_type, payload, timestamp?}`. Decoding
//! happens once, at the transport boundary, so the reducer only ever sees a
//! typed [`MeetingEvent`].

use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Envelope exactly as it arrives on the socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEnvelope {
    pub event_type: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed event envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("invalid payload for `{event_type}` event: {source}")]
    Payload {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolStartPayload {
    pub step_id: String,
    #[serde(default)]
    pub step: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub tool_name: Option<String>,
}

impl ToolStartPayload {
    pub fn progress(&self) -> Option<StepProgress> {
        match (self.step, self.total) {
            (Some(step), Some(total)) => Some(StepProgress { step, total }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolCompletePayload {
    pub step_id: String,
    #[serde(default)]
    pub quality: Option<DataQuality>,
    #[serde(default)]
    pub has_data: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolErrorPayload {
    pub step_id: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateChangePayload {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinishedPayload {
    #[serde(default)]
    pub message: Option<String>,
}

/// Every event the meeting producer can push
#[derive(Debug, Clone, PartialEq)]
pub enum MeetingEvent {
    Status(StatusPayload),
    Message(Message),
    PlanGenerated(ResearchPlan),
    ToolStart(ToolStartPayload),
    ToolComplete(ToolCompletePayload),
    ToolError(ToolErrorPayload),
    StateChange(StateChangePayload),
    Error(ErrorPayload),
    Report(StructuredReport),
    Finished(FinishedPayload),
    /// An `event_type` this client does not know about yet
    Unknown { event_type: String },
}

impl MeetingEvent {
    pub fn event_type(&self) -> &str {
        match self {
            MeetingEvent::Status(_) => "status",
            MeetingEvent::Message(_) => "message",
            MeetingEvent::PlanGenerated(_) => "plan_generated",
            MeetingEvent::ToolStart(_) => "tool_start",
            MeetingEvent::ToolComplete(_) => "tool_complete",
            MeetingEvent::ToolError(_) => "tool_error",
            MeetingEvent::StateChange(_) => "state_change",
            MeetingEvent::Error(_) => "error",
            MeetingEvent::Report(_) => "report",
            MeetingEvent::Finished(_) => "finished",
            MeetingEvent::Unknown { event_type } => event_type.as_str(),
        }
    }

    /// Step the event refers to, for the `tool_*` family
    pub fn step_id(&self) -> Option<&str> {
        match self {
            MeetingEvent::ToolStart(p) => Some(p.step_id.as_str()),
            MeetingEvent::ToolComplete(p) => Some(p.step_id.as_str()),
            MeetingEvent::ToolError(p) => Some(p.step_id.as_str()),
            _ => None,
        }
    }

    pub fn from_envelope(envelope: RawEnvelope) -> Result<Self, DecodeError> {
        let RawEnvelope {
            event_type,
            payload,
            ..
        } = envelope;

        // Producers sometimes omit the payload of events whose fields are all optional.
        let payload = match payload {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let event = match event_type.as_str() {
            "status" => MeetingEvent::Status(payload_as(&event_type, payload)?),
            "message" => MeetingEvent::Message(payload_as(&event_type, payload)?),
            "plan_generated" => MeetingEvent::PlanGenerated(payload_as(&event_type, payload)?),
            "tool_start" => MeetingEvent::ToolStart(payload_as(&event_type, payload)?),
            "tool_complete" => MeetingEvent::ToolComplete(payload_as(&event_type, payload)?),
            "tool_error" => MeetingEvent::ToolError(payload_as(&event_type, payload)?),
            "state_change" => MeetingEvent::StateChange(payload_as(&event_type, payload)?),
            "error" => MeetingEvent::Error(payload_as(&event_type, payload)?),
            "report" => MeetingEvent::Report(payload_as(&event_type, payload)?),
            "finished" => MeetingEvent::Finished(payload_as(&event_type, payload)?),
            _ => MeetingEvent::Unknown { event_type },
        };

        Ok(event)
    }
}

fn payload_as<T>(event_type: &str, payload: Value) -> Result<T, DecodeError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(payload).map_err(|source| DecodeError::Payload {
        event_type: event_type.to_string(),
        source,
    })
}

/// Decode one text frame from the event stream.
pub fn decode_event(frame: &str) -> Result<MeetingEvent, DecodeError> {
    let envelope: RawEnvelope = serde_json::from_str(frame).map_err(DecodeError::Envelope)?;
    MeetingEvent::from_envelope(envelope)
}
