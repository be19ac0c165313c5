use crate::events::*;
use crate::types::*;
use pretty_assertions::assert_eq;

#[test]
fn test_decode_status() {
    let event = decode_event(r#"{"event_type":"status","payload":{"message":"小韭菜進入會議室..."}}"#).unwrap();

    assert_eq!(
        event,
        MeetingEvent::Status(StatusPayload {
            message: Some("小韭菜進入會議室...".to_string())
        })
    );
}

#[test]
fn test_decode_message_with_defaults() {
    let event = decode_event(
        r#"{
            "event_type": "message",
            "payload": {
                "agent_id": "technical",
                "agent_name": "Technical Analyst",
                "role": "technical",
                "content": "**Bullish** divergence",
                "timestamp": "2025-01-01T10:00:00.123456"
            },
            "timestamp": "2025-01-01T10:00:00.200000"
        }"#,
    )
    .unwrap();

    match event {
        MeetingEvent::Message(message) => {
            assert_eq!(message.role, MessageRole::Technical);
            assert_eq!(message.msg_type, MsgType::Opinion);
            assert_eq!(message.round, 1);
            assert_eq!(message.confidence, 1.0);
            assert_eq!(message.timestamp, "2025-01-01T10:00:00.123456");
        }
        other => panic!("Expected Message, got {:?}", other),
    }
}

#[test]
fn test_decode_message_unknown_role() {
    let event = decode_event(
        r#"{"event_type":"message","payload":{"agent_id":"macro","agent_name":"Macro","role":"macro","content":"rates","msg_type":"rebuttal","round":2}}"#,
    )
    .unwrap();

    match event {
        MeetingEvent::Message(message) => {
            assert_eq!(message.role, MessageRole::Other("macro".to_string()));
            assert_eq!(message.msg_type, MsgType::Other("rebuttal".to_string()));
            assert_eq!(message.round, 2);

            let reencoded = serde_json::to_value(&message).unwrap();
            assert_eq!(reencoded["role"], "macro");
            assert_eq!(reencoded["msg_type"], "rebuttal");
        }
        other => panic!("Expected Message, got {:?}", other),
    }
}

#[test]
fn test_decode_plan_generated() {
    let event = decode_event(
        r#"{
            "event_type": "plan_generated",
            "payload": {
                "plan_id": 2,
                "objective": "Check volume trend",
                "constraints": {"market": "US", "quality": "EOD"},
                "steps": [{
                    "step_id": "step_1",
                    "tool_name": "market.bars",
                    "args_schema": {"symbol": "AAPL", "days": 90},
                    "expected_output": "daily bars",
                    "validation_rules": ["date_alignment"]
                }],
                "symbol_key": "US:AAPL",
                "trigger_reason": "expert_request",
                "requester": "technical"
            }
        }"#,
    )
    .unwrap();

    match event {
        MeetingEvent::PlanGenerated(plan) => {
            assert_eq!(plan.plan_id, 2);
            assert_eq!(plan.trigger_reason, TriggerReason::ExpertRequest);
            assert_eq!(plan.requester.as_deref(), Some("technical"));
            assert_eq!(plan.constraints["market"], "US");
            assert_eq!(plan.steps.len(), 1);
            assert_eq!(plan.steps[0].args_schema["days"], 90);
            assert_eq!(plan.steps[0].validation_rules, vec!["date_alignment".to_string()]);
        }
        other => panic!("Expected PlanGenerated, got {:?}", other),
    }
}

#[test]
fn test_decode_plan_with_absent_and_null_fields() {
    let event = decode_event(
        r#"{"event_type":"plan_generated","payload":{"plan_id":1,"objective":"o","constraints":null,"trigger_reason":null,"requester":null}}"#,
    )
    .unwrap();

    match event {
        MeetingEvent::PlanGenerated(plan) => {
            assert!(plan.constraints.is_empty());
            assert!(plan.steps.is_empty());
            assert_eq!(plan.symbol_key, None);
            assert_eq!(plan.trigger_reason, TriggerReason::Initial);
            assert_eq!(plan.requester, None);
        }
        other => panic!("Expected PlanGenerated, got {:?}", other),
    }
}

#[test]
fn test_trigger_reason_free_form() {
    let reason: TriggerReason = serde_json::from_str(r#""manual_rerun""#).unwrap();
    assert_eq!(reason, TriggerReason::Other("manual_rerun".to_string()));
    assert_eq!(serde_json::to_string(&reason).unwrap(), r#""manual_rerun""#);
    assert_eq!(
        serde_json::to_string(&TriggerReason::ExpertRequest).unwrap(),
        r#""expert_request""#
    );
}

#[test]
fn test_decode_tool_events() {
    let start = decode_event(
        r#"{"event_type":"tool_start","payload":{"step_id":"s1","step":1,"total":2,"tool_name":"market.bars"}}"#,
    )
    .unwrap();
    assert_eq!(start.step_id(), Some("s1"));
    match start {
        MeetingEvent::ToolStart(payload) => {
            assert_eq!(payload.progress(), Some(StepProgress { step: 1, total: 2 }))
        }
        other => panic!("Expected ToolStart, got {:?}", other),
    }

    let complete = decode_event(
        r#"{"event_type":"tool_complete","payload":{"step_id":"s1","quality":"REALTIME","has_data":true}}"#,
    )
    .unwrap();
    assert_eq!(
        complete,
        MeetingEvent::ToolComplete(ToolCompletePayload {
            step_id: "s1".to_string(),
            quality: Some(DataQuality::Realtime),
            has_data: Some(true),
        })
    );

    let error = decode_event(r#"{"event_type":"tool_error","payload":{"step_id":"s1","error":"429"}}"#).unwrap();
    assert_eq!(error.event_type(), "tool_error");
}

#[test]
fn test_decode_unlisted_quality() {
    let event = decode_event(
        r#"{"event_type":"tool_complete","payload":{"step_id":"s1","quality":"INTRADAY","has_data":false}}"#,
    )
    .unwrap();

    match event {
        MeetingEvent::ToolComplete(payload) => {
            let quality = payload.quality.unwrap();
            assert_eq!(quality, DataQuality::Other("INTRADAY".to_string()));
            assert_eq!(quality.as_str(), "INTRADAY");
        }
        other => panic!("Expected ToolComplete, got {:?}", other),
    }
}

#[test]
fn test_decode_finished_without_payload() {
    let event = decode_event(r#"{"event_type":"finished"}"#).unwrap();

    assert_eq!(event, MeetingEvent::Finished(FinishedPayload { message: None }));
}

#[test]
fn test_decode_report() {
    let event = decode_event(
        r#"{"event_type":"report","payload":{"symbol_key":"US:AAPL","title":"t","thesis":"x","bull_case":["a"],"conclusion":"c","target_price":{"low":180,"high":220}}}"#,
    )
    .unwrap();

    match event {
        MeetingEvent::Report(report) => {
            assert_eq!(report.bull_case, vec!["a".to_string()]);
            assert!(report.bear_case.is_empty());
            assert_eq!(report.target_price.unwrap()["high"], 220);
        }
        other => panic!("Expected Report, got {:?}", other),
    }
}

#[test]
fn test_decode_unknown_type() {
    let event = decode_event(r#"{"event_type":"agent_thinking","payload":{"agent":"risk"}}"#).unwrap();

    assert_eq!(
        event,
        MeetingEvent::Unknown {
            event_type: "agent_thinking".to_string()
        }
    );
    assert_eq!(event.event_type(), "agent_thinking");
}

#[test]
fn test_decode_rejects_malformed_frame() {
    let err = decode_event("not json").unwrap_err();
    assert!(matches!(err, DecodeError::Envelope(_)));

    let err = decode_event(r#"{"payload":{}}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Envelope(_)));
}

#[test]
fn test_decode_rejects_mismatched_payload() {
    let err = decode_event(r#"{"event_type":"tool_start","payload":{"tool_name":"x"}}"#).unwrap_err();

    match err {
        DecodeError::Payload { event_type, .. } => assert_eq!(event_type, "tool_start"),
        other => panic!("Expected Payload error, got {:?}", other),
    }
    let message = decode_event(r#"{"event_type":"message","payload":{"content":"x"}}"#)
        .unwrap_err()
        .to_string();
    assert!(message.starts_with("invalid payload for `message` event"));
}

#[test]
fn test_decode_error_with_null_message() {
    let event = decode_event(r#"{"event_type":"error","payload":{"message":null}}"#).unwrap();

    assert_eq!(
        event,
        MeetingEvent::Error(ErrorPayload {
            message: String::new()
        })
    );
}

#[test]
fn test_decode_message_with_null_timestamp() {
    let event = decode_event(
        r#"{"event_type":"message","payload":{"agent_id":"risk","agent_name":"Risk","role":"risk","content":"drawdown","msg_type":null,"timestamp":null}}"#,
    )
    .unwrap();

    match event {
        MeetingEvent::Message(message) => {
            assert_eq!(message.role, MessageRole::Risk);
            assert_eq!(message.msg_type, MsgType::Opinion);
            assert_eq!(message.timestamp, "");
        }
        other => panic!("Expected Message, got {:?}", other),
    }
}
