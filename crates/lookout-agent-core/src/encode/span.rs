// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Span wire encoding.
//!
//! A span with `async_id == 0` is the root of its transaction and encodes as
//! a full [`v1::Span`]; any other value marks an asynchronous branch and
//! encodes as a [`v1::SpanChunk`] tied back to the root by transaction id.

use crate::model::{Annotation, AnnotationValue, Span, SpanEvent, TransactionId, ANNOTATION_API};
use lookout_collector_proto::v1;

use super::epoch_millis;

/// Encode a completed span for the upload stream.
pub fn span_message(span: &Span, application_type: i32) -> v1::SpanMessage {
    let field = if span.async_id == 0 {
        v1::span_message::Field::Span(root_span(span, application_type))
    } else {
        v1::span_message::Field::SpanChunk(span_chunk(span, application_type))
    };
    v1::SpanMessage { field: Some(field) }
}

fn root_span(span: &Span, application_type: i32) -> v1::Span {
    let mut annotations: Vec<v1::Annotation> =
        span.annotations.iter().map(encode_annotation).collect();
    // the operation name always rides along as the trailing annotation
    annotations.push(encode_annotation(&Annotation::string(
        ANNOTATION_API,
        span.operation_name.clone(),
    )));

    let parent_info = if span.parent_application_name.is_empty() {
        None
    } else {
        Some(v1::ParentInfo {
            parent_application_name: span.parent_application_name.clone(),
            parent_application_type: span.parent_application_type,
            acceptor_host: span.acceptor_host.clone(),
        })
    };

    v1::Span {
        version: 1,
        transaction_id: Some(encode_transaction_id(&span.transaction_id)),
        span_id: span.span_id,
        parent_span_id: span.parent_span_id,
        start_time: epoch_millis(span.start_time),
        elapsed: span.duration.as_millis() as i32,
        api_id: if span.api_id > 0 { span.api_id } else { 0 },
        service_type: span.service_type,
        accept_event: Some(v1::AcceptEvent {
            rpc: span.rpc_name.clone(),
            end_point: span.end_point.clone(),
            remote_addr: span.remote_addr.clone(),
            parent_info,
        }),
        annotation: annotations,
        flag: span.flags,
        err: span.err,
        span_event: span.events.iter().map(encode_event).collect(),
        application_service_type: application_type,
        logging_info: span.logging_info,
    }
}

fn span_chunk(span: &Span, application_type: i32) -> v1::SpanChunk {
    v1::SpanChunk {
        version: 1,
        transaction_id: Some(encode_transaction_id(&span.transaction_id)),
        span_id: span.span_id,
        key_time: epoch_millis(span.start_time),
        end_point: span.end_point.clone(),
        span_event: span.events.iter().map(encode_event).collect(),
        application_service_type: application_type,
        local_async_id: Some(v1::LocalAsyncId {
            async_id: span.async_id,
            sequence: span.async_sequence,
        }),
    }
}

fn encode_event(event: &SpanEvent) -> v1::SpanEvent {
    let mut annotations: Vec<v1::Annotation> =
        event.annotations.iter().map(encode_annotation).collect();
    // events carry the name only when no registered api id describes them
    if event.api_id == 0 && !event.operation_name.is_empty() {
        annotations.push(encode_annotation(&Annotation::string(
            ANNOTATION_API,
            event.operation_name.clone(),
        )));
    }

    let exception_info = event.exception.as_ref().map(|e| v1::IntStringValue {
        int_value: e.func_id,
        string_value: e.message.clone(),
    });

    let next_event = if event.destination_id.is_empty() {
        None
    } else {
        Some(v1::NextEvent {
            field: Some(v1::next_event::Field::MessageEvent(v1::MessageEvent {
                next_span_id: event.next_span_id,
                end_point: event.end_point.clone(),
                destination_id: event.destination_id.clone(),
            })),
        })
    };

    v1::SpanEvent {
        sequence: event.sequence,
        depth: event.depth,
        start_elapsed: event.start_elapsed_ms,
        end_elapsed: event.duration_ms,
        service_type: event.service_type,
        annotation: annotations,
        api_id: event.api_id,
        exception_info,
        next_event,
        async_event: event.async_id,
    }
}

fn encode_transaction_id(id: &TransactionId) -> v1::TransactionId {
    v1::TransactionId {
        agent_id: id.agent_id.clone(),
        agent_start_time: id.start_time,
        sequence: id.sequence,
    }
}

fn encode_annotation(annotation: &Annotation) -> v1::Annotation {
    let field = match &annotation.value {
        AnnotationValue::Int(i) => v1::annotation_value::Field::IntValue(*i),
        AnnotationValue::Str(s) => v1::annotation_value::Field::StringValue(s.clone()),
        AnnotationValue::StrStr(s1, s2) => {
            v1::annotation_value::Field::StringStringValue(v1::StringStringValue {
                string_value1: s1.clone(),
                string_value2: s2.clone(),
            })
        }
        AnnotationValue::IntStrStr(i, s1, s2) => {
            v1::annotation_value::Field::IntStringStringValue(v1::IntStringStringValue {
                int_value: *i,
                string_value1: s1.clone(),
                string_value2: s2.clone(),
            })
        }
        AnnotationValue::LongIntIntByteByteStr(l, i1, i2, b1, b2, s) => {
            v1::annotation_value::Field::LongIntIntByteByteStringValue(
                v1::LongIntIntByteByteStringValue {
                    long_value: *l,
                    int_value1: *i1,
                    int_value2: *i2,
                    byte_value1: *b1,
                    byte_value2: *b2,
                    string_value: s.clone(),
                },
            )
        }
    };

    v1::Annotation {
        key: annotation.key,
        value: Some(v1::AnnotationValue { field: Some(field) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Exception;
    use proptest::prelude::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn test_span() -> Span {
        let mut span = Span::new(
            TransactionId {
                agent_id: "web-1".to_string(),
                start_time: 1_700_000_000_000,
                sequence: 1,
            },
            7,
        );
        span.start_time = UNIX_EPOCH + Duration::from_millis(1_700_000_100_000);
        span.duration = Duration::from_millis(250);
        span.service_type = 1800;
        span.operation_name = "GET /users".to_string();
        span
    }

    #[test]
    fn zero_async_id_encodes_as_root_span() {
        let msg = span_message(&test_span(), 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        assert_eq!(root.version, 1);
        assert_eq!(root.span_id, 7);
        assert_eq!(root.start_time, 1_700_000_100_000);
        assert_eq!(root.elapsed, 250);
        assert_eq!(root.application_service_type, 1800);
    }

    #[test]
    fn nonzero_async_id_encodes_as_chunk() {
        let mut span = test_span();
        span.async_id = 1;
        span.async_sequence = 4;
        span.end_point = "localhost:8080".to_string();

        let msg = span_message(&span, 1800);
        let Some(v1::span_message::Field::SpanChunk(chunk)) = msg.field else {
            panic!("expected span chunk");
        };
        assert_eq!(chunk.key_time, 1_700_000_100_000);
        assert_eq!(chunk.end_point, "localhost:8080");
        let local = chunk.local_async_id.unwrap();
        assert_eq!((local.async_id, local.sequence), (1, 4));
    }

    #[test]
    fn root_span_appends_operation_name_annotation_last() {
        let mut span = test_span();
        span.annotations.push(Annotation::int(40, 200));

        let msg = span_message(&span, 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        assert_eq!(root.annotation.len(), 2);
        let last = root.annotation.last().unwrap();
        assert_eq!(last.key, ANNOTATION_API);
        match last.value.as_ref().and_then(|v| v.field.as_ref()) {
            Some(v1::annotation_value::Field::StringValue(s)) => assert_eq!(s, "GET /users"),
            other => panic!("expected string annotation, got {other:?}"),
        }
    }

    #[test]
    fn root_span_appends_operation_name_even_when_empty() {
        let mut span = test_span();
        span.operation_name.clear();

        let msg = span_message(&span, 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        assert_eq!(root.annotation.len(), 1);
        assert_eq!(root.annotation[0].key, ANNOTATION_API);
    }

    #[test]
    fn annotations_keep_arity_and_order() {
        let mut span = test_span();
        span.annotations = vec![
            Annotation::string_string(46, "content-type", "application/json"),
            Annotation::int_string_string(50, 13, "select * from orders where id = ?", "1"),
        ];

        let msg = span_message(&span, 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        // two explicit annotations plus the trailing operation name
        assert_eq!(root.annotation.len(), 3);
        assert_eq!(root.annotation[0].key, 46);
        match root.annotation[0].value.as_ref().and_then(|v| v.field.as_ref()) {
            Some(v1::annotation_value::Field::StringStringValue(v)) => {
                assert_eq!(v.string_value1, "content-type");
                assert_eq!(v.string_value2, "application/json");
            }
            other => panic!("expected string-string annotation, got {other:?}"),
        }
        match root.annotation[1].value.as_ref().and_then(|v| v.field.as_ref()) {
            Some(v1::annotation_value::Field::IntStringStringValue(v)) => {
                assert_eq!(v.int_value, 13);
                assert_eq!(v.string_value1, "select * from orders where id = ?");
                assert_eq!(v.string_value2, "1");
            }
            other => panic!("expected int-string-string annotation, got {other:?}"),
        }
    }

    #[test]
    fn event_operation_name_requires_unregistered_api() {
        let named = SpanEvent {
            operation_name: "query".to_string(),
            ..Default::default()
        };
        assert_eq!(encode_event(&named).annotation.len(), 1);

        let registered = SpanEvent {
            api_id: 31,
            operation_name: "query".to_string(),
            ..Default::default()
        };
        assert!(encode_event(&registered).annotation.is_empty());

        let unnamed = SpanEvent::default();
        assert!(encode_event(&unnamed).annotation.is_empty());
    }

    #[test]
    fn event_exception_maps_to_int_string_value() {
        let event = SpanEvent {
            exception: Some(Exception {
                func_id: 9,
                message: "connection refused".to_string(),
            }),
            ..Default::default()
        };
        let encoded = encode_event(&event);
        let info = encoded.exception_info.unwrap();
        assert_eq!(info.int_value, 9);
        assert_eq!(info.string_value, "connection refused");
    }

    #[test]
    fn event_destination_creates_next_event() {
        let event = SpanEvent {
            next_span_id: 99,
            end_point: "db:5432".to_string(),
            destination_id: "orders-db".to_string(),
            ..Default::default()
        };
        let encoded = encode_event(&event);
        let Some(v1::next_event::Field::MessageEvent(me)) =
            encoded.next_event.unwrap().field
        else {
            panic!("expected message event");
        };
        assert_eq!(me.next_span_id, 99);
        assert_eq!(me.destination_id, "orders-db");

        let local = SpanEvent {
            next_span_id: 99,
            ..Default::default()
        };
        assert!(encode_event(&local).next_event.is_none());
    }

    #[test]
    fn parent_info_requires_parent_application_name() {
        let msg = span_message(&test_span(), 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        assert!(root.accept_event.unwrap().parent_info.is_none());

        let mut span = test_span();
        span.parent_application_name = "gateway".to_string();
        span.parent_application_type = 1800;
        span.acceptor_host = "gw-1:9000".to_string();
        let msg = span_message(&span, 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        let info = root.accept_event.unwrap().parent_info.unwrap();
        assert_eq!(info.parent_application_name, "gateway");
        assert_eq!(info.acceptor_host, "gw-1:9000");
    }

    #[test]
    fn api_id_is_dropped_unless_positive() {
        let mut span = test_span();
        span.api_id = -3;
        let msg = span_message(&span, 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        assert_eq!(root.api_id, 0);

        span = test_span();
        span.api_id = 31;
        let msg = span_message(&span, 1800);
        let Some(v1::span_message::Field::Span(root)) = msg.field else {
            panic!("expected root span");
        };
        assert_eq!(root.api_id, 31);
    }

    proptest! {
        #[test]
        fn discrimination_follows_async_id(async_id in any::<i32>()) {
            let mut span = test_span();
            span.async_id = async_id;
            let msg = span_message(&span, 1800);
            match (async_id, msg.field.unwrap()) {
                (0, v1::span_message::Field::Span(_)) => {}
                (0, _) => prop_assert!(false, "async_id 0 must encode as root span"),
                (_, v1::span_message::Field::SpanChunk(chunk)) => {
                    prop_assert_eq!(chunk.local_async_id.unwrap().async_id, async_id);
                }
                (_, _) => prop_assert!(false, "nonzero async_id must encode as chunk"),
            }
        }
    }
}
