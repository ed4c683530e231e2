//! Integration tests for the complete encode → read → decode → dispatch flow

use bytes::Bytes;
use envrec_core::{
    constants::{GROUND_STEERING_REQUEST, IMAGE_READING},
    decode_envelope, encode_envelope, encode_frame, replay, Dispatcher, Envelope, FrameReader,
    TimeStamp,
};
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

fn envelope_frame(data_type: i32, sender_stamp: u32, payload: &[u8]) -> Vec<u8> {
    let envelope = Envelope {
        data_type,
        sender_stamp,
        sent: TimeStamp::new(1_000, 1),
        received: TimeStamp::new(1_000, 2),
        sample_time_stamp: TimeStamp::new(999, 750_000),
        payload: Bytes::copy_from_slice(payload),
    };
    encode_frame(&encode_envelope(&envelope)).unwrap().to_vec()
}

#[test]
fn test_full_workflow_clean() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&envelope_frame(GROUND_STEERING_REQUEST, 0, b"steer"));
    stream.extend_from_slice(&envelope_frame(IMAGE_READING, 1, b"pixels"));
    stream.extend_from_slice(&envelope_frame(GROUND_STEERING_REQUEST, 0, b"steer2"));

    let mut reader = FrameReader::new(Cursor::new(&stream));
    let mut envelopes = Vec::new();
    while let Some(frame) = reader.next_frame().unwrap() {
        envelopes.push(decode_envelope(&frame.bytes).unwrap());
    }

    assert_eq!(envelopes.len(), 3);
    assert_eq!(envelopes[0].data_type, GROUND_STEERING_REQUEST);
    assert_eq!(&envelopes[0].payload[..], b"steer");
    assert_eq!(envelopes[1].data_type, IMAGE_READING);
    assert_eq!(envelopes[1].sender_stamp, 1);
    assert_eq!(envelopes[1].sample_time_stamp.total_micros(), 999_750_000);
    assert_eq!(&envelopes[2].payload[..], b"steer2");
}

/// The spec scenario: dataType sequence [1090, 42, 1055] produces exactly
/// one steering invocation and one image invocation, in stream order.
#[test]
fn test_replay_routes_known_types_in_order() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&envelope_frame(GROUND_STEERING_REQUEST, 0, b"angle"));
    stream.extend_from_slice(&envelope_frame(42, 0, b"mystery"));
    stream.extend_from_slice(&envelope_frame(IMAGE_READING, 0, b"jpeg"));

    let log: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = Dispatcher::new();
    for id in [GROUND_STEERING_REQUEST, IMAGE_READING] {
        let log = Rc::clone(&log);
        dispatcher.register(id, move |data_type: i32, _: &[u8]| {
            log.borrow_mut().push(data_type);
            Ok(())
        });
    }

    let stats = replay(FrameReader::new(Cursor::new(&stream)), &mut dispatcher).unwrap();

    assert_eq!(*log.borrow(), vec![GROUND_STEERING_REQUEST, IMAGE_READING]);
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.records, 3);
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.unknown, 1);
    assert_eq!(stats.decode_failures, 0);
    assert!(!stats.truncated);
}

#[test]
fn test_workflow_with_corruption_between_frames() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&envelope_frame(GROUND_STEERING_REQUEST, 0, b"before"));
    stream.extend_from_slice(b"!!! NOT A FRAME !!!");
    stream.extend_from_slice(&envelope_frame(GROUND_STEERING_REQUEST, 0, b"after"));

    let payloads: Rc<RefCell<Vec<Vec<u8>>>> = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = Dispatcher::new();
    {
        let payloads = Rc::clone(&payloads);
        dispatcher.register(GROUND_STEERING_REQUEST, move |_: i32, payload: &[u8]| {
            payloads.borrow_mut().push(payload.to_vec());
            Ok(())
        });
    }

    let stats = replay(FrameReader::new(Cursor::new(&stream)), &mut dispatcher).unwrap();

    assert_eq!(stats.dispatched, 2);
    assert!(stats.resync_bytes_skipped >= 19);
    assert_eq!(
        *payloads.borrow(),
        vec![b"before".to_vec(), b"after".to_vec()]
    );
}

#[test]
fn test_truncated_final_frame_emits_nothing_partial() {
    let mut stream = envelope_frame(GROUND_STEERING_REQUEST, 0, b"complete");
    // final frame declares 200 body bytes but the file ends after 50
    let partial = encode_frame(&[0x55u8; 200]).unwrap();
    stream.extend_from_slice(&partial[..5 + 50]);

    let invocations = Rc::new(RefCell::new(0u32));
    let mut dispatcher = Dispatcher::new();
    {
        let invocations = Rc::clone(&invocations);
        dispatcher.register(GROUND_STEERING_REQUEST, move |_: i32, _: &[u8]| {
            *invocations.borrow_mut() += 1;
            Ok(())
        });
    }

    let stats = replay(FrameReader::new(Cursor::new(&stream)), &mut dispatcher).unwrap();

    assert!(stats.truncated);
    assert_eq!(stats.frames, 1);
    assert_eq!(*invocations.borrow(), 1);
}

#[test]
fn test_empty_payload_envelope_round_trips() {
    let stream = envelope_frame(42, 9, b"");
    let mut reader = FrameReader::new(Cursor::new(&stream));
    let frame = reader.next_frame().unwrap().unwrap();
    let envelope = decode_envelope(&frame.bytes).unwrap();
    assert_eq!(envelope.data_type, 42);
    assert_eq!(envelope.sender_stamp, 9);
    assert!(envelope.payload.is_empty());
}
