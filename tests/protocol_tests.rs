use connect_four::{
    decode_frame, encode_frame, FrameError, GameStatus, Message, StatusToken, Vote,
    FRAME_HEADER_LEN, MAX_FRAME_SIZE, PROTOCOL_VERSION,
};

#[test]
fn test_frame_roundtrip() {
    let messages = [
        Message::Handshake {
            version: PROTOCOL_VERSION,
            rows: 7,
            cols: 10,
        },
        Message::Move { turn: 1, column: 5 },
        Message::Status(StatusToken::Draw),
        Message::RematchVote(Vote::Yes),
    ];
    for msg in messages {
        let frame = encode_frame(&msg).unwrap();
        let len = u32::from_be_bytes(frame[..4].try_into().unwrap()) as usize;
        assert_eq!(len + FRAME_HEADER_LEN, frame.len());
        let (decoded, used) = decode_frame(&frame).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(used, frame.len());
    }
}

#[test]
fn test_decode_leaves_trailing_bytes() {
    let mut buf = encode_frame(&Message::Move { turn: 3, column: 0 }).unwrap();
    let first = buf.len();
    buf.extend(encode_frame(&Message::Status(StatusToken::Playing)).unwrap());

    let (msg, used) = decode_frame(&buf).unwrap();
    assert_eq!(msg, Message::Move { turn: 3, column: 0 });
    assert_eq!(used, first);
    let (msg, _) = decode_frame(&buf[used..]).unwrap();
    assert_eq!(msg, Message::Status(StatusToken::Playing));
}

#[test]
fn test_decode_incomplete() {
    assert_eq!(
        decode_frame(&[0, 0]).unwrap_err(),
        FrameError::Incomplete {
            needed: 4,
            available: 2
        }
    );
    let frame = encode_frame(&Message::RematchVote(Vote::No)).unwrap();
    let cut = &frame[..frame.len() - 1];
    assert!(matches!(
        decode_frame(cut),
        Err(FrameError::Incomplete { .. })
    ));
}

#[test]
fn test_decode_rejects_bad_lengths() {
    assert_eq!(decode_frame(&[0, 0, 0, 0]).unwrap_err(), FrameError::Empty);

    let too_big = (MAX_FRAME_SIZE + 1).to_be_bytes();
    assert!(matches!(
        decode_frame(&too_big),
        Err(FrameError::TooLarge { .. })
    ));
}

#[test]
fn test_decode_rejects_unknown_tag() {
    // Variant index 99 does not exist
    let mut buf = 4u32.to_be_bytes().to_vec();
    buf.extend_from_slice(&99u32.to_le_bytes());
    assert!(matches!(
        decode_frame(&buf),
        Err(FrameError::Deserialize(_))
    ));
}

#[test]
fn test_status_token_from_the_receiver_side() {
    assert_eq!(StatusToken::Playing.as_remote_status(), GameStatus::Playing);
    assert_eq!(StatusToken::Won.as_remote_status(), GameStatus::RemoteWin);
    assert_eq!(StatusToken::Draw.as_remote_status(), GameStatus::Draw);
}

#[test]
fn test_vote_from_bool() {
    assert_eq!(Vote::from(true), Vote::Yes);
    assert!(!Vote::from(false).is_yes());
}
