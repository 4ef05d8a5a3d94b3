#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Wire-shape tests for the room protocol.
//!
//! The fixtures here are literal frames as the server produces them:
//! field-named JSON, internally tagged by a snake_case `"type"`. If one of
//! these breaks, the client no longer speaks the server's dialect.

use std::collections::HashMap;

use board_game_client::protocol::{
    ClientMessage, PlayerId, ReconnectToken, RoomId, ServerMessage, UserId, UserInfo,
};
use serde_json::{json, Value};

fn to_value<T: serde::Serialize>(msg: &T) -> Value {
    serde_json::to_value(msg).expect("serialize")
}

// ════════════════════════════════════════════════════════════════════
// Outbound wire forms
// ════════════════════════════════════════════════════════════════════

#[test]
fn join_room_wire_form() {
    let msg = ClientMessage::JoinRoom {
        username: "alice".into(),
        room: Some(RoomId::from("R1")),
    };
    assert_eq!(
        to_value(&msg),
        json!({"type": "join_room", "username": "alice", "room": "R1"})
    );
}

#[test]
fn join_room_without_room_sends_null() {
    let msg = ClientMessage::JoinRoom {
        username: "alice".into(),
        room: None,
    };
    assert_eq!(
        to_value(&msg),
        json!({"type": "join_room", "username": "alice", "room": null})
    );
}

#[test]
fn rejoin_room_wire_form() {
    let msg = ClientMessage::RejoinRoom {
        token: ReconnectToken::from("T1"),
        room: RoomId::from("R1"),
    };
    assert_eq!(
        to_value(&msg),
        json!({"type": "rejoin_room", "token": "T1", "room": "R1"})
    );
}

#[test]
fn update_config_wire_form() {
    let msg = ClientMessage::UpdateConfig {
        config: json!({"maxPlayers": 4}),
    };
    assert_eq!(
        to_value(&msg),
        json!({"type": "update_config", "config": {"maxPlayers": 4}})
    );
}

#[test]
fn start_game_wire_form_with_mapping() {
    let msg = ClientMessage::StartGame {
        player_mapping: Some(HashMap::from([(
            UserId::from("U1"),
            PlayerId::from("P1"),
        )])),
    };
    assert_eq!(
        to_value(&msg),
        json!({"type": "start_game", "player_mapping": {"U1": "P1"}})
    );
}

#[test]
fn start_game_wire_form_without_mapping() {
    let msg = ClientMessage::StartGame {
        player_mapping: None,
    };
    assert_eq!(
        to_value(&msg),
        json!({"type": "start_game", "player_mapping": null})
    );
}

#[test]
fn start_game_decodes_with_mapping_field_absent() {
    let msg: ClientMessage = serde_json::from_str(r#"{"type":"start_game"}"#).unwrap();
    assert!(matches!(
        msg,
        ClientMessage::StartGame {
            player_mapping: None
        }
    ));
}

#[test]
fn do_action_wire_form() {
    let msg = ClientMessage::DoAction {
        action: json!({"kind": "pass"}),
    };
    assert_eq!(
        to_value(&msg),
        json!({"type": "do_action", "action": {"kind": "pass"}})
    );
}

#[test]
fn lobby_management_wire_forms() {
    assert_eq!(
        to_value(&ClientMessage::KickUser {
            user: UserId::from("U2")
        }),
        json!({"type": "kick_user", "user": "U2"})
    );
    assert_eq!(
        to_value(&ClientMessage::ReassignPlayer {
            from_user: UserId::from("U2"),
            to_user: UserId::from("U3"),
        }),
        json!({"type": "reassign_player", "from_user": "U2", "to_user": "U3"})
    );
    assert_eq!(to_value(&ClientMessage::ResetToLobby), json!({"type": "reset_to_lobby"}));
    assert_eq!(
        to_value(&ClientMessage::GameViewRequest),
        json!({"type": "game_view_request"})
    );
}

// ════════════════════════════════════════════════════════════════════
// Inbound fixtures (as the server writes them)
// ════════════════════════════════════════════════════════════════════

#[test]
fn error_fixture_decodes() {
    let msg: ServerMessage =
        serde_json::from_str(r#"{"type":"error","message":"room is full"}"#).unwrap();
    assert!(matches!(msg, ServerMessage::Error { message } if message == "room is full"));
}

#[test]
fn join_response_fixture_decodes() {
    let msg: ServerMessage = serde_json::from_str(
        r#"{"type":"join_response","room_id":"R1","token":"T1","user_id":"U1","username":"alice"}"#,
    )
    .unwrap();
    match msg {
        ServerMessage::JoinResponse {
            room_id,
            token,
            user_id,
            username,
        } => {
            assert_eq!(room_id, RoomId::from("R1"));
            assert_eq!(token, ReconnectToken::from("T1"));
            assert_eq!(user_id, UserId::from("U1"));
            assert_eq!(username, "alice");
        }
        other => panic!("expected JoinResponse, got {other:?}"),
    }
}

#[test]
fn user_info_fixture_decodes() {
    let msg: ServerMessage = serde_json::from_str(
        r#"{"type":"user_info","users":[
            {"id":"U1","username":"alice","leader":true,"player_id":null},
            {"id":"U2","username":"bob","leader":false,"player_id":"P2"}
        ]}"#,
    )
    .unwrap();
    match msg {
        ServerMessage::UserInfo { users } => {
            assert_eq!(users.len(), 2);
            assert!(users[0].leader);
            assert_eq!(users[0].player_id, None);
            assert_eq!(users[1].player_id, Some(PlayerId::from("P2")));
        }
        other => panic!("expected UserInfo, got {other:?}"),
    }
}

#[test]
fn room_info_config_stays_opaque() {
    let msg: ServerMessage = serde_json::from_str(
        r#"{"type":"room_info","config":{"maxPlayers":4,"deck":{"jokers":true}}}"#,
    )
    .unwrap();
    match msg {
        ServerMessage::RoomInfo { config } => {
            // No client-side schema: arbitrary nesting passes through.
            assert_eq!(config, json!({"maxPlayers": 4, "deck": {"jokers": true}}));
        }
        other => panic!("expected RoomInfo, got {other:?}"),
    }
}

#[test]
fn game_info_and_diff_fixtures_decode() {
    let full: ServerMessage =
        serde_json::from_str(r#"{"type":"game_info","view":{"turn":1}}"#).unwrap();
    assert!(matches!(full, ServerMessage::GameInfo { .. }));

    let diff: ServerMessage = serde_json::from_str(
        r#"{"type":"game_view_diff","diff":[{"op":"replace","path":"/turn","value":2}]}"#,
    )
    .unwrap();
    assert!(matches!(diff, ServerMessage::GameViewDiff { .. }));
}

#[test]
fn invalidate_token_fixture_decodes() {
    let msg: ServerMessage =
        serde_json::from_str(r#"{"type":"invalidate_token","token":"T1"}"#).unwrap();
    assert!(
        matches!(msg, ServerMessage::InvalidateToken { token } if token == ReconnectToken::from("T1"))
    );
}

#[test]
fn invalid_action_fixture_decodes() {
    let msg: ServerMessage =
        serde_json::from_str(r#"{"type":"invalid_action","message":"not your turn"}"#).unwrap();
    assert!(matches!(msg, ServerMessage::InvalidAction { message } if message == "not your turn"));
}

// ════════════════════════════════════════════════════════════════════
// Fail-closed decoding
// ════════════════════════════════════════════════════════════════════

#[test]
fn unknown_tag_is_rejected() {
    assert!(serde_json::from_str::<ServerMessage>(r#"{"type":"surprise","x":1}"#).is_err());
}

#[test]
fn missing_tag_is_rejected() {
    assert!(serde_json::from_str::<ServerMessage>(r#"{"message":"hi"}"#).is_err());
}

#[test]
fn missing_required_field_is_rejected() {
    // join_response without a token must not decode.
    assert!(serde_json::from_str::<ServerMessage>(
        r#"{"type":"join_response","room_id":"R1","user_id":"U1","username":"alice"}"#
    )
    .is_err());
}

#[test]
fn server_message_round_trips() {
    let original = ServerMessage::UserInfo {
        users: vec![UserInfo {
            id: UserId::from("U1"),
            username: "alice".into(),
            leader: true,
            player_id: Some(PlayerId::from("P1")),
        }],
    };
    let json = serde_json::to_string(&original).unwrap();
    let back: ServerMessage = serde_json::from_str(&json).unwrap();
    match back {
        ServerMessage::UserInfo { users } => assert_eq!(users[0].username, "alice"),
        other => panic!("expected UserInfo, got {other:?}"),
    }
}
