#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Inbound frames must fail closed: arbitrary bytes may never panic the
    // decoder, only produce an error the dispatcher drops.
    let _ = serde_json::from_slice::<board_game_client::protocol::ServerMessage>(data);

    // Same for the str-based path used by the transport loop.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<board_game_client::protocol::ServerMessage>(s);
    }
});
