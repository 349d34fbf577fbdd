//! Full game flow over the HTTP surface, the way the two real clients use it:
//! the web UI creates and starts the game and issues moves, the die firmware
//! posts rolls, and both share the `/game/update` gateway.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use snakes_ladders_server::app::AppState;
use snakes_ladders_server::config::Config;
use snakes_ladders_server::http::build_router;

fn test_router() -> Router {
    let config = Config {
        server_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "info".to_string(),
        client_origin: "*".to_string(),
    };
    build_router(AppState::new(config))
}

async fn request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, Method::POST, uri, Some(body)).await
}

/// Roll the die, then report the resolved destination, as the clients do.
async fn play_turn(app: &Router, game_id: &str, dice: u8, destination: u16, transport: Option<&str>) {
    let (status, body) = post(
        app,
        "/game/update",
        json!({ "type": "dice_roll", "gameId": game_id, "diceValue": dice }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "roll rejected: {body}");

    let mut command = json!({
        "type": "player_move",
        "gameId": game_id,
        "newPosition": destination,
    });
    if let Some(kind) = transport {
        command["moveType"] = json!(kind);
    }
    let (status, body) = post(app, "/game/update", command).await;
    assert_eq!(status, StatusCode::OK, "move rejected: {body}");
}

#[tokio::test]
async fn test_full_game_from_creation_to_history() {
    let app = test_router();

    // The UI sets up the match.
    let (status, body) = post(
        &app,
        "/game",
        json!({
            "player1Name": "Ann",
            "player1Color": "red",
            "player2Name": "Bo",
            "player2Color": "blue",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let game_id = body["gameId"].as_str().unwrap().to_string();

    let (status, game) = get(&app, &format!("/game/{game_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["status"], "setup");
    assert_eq!(game["player1Position"], 0);
    assert_eq!(game["player2Position"], 0);
    assert_eq!(game["currentPlayer"], 1);
    assert_eq!(game["boardTopology"]["snakes"].as_array().unwrap().len(), 10);
    assert_eq!(game["boardTopology"]["ladders"].as_array().unwrap().len(), 9);

    let (status, body) = post(&app, &format!("/game/{game_id}/start"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Four honest turns. Ann rides the 4-ladder up, then the 16-snake down;
    // Bo walks to 6, then takes the 9-ladder to 21 and stays there even
    // though 21 is itself a ladder bottom.
    play_turn(&app, &game_id, 4, 14, Some("ladder")).await;
    play_turn(&app, &game_id, 6, 6, None).await;
    play_turn(&app, &game_id, 2, 6, Some("snake")).await;
    play_turn(&app, &game_id, 3, 21, Some("ladder")).await;

    let (_, game) = get(&app, &format!("/game/{game_id}")).await;
    assert_eq!(game["player1Position"], 6);
    assert_eq!(game["player2Position"], 21);
    assert_eq!(game["currentPlayer"], 1);
    assert_eq!(game["status"], "playing");

    // Destinations are client-resolved and trusted, so the test can jump to
    // the endgame. Ann finishes from 97 with a 6, overshooting to 103.
    play_turn(&app, &game_id, 5, 97, None).await;
    play_turn(&app, &game_id, 1, 22, None).await;
    play_turn(&app, &game_id, 6, 103, None).await;

    let (_, game) = get(&app, &format!("/game/{game_id}")).await;
    assert_eq!(game["status"], "finished");
    assert_eq!(game["winner"], 1);
    assert_eq!(game["player1Position"], 100, "overshoot is stored capped");
    assert_eq!(game["player2Position"], 22);
    assert_eq!(game["currentPlayer"], 2);
    assert_eq!(game["lastDiceRoll"], 6);
    assert_eq!(game["lastMoveType"], "normal");
    assert!(game["endTime"].is_i64());
    assert!(game["duration"].is_u64());

    // One archive record, written at the moment of the win.
    let (status, history) = get(&app, "/history").await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap().clone();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["gameId"], game_id.as_str());
    assert_eq!(history[0]["winner"], 1);
    assert_eq!(history[0]["player1Name"], "Ann");
    assert_eq!(history[0]["player2Name"], "Bo");
    assert_eq!(history[0]["duration"], game["duration"]);
    assert_eq!(history[0]["completedAt"], game["endTime"]);

    // The event log replays the whole game newest-first: the winning move,
    // then the game_end marker, back to game_start at the tail.
    let (status, events) = get(&app, &format!("/game/{game_id}/events")).await;
    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().unwrap().clone();
    assert_eq!(events.len(), 16);
    assert_eq!(events[0]["eventType"], "move");
    assert_eq!(events[0]["data"]["newPosition"], 100);
    assert_eq!(events[1]["eventType"], "game_end");
    assert_eq!(events[1]["data"]["winner"], 1);
    assert_eq!(events[1]["data"]["position"], 100);
    assert_eq!(events[events.len() - 1]["eventType"], "game_start");

    let dice_rolls: Vec<&Value> = events
        .iter()
        .filter(|e| e["eventType"] == "dice_roll")
        .collect();
    assert_eq!(dice_rolls.len(), 7);
    assert_eq!(dice_rolls[0]["player"], 1, "newest roll belongs to the winner");
    let transports: Vec<&str> = events
        .iter()
        .filter_map(|e| e["eventType"].as_str())
        .filter(|kind| kind.ends_with("_encounter"))
        .collect();
    assert_eq!(transports, ["ladder_encounter", "snake_encounter", "ladder_encounter"]);

    // Finished games accept no further commands from either client.
    let (status, body) = post(
        &app,
        "/game/update",
        json!({ "type": "dice_roll", "gameId": game_id, "diceValue": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "cannot record a dice roll: game is finished");

    let (status, _) = post(
        &app,
        "/game/update",
        json!({ "type": "player_move", "gameId": game_id, "newPosition": 30 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_gateway_contract_for_the_die_firmware() {
    let app = test_router();

    // The firmware only ever checks for a 2xx and retries otherwise, so the
    // envelope errors must stay stable.
    let (status, body) = post(&app, "/game/update", json!({ "type": "restart" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown update type");

    let (status, body) = post(&app, "/game/update", json!({ "diceValue": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown update type");

    // In-range envelope, out-of-range die.
    let (status, body) = post(
        &app,
        "/game",
        json!({
            "player1Name": "Ann",
            "player1Color": "red",
            "player2Name": "Bo",
            "player2Color": "blue",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let game_id = body["gameId"].as_str().unwrap().to_string();
    let (status, _) = post(&app, &format!("/game/{game_id}/start"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/game/update",
        json!({ "type": "dice_roll", "gameId": game_id, "diceValue": 9 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "dice value must be between 1 and 6, got 9");
}
