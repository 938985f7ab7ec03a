//! Typed request/response contract for adapters.
//!
//! Wire requests (`Request`) are validated into a `Command` before anything
//! reaches the service, so the engine only ever sees a parsed `Position`,
//! an integer turn index, and a well-formed session id.

use serde::{Deserialize, Serialize};
use tradegame_core::domain::{InstrumentId, Position, SessionId};
use tradegame_core::GameError;

use crate::service::{GameService, RestartedSession, StartedSession, TurnOutcome, WindowView};

/// A request as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Start {
        #[serde(default)]
        instrument: Option<String>,
    },
    Window {
        session_id: String,
        #[serde(default)]
        instrument: Option<String>,
    },
    Turn {
        session_id: String,
        #[serde(default)]
        position: Option<String>,
        #[serde(default)]
        current_turn: Option<serde_json::Value>,
    },
    Restart {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        instrument: Option<String>,
    },
    Benchmark {
        instrument: String,
    },
}

/// A validated request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start {
        hint: Option<String>,
    },
    Window {
        session_id: SessionId,
        hint: Option<String>,
    },
    Turn {
        session_id: SessionId,
        position: Position,
        current_turn: i64,
    },
    Restart {
        previous: Option<SessionId>,
        hint: Option<String>,
    },
    Benchmark {
        instrument: InstrumentId,
    },
}

impl TryFrom<Request> for Command {
    type Error = GameError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        Ok(match request {
            Request::Start { instrument } => Command::Start {
                hint: non_empty(instrument),
            },
            Request::Window {
                session_id,
                instrument,
            } => Command::Window {
                session_id: session_id.parse()?,
                hint: non_empty(instrument),
            },
            Request::Turn {
                session_id,
                position,
                current_turn,
            } => {
                let position: Position = position.unwrap_or_default().parse()?;
                let current_turn = parse_turn(current_turn)?;
                Command::Turn {
                    session_id: session_id.parse()?,
                    position,
                    current_turn,
                }
            }
            Request::Restart {
                session_id,
                instrument,
            } => Command::Restart {
                // A stale or garbled previous id does not block a restart.
                previous: session_id.and_then(|s| s.parse().ok()),
                hint: non_empty(instrument),
            },
            Request::Benchmark { instrument } => Command::Benchmark { instrument },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_turn(value: Option<serde_json::Value>) -> Result<i64, GameError> {
    let value = value.ok_or_else(|| GameError::InvalidTurnIndex {
        reason: "missing current_turn".into(),
    })?;
    value.as_i64().ok_or_else(|| GameError::InvalidTurnIndex {
        reason: format!("expected an integer, got {value}"),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Started(StartedSession),
    Window(WindowView),
    Turn(TurnOutcome),
    Restarted(RestartedSession),
    Benchmark { instrument_id: InstrumentId, pnl: f64 },
    Error { error: String, message: String },
}

impl Response {
    pub fn from_error(err: &GameError) -> Self {
        Response::Error {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }

    /// Payload that could not be decoded into any `Request`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Response::Error {
            error: "bad_request".into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

/// Validate and execute one request.
pub fn handle(service: &GameService, request: Request) -> Response {
    match Command::try_from(request).and_then(|command| execute(service, command)) {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(error = %err, "request failed");
            Response::from_error(&err)
        }
    }
}

/// Decode one JSON line and handle it.
pub fn handle_json(service: &GameService, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(service, request),
        Err(err) => Response::bad_request(err.to_string()),
    }
}

pub fn execute(service: &GameService, command: Command) -> Result<Response, GameError> {
    Ok(match command {
        Command::Start { hint } => Response::Started(service.start_session(hint.as_deref())?),
        Command::Window { session_id, hint } => {
            Response::Window(service.get_window(&session_id, hint.as_deref())?)
        }
        Command::Turn {
            session_id,
            position,
            current_turn,
        } => Response::Turn(service.submit_turn(&session_id, position, current_turn)?),
        Command::Restart { previous, hint } => {
            Response::Restarted(service.restart(previous.as_ref(), hint.as_deref())?)
        }
        Command::Benchmark { instrument } => Response::Benchmark {
            pnl: service.buy_hold_pnl(&instrument)?,
            instrument_id: instrument,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Result<Command, GameError> {
        Command::try_from(serde_json::from_value::<Request>(value).unwrap())
    }

    #[test]
    fn turn_request_validates_into_command() {
        let id = SessionId::new();
        let command = decode(json!({
            "op": "turn",
            "session_id": id.to_string(),
            "position": "short",
            "current_turn": 17,
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::Turn {
                session_id: id,
                position: Position::Short,
                current_turn: 17,
            }
        );
    }

    #[test]
    fn unknown_position_is_rejected() {
        let err = decode(json!({
            "op": "turn",
            "session_id": SessionId::new().to_string(),
            "position": "hold",
            "current_turn": 17,
        }))
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidPosition { .. }));
    }

    #[test]
    fn missing_position_is_rejected() {
        let err = decode(json!({
            "op": "turn",
            "session_id": SessionId::new().to_string(),
            "current_turn": 17,
        }))
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidPosition { ref value } if value.is_empty()));
    }

    #[test]
    fn non_integer_turn_is_invalid_turn_index() {
        for bad in [json!("17"), json!(16.5), json!(null)] {
            let err = decode(json!({
                "op": "turn",
                "session_id": SessionId::new().to_string(),
                "position": "long",
                "current_turn": bad,
            }))
            .unwrap_err();
            assert!(matches!(err, GameError::InvalidTurnIndex { .. }), "{err}");
        }
    }

    #[test]
    fn negative_turn_passes_validation() {
        // Range is checked against the bound series, not at the boundary.
        let command = decode(json!({
            "op": "turn",
            "session_id": SessionId::new().to_string(),
            "position": "long",
            "current_turn": -1,
        }))
        .unwrap();
        assert!(matches!(command, Command::Turn { current_turn: -1, .. }));
    }

    #[test]
    fn garbled_session_id_is_session_not_found() {
        let err = decode(json!({ "op": "window", "session_id": "abc" })).unwrap_err();
        assert!(matches!(err, GameError::SessionNotFound { .. }));
    }

    #[test]
    fn restart_tolerates_garbled_previous_id() {
        let command = decode(json!({ "op": "restart", "session_id": "abc" })).unwrap();
        assert_eq!(
            command,
            Command::Restart {
                previous: None,
                hint: None
            }
        );
    }

    #[test]
    fn blank_instrument_hint_is_none() {
        let command = decode(json!({ "op": "start", "instrument": "  " })).unwrap();
        assert_eq!(command, Command::Start { hint: None });
    }

    #[test]
    fn error_response_serializes_kind() {
        let response = Response::from_error(&GameError::OutOfRange { index: 0, len: 32 });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({
                "kind": "error",
                "error": "out_of_range",
                "message": GameError::OutOfRange { index: 0, len: 32 }.to_string(),
            })
        );
    }
}
