//! `medtrack-gateway` — the HTTP surface of the medication scheduler.
//!
//! Routes (see [`app::build_router`]):
//!
//! | Route                | Purpose                                        |
//! |----------------------|------------------------------------------------|
//! | `GET /health`        | Liveness probe                                 |
//! | `POST /schedule`     | Create a schedule                              |
//! | `GET /schedules`     | IDs of a user's unexpired schedules            |
//! | `GET /schedule`      | One schedule with today's computed takings     |
//! | `GET /next_takings`  | Upcoming doses within the configured lookahead |

pub mod app;
pub mod error;
pub mod http;
pub mod service;
