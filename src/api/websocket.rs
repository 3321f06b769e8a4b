//! WebSocket feed of the reconciled report list.
//!
//! A client receives a `snapshot` on connect and after every change of the
//! collection, plus `report_created`, `report_status_changed` and
//! `warning_posted` events as they happen. The connection owns its
//! subscriptions, so closing it unsubscribes.

use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::models::{WsEvent, WsEventMessage};
use crate::services::LiveReportView;
use crate::services::event_broadcaster::EventBroadcaster;
use crate::store::ReportStore;

const PING_INTERVAL: Duration = Duration::from_secs(30);
const PONG_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn websocket_handler(
    req: HttpRequest,
    stream: web::Payload,
    store: web::Data<ReportStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let client_addr = req
        .connection_info()
        .realip_remote_addr()
        .map(String::from)
        .unwrap_or_else(|| "unknown".to_string());

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    info!(client = %client_addr, "WebSocket connection established");

    actix_web::rt::spawn(handle_websocket_connection(
        session,
        msg_stream,
        store.live_view(),
        store.events().clone(),
        client_addr,
    ));

    Ok(response)
}

async fn send_event(session: &mut actix_ws::Session, event: &WsEventMessage) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => session.text(json).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize event");
            true
        }
    }
}

async fn handle_websocket_connection(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut view: LiveReportView,
    events: EventBroadcaster,
    client_addr: String,
) {
    let mut rx = events.subscribe();
    let mut feed_open = true;

    let initial = WsEventMessage::new(WsEvent::snapshot(view.current()));
    if !send_event(&mut session, &initial).await {
        return;
    }

    let mut last_pong = Instant::now();
    let mut ping_interval = tokio::time::interval(PING_INTERVAL);

    loop {
        tokio::select! {
            Some(msg_result) = msg_stream.next() => {
                match msg_result {
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Pong(_)) => {
                        last_pong = Instant::now();
                    }
                    Ok(Message::Text(text)) => {
                        debug!(client = %client_addr, message = %text, "Ignoring client message");
                    }
                    Ok(Message::Close(reason)) => {
                        info!(client = %client_addr, reason = ?reason, "Client requested close");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(client = %client_addr, error = %e, "WebSocket message error");
                        break;
                    }
                }
            }

            snapshot = view.changed(), if feed_open => {
                match snapshot {
                    Ok(reports) => {
                        let message = WsEventMessage::new(WsEvent::snapshot(reports));
                        if !send_event(&mut session, &message).await {
                            warn!(client = %client_addr, "Failed to send snapshot, closing connection");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(client = %client_addr, error = %e, "Report feed closed");
                        feed_open = false;
                    }
                }
            }

            event_result = rx.recv() => {
                match event_result {
                    Ok(event) => {
                        if !send_event(&mut session, &event).await {
                            warn!(client = %client_addr, "Failed to send event, closing connection");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(count)) => {
                        // The next snapshot carries the full state
                        warn!(client = %client_addr, missed = count, "Client lagged, missed events");
                    }
                    Err(RecvError::Closed) => {
                        info!(client = %client_addr, "Event channel closed");
                        break;
                    }
                }
            }

            _ = ping_interval.tick() => {
                if last_pong.elapsed() > PING_INTERVAL + PONG_TIMEOUT {
                    warn!(client = %client_addr, "Pong timeout, closing connection");
                    break;
                }
                if session.ping(b"").await.is_err() {
                    warn!(client = %client_addr, "Failed to send ping, closing connection");
                    break;
                }
            }
        }
    }

    let _ = session.close(None).await;
    info!(client = %client_addr, "WebSocket connection closed");
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(websocket_handler)));
}
