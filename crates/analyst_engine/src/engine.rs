use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use analyst_core::{DiscoverRequest, HistoryTurn, SessionId, SynthesisRequest, Ticket};
use engine_logging::{engine_debug, engine_info};
use tokio_util::sync::CancellationToken;

use crate::{Backend, EngineEvent};

enum EngineCommand {
    LoadSession {
        ticket: Ticket,
        session_id: SessionId,
    },
    Discover {
        ticket: Ticket,
        request: DiscoverRequest,
    },
    Synthesize {
        ticket: Ticket,
        request: SynthesisRequest,
    },
    Deliver {
        ticket: Ticket,
        payload: serde_json::Value,
    },
    GenerateReport {
        ticket: Ticket,
        session_id: SessionId,
        extra: Vec<HistoryTurn>,
    },
    /// Completions for this panel generation must no longer be reported.
    CloseGeneration { generation: u64 },
}

impl EngineCommand {
    fn ticket(&self) -> Option<Ticket> {
        match self {
            EngineCommand::LoadSession { ticket, .. }
            | EngineCommand::Discover { ticket, .. }
            | EngineCommand::Synthesize { ticket, .. }
            | EngineCommand::Deliver { ticket, .. }
            | EngineCommand::GenerateReport { ticket, .. } => Some(*ticket),
            EngineCommand::CloseGeneration { .. } => None,
        }
    }
}

/// Runs backend calls on a background tokio runtime and hands completions
/// back through a channel the host drains on its own thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn Backend>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("analyst-engine".to_string())
            .spawn(move || {
                let mut liveness: HashMap<u64, CancellationToken> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    if let EngineCommand::CloseGeneration { generation } = command {
                        if let Some(token) = liveness.remove(&generation) {
                            engine_debug!("session generation {} closed", generation);
                            token.cancel();
                        }
                        continue;
                    }
                    let Some(ticket) = command.ticket() else {
                        continue;
                    };
                    let token = liveness.entry(ticket.generation).or_default().clone();
                    let backend = backend.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event = handle_command(backend.as_ref(), command).await;
                        if let Some(event) = event {
                            if token.is_cancelled() {
                                engine_debug!(
                                    "completion dropped for closed session (ticket {:?})",
                                    event.ticket()
                                );
                                return;
                            }
                            let _ = event_tx.send(event);
                        }
                    });
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load_session(&self, ticket: Ticket, session_id: SessionId) {
        self.send(EngineCommand::LoadSession { ticket, session_id });
    }

    pub fn discover(&self, ticket: Ticket, request: DiscoverRequest) {
        self.send(EngineCommand::Discover { ticket, request });
    }

    pub fn synthesize(&self, ticket: Ticket, request: SynthesisRequest) {
        self.send(EngineCommand::Synthesize { ticket, request });
    }

    pub fn deliver(&self, ticket: Ticket, payload: serde_json::Value) {
        self.send(EngineCommand::Deliver { ticket, payload });
    }

    pub fn generate_report(&self, ticket: Ticket, session_id: SessionId, extra: Vec<HistoryTurn>) {
        self.send(EngineCommand::GenerateReport {
            ticket,
            session_id,
            extra,
        });
    }

    pub fn close_generation(&self, generation: u64) {
        self.send(EngineCommand::CloseGeneration { generation });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(backend: &dyn Backend, command: EngineCommand) -> Option<EngineEvent> {
    let event = match command {
        EngineCommand::LoadSession { ticket, session_id } => {
            engine_info!("loading context for session {} (ticket {:?})", session_id, ticket);
            EngineEvent::SessionLoaded {
                ticket,
                result: backend.load_session(&session_id).await,
            }
        }
        EngineCommand::Discover { ticket, request } => EngineEvent::Discovered {
            ticket,
            result: backend.discover(&request).await,
        },
        EngineCommand::Synthesize { ticket, request } => EngineEvent::Synthesized {
            ticket,
            result: backend.synthesize(&request).await,
        },
        EngineCommand::Deliver { ticket, payload } => EngineEvent::Delivered {
            ticket,
            result: backend.deliver(&payload).await,
        },
        EngineCommand::GenerateReport {
            ticket,
            session_id,
            extra,
        } => EngineEvent::ReportReady {
            ticket,
            result: backend.generate_report(&session_id, &extra).await,
        },
        EngineCommand::CloseGeneration { .. } => return None,
    };
    Some(event)
}
