use std::io::Write;

use analyst_core::{Effect, Msg, PanelState, TransportFailure};
use analyst_engine::{AtomicFileWriter, EngineEvent, EngineHandle};
use engine_logging::{engine_info, engine_warn};

use crate::render;

/// Carries effects out: backend calls go to the engine, artifacts to disk,
/// and conversation updates to the terminal.
pub struct EffectRunner<W: Write> {
    engine: EngineHandle,
    writer: AtomicFileWriter,
    out: W,
}

impl<W: Write> EffectRunner<W> {
    pub fn new(engine: EngineHandle, writer: AtomicFileWriter, out: W) -> Self {
        Self {
            engine,
            writer,
            out,
        }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Runs one batch of effects produced by a single update against `state`.
    pub fn run(&mut self, state: &PanelState, effects: Vec<Effect>) {
        let appended = effects
            .iter()
            .filter(|e| matches!(e, Effect::TurnAppended(_)))
            .count();
        let mut position = state.transcript().len().saturating_sub(appended);
        let mut went_busy = false;

        for effect in effects {
            match effect {
                Effect::LoadSession { ticket, session_id } => {
                    self.engine.load_session(ticket, session_id);
                }
                Effect::Discover { ticket, request } => {
                    engine_info!("discover seq={} gen={}", ticket.seq, ticket.generation);
                    self.engine.discover(ticket, request);
                }
                Effect::Synthesize { ticket, request } => {
                    engine_info!("synthesize seq={} gen={}", ticket.seq, ticket.generation);
                    self.engine.synthesize(ticket, request);
                }
                Effect::Deliver { ticket, payload } => {
                    engine_info!("deliver seq={} gen={}", ticket.seq, ticket.generation);
                    self.engine.deliver(ticket, payload);
                }
                Effect::GenerateReport {
                    ticket,
                    session_id,
                    extra,
                } => {
                    engine_info!("report for session {} ({} turns)", session_id, extra.len());
                    self.engine.generate_report(ticket, session_id, extra);
                }
                Effect::SaveArtifact { filename, bytes } => {
                    match self.writer.write(&filename, &bytes) {
                        Ok(path) => {
                            engine_info!("saved {} bytes to {:?}", bytes.len(), path);
                            self.line(format!("report saved to {}", path.display()));
                        }
                        Err(err) => {
                            engine_warn!("failed to save {}: {}", filename, err);
                            self.line(format!("! could not save the report: {err}"));
                        }
                    }
                }
                Effect::OpenArtifact { url } => {
                    self.line(format!("open in your browser: {url}"));
                }
                Effect::CloseSession { generation } => {
                    self.engine.close_generation(generation);
                }
                Effect::TurnAppended(entry) => {
                    position += 1;
                    self.line(render::render_entry(position, &entry));
                }
                Effect::CandidatesChanged(candidates) => {
                    if !candidates.is_empty() {
                        for line in render::render_candidates(&candidates) {
                            self.line(line);
                        }
                    }
                }
                Effect::BusyChanged(busy) => went_busy = busy,
                Effect::ShowValidation(failure) => {
                    self.line(format!("! {failure}"));
                }
                Effect::ScrollToBottom => {}
            }
        }

        // Status goes below whatever the batch printed.
        if went_busy {
            if let Some(status) = render::status_line(state.stage()) {
                self.line(status.to_string());
            }
        }
        let _ = self.out.flush();
    }

    fn line(&mut self, text: String) {
        let _ = writeln!(self.out, "{text}");
    }
}

/// Translates an engine completion into the panel message carrying it.
pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SessionLoaded { ticket, result } => Msg::SessionLoaded {
            ticket,
            result: result.map_err(TransportFailure::from),
        },
        EngineEvent::Discovered { ticket, result } => Msg::DiscoveryCompleted {
            ticket,
            result: result.map_err(TransportFailure::from),
        },
        EngineEvent::Synthesized { ticket, result } => Msg::SynthesisCompleted {
            ticket,
            result: result.map_err(TransportFailure::from),
        },
        EngineEvent::Delivered { ticket, result } => Msg::DeliveryCompleted {
            ticket,
            result: result.map_err(TransportFailure::from),
        },
        EngineEvent::ReportReady { ticket, result } => Msg::ReportCompleted {
            ticket,
            result: result.map_err(TransportFailure::from),
        },
    }
}
