//! `BridgeSession` — the per-call bridge state machine (C6).
//!
//! One instance per telephony WebSocket. Drives a single cooperative loop
//! (`spec.md` §5 permits either a single-threaded event loop or a
//! task-per-direction split; this is the former, the way
//! `handlers::voice_ws::handle_audio_ws` splits into two tasks only because
//! it has to share one `axum::WebSocket` — here the telephony and AI peers
//! are already two independent objects, so one `tokio::select!` loop over
//! both suffices and needs no extra lock around `pendingAudio`/`aiReady`).

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use relay_core::domain::{CallId, Role, TranscriptTurn};
use relay_core::ports::{MetricsSink, TranscriptStore};

use crate::frames::{
    AiInboundFrame, AiOutboundFrame, ConversationInitiationClientData, MediaPayload,
    TelephonyInboundFrame, TelephonyOutboundFrame,
};
use crate::peer::{AiConnector, AiPeer, RecvResult, TelephonyPeer};
use crate::reconnect::backoff_for;

/// The state-machine states named in `spec.md` §4.6. Tracked alongside the
/// `stream_id`/`ai_ready` fields (which actually drive behavior) purely so
/// every log line can report a state name instead of an ad hoc string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Opening,
    AwaitStreamId,
    AiConnecting,
    AiOpenNotReady,
    Ready,
    Terminating,
    Closed,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_ai_retries: u32,
    pub idle_timeout: Duration,
}

/// Why a session's `run()` returned. Useful to callers (and tests) that
/// want to distinguish "caller hung up" from "we gave up reconnecting"
/// from "nobody spoke for 5 minutes" without re-deriving it from logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    TelephonyClosed,
    ReconnectExhausted,
    IdleTimeout,
}

pub struct BridgeSession {
    config: SessionConfig,
    call_id: CallId,
    init_data: ConversationInitiationClientData,
    transcript: Arc<dyn TranscriptStore>,
    metrics: Arc<dyn MetricsSink>,

    state: SessionState,
    stream_id: Option<String>,
    pending_audio: VecDeque<String>,
    ai_ready: bool,
    reconnect_attempts: u32,
}

impl BridgeSession {
    #[must_use]
    pub fn new(
        call_id: CallId,
        init_data: ConversationInitiationClientData,
        transcript: Arc<dyn TranscriptStore>,
        metrics: Arc<dyn MetricsSink>,
        config: SessionConfig,
    ) -> Self {
        Self {
            config,
            call_id,
            init_data,
            transcript,
            metrics,
            state: SessionState::Opening,
            stream_id: None,
            pending_audio: VecDeque::new(),
            ai_ready: false,
            reconnect_attempts: 0,
        }
    }

    /// Drive the session to completion. Returns once both peers are torn
    /// down and no further work remains.
    pub async fn run<T, C>(mut self, mut telephony: T, connector: C) -> SessionOutcome
    where
        T: TelephonyPeer,
        C: AiConnector,
    {
        let idle_deadline = tokio::time::Instant::now() + self.config.idle_timeout;
        let mut ai: Option<C::Peer> = None;
        let mut pending_backoff: Option<Duration> = None;
        self.state = SessionState::AiConnecting;

        loop {
            if let Some(mut peer) = ai.take() {
                tokio::select! {
                    biased;

                    () = tokio::time::sleep_until(idle_deadline) => {
                        info!(call_id = %self.call_id, "idle timeout reached");
                        peer.close().await;
                        telephony.close().await;
                        self.state = SessionState::Closed;
                        return SessionOutcome::IdleTimeout;
                    }

                    tel_msg = telephony.recv() => {
                        match self.handle_telephony(tel_msg, Some(&mut peer)).await {
                            ControlFlow::Continue(()) => { ai = Some(peer); }
                            ControlFlow::Break(outcome) => {
                                peer.close().await;
                                return outcome;
                            }
                        }
                    }

                    ai_msg = peer.recv() => {
                        match ai_msg {
                            Some(Ok(frame)) => {
                                self.handle_ai_frame(frame, &mut telephony, &mut peer).await;
                                ai = Some(peer);
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "malformed AI frame, dropping");
                                ai = Some(peer);
                            }
                            None => {
                                info!(call_id = %self.call_id, "AI peer disconnected");
                                self.ai_ready = false;
                                match self.note_failure_and_backoff() {
                                    Some(delay) => {
                                        self.state = SessionState::AiConnecting;
                                        pending_backoff = Some(delay);
                                    }
                                    None => {
                                        warn!(call_id = %self.call_id, "AI reconnect budget exhausted");
                                        telephony.close().await;
                                        self.state = SessionState::Closed;
                                        return SessionOutcome::ReconnectExhausted;
                                    }
                                }
                            }
                        }
                    }
                }
            } else {
                let connect_fut = async {
                    if let Some(delay) = pending_backoff.take() {
                        tokio::time::sleep(delay).await;
                    }
                    connector.connect().await
                };

                tokio::select! {
                    biased;

                    () = tokio::time::sleep_until(idle_deadline) => {
                        info!(call_id = %self.call_id, "idle timeout reached while reconnecting");
                        telephony.close().await;
                        self.state = SessionState::Closed;
                        return SessionOutcome::IdleTimeout;
                    }

                    tel_msg = telephony.recv() => {
                        match self.handle_telephony(tel_msg, None).await {
                            ControlFlow::Continue(()) => {}
                            ControlFlow::Break(outcome) => return outcome,
                        }
                    }

                    result = connect_fut => {
                        match result {
                            Ok(mut peer) => {
                                self.state = SessionState::AiOpenNotReady;
                                if self.init_data.script.is_some()
                                    || self.init_data.persona.is_some()
                                    || self.init_data.context.is_some()
                                {
                                    if let Err(e) = peer
                                        .send(AiOutboundFrame::init(self.init_data.clone()))
                                        .await
                                    {
                                        warn!(error = %e, "failed sending conversation init frame");
                                    }
                                }
                                ai = Some(peer);
                            }
                            Err(e) => {
                                warn!(error = %e, "AI connect failed");
                                match self.note_failure_and_backoff() {
                                    Some(delay) => pending_backoff = Some(delay),
                                    None => {
                                        warn!(call_id = %self.call_id, "AI reconnect budget exhausted");
                                        telephony.close().await;
                                        self.state = SessionState::Closed;
                                        return SessionOutcome::ReconnectExhausted;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// `reconnectAttempts` never exceeds `max_ai_retries` (`spec.md` §8
    /// invariant 4): checked *before* incrementing, so the field's value is
    /// always a count of attempts already made, never a count that would
    /// authorize one more than the budget allows.
    fn note_failure_and_backoff(&mut self) -> Option<Duration> {
        if self.reconnect_attempts >= self.config.max_ai_retries {
            return None;
        }
        self.reconnect_attempts += 1;
        Some(backoff_for(self.reconnect_attempts))
    }

    async fn handle_telephony<P: AiPeer>(
        &mut self,
        msg: RecvResult<TelephonyInboundFrame>,
        ai: Option<&mut P>,
    ) -> ControlFlow<SessionOutcome> {
        let Some(result) = msg else {
            info!(call_id = %self.call_id, "telephony peer closed");
            self.state = SessionState::Closed;
            return ControlFlow::Break(SessionOutcome::TelephonyClosed);
        };

        let frame = match result {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "malformed telephony frame, dropping");
                return ControlFlow::Continue(());
            }
        };

        // "If any other event arrives before start, it is ignored (but not
        // fatal)." (spec.md §4.6) — applies to every event type, not just
        // media.
        if self.stream_id.is_none() {
            if let TelephonyInboundFrame::Start { start } = &frame {
                info!(stream_sid = %start.stream_sid, "telephony stream started");
                self.stream_id = Some(start.stream_sid.clone());
                self.state = SessionState::AwaitStreamId;
            } else {
                debug!("telephony event before start observed, ignoring");
            }
            return ControlFlow::Continue(());
        }

        match frame {
            TelephonyInboundFrame::Start { .. } => {
                debug!("duplicate start event, ignoring");
                ControlFlow::Continue(())
            }
            TelephonyInboundFrame::Media { media } => {
                self.handle_caller_audio(media, ai).await;
                ControlFlow::Continue(())
            }
            TelephonyInboundFrame::Stop => {
                info!(call_id = %self.call_id, "caller stop received");
                self.state = SessionState::Terminating;
                ControlFlow::Break(SessionOutcome::TelephonyClosed)
            }
            TelephonyInboundFrame::Other => {
                debug!("unrecognized telephony event, ignoring");
                ControlFlow::Continue(())
            }
        }
    }

    async fn handle_caller_audio<P: AiPeer>(&mut self, media: MediaPayload, ai: Option<&mut P>) {
        if self.ai_ready {
            if let Some(peer) = ai {
                if let Err(e) = peer
                    .send(AiOutboundFrame::user_audio_chunk(media.payload))
                    .await
                {
                    warn!(error = %e, "failed forwarding caller audio to AI peer");
                }
                return;
            }
        }
        // Not ready (or, defensively, no live connection despite the ready
        // flag): buffer in order. Drained FIFO on the next
        // `conversation_initiation_metadata` (spec.md §3 invariant 2).
        self.pending_audio.push_back(media.payload);
    }

    async fn handle_ai_frame<T: TelephonyPeer, P: AiPeer>(
        &mut self,
        frame: AiInboundFrame,
        telephony: &mut T,
        peer: &mut P,
    ) {
        match frame {
            AiInboundFrame::ConversationInitiationMetadata => {
                info!(call_id = %self.call_id, "AI peer ready");
                self.ai_ready = true;
                self.state = SessionState::Ready;
                if self.reconnect_attempts > 0 {
                    self.metrics.inc_reconnects_total();
                }
                self.reconnect_attempts = 0;

                while let Some(payload) = self.pending_audio.pop_front() {
                    if let Err(e) = peer.send(AiOutboundFrame::user_audio_chunk(payload)).await {
                        warn!(error = %e, "failed flushing buffered caller audio");
                        break;
                    }
                }
            }
            AiInboundFrame::Audio { audio_event } => {
                if let Some(stream_id) = self.stream_id.clone() {
                    let outbound = TelephonyOutboundFrame::Media {
                        stream_sid: stream_id,
                        media: MediaPayload {
                            payload: audio_event.audio_base_64,
                        },
                    };
                    if let Err(e) = telephony.send(outbound).await {
                        warn!(error = %e, "failed forwarding AI audio to telephony peer");
                    }
                } else {
                    // "the frame cannot be correctly tagged" (spec.md §4.6) — drop.
                    debug!("AI audio received before stream_id known, dropping");
                }
            }
            AiInboundFrame::Interruption => {
                if let Some(stream_id) = self.stream_id.clone() {
                    if let Err(e) = telephony
                        .send(TelephonyOutboundFrame::Clear { stream_sid: stream_id })
                        .await
                    {
                        warn!(error = %e, "failed sending clear frame for barge-in");
                    }
                }
            }
            AiInboundFrame::Ping { ping_event } => {
                if let Err(e) = peer.send(AiOutboundFrame::pong(ping_event.event_id)).await {
                    warn!(error = %e, "failed sending pong");
                }
            }
            AiInboundFrame::UserTranscript {
                user_transcription_event,
            } => {
                self.transcript
                    .append(
                        &self.call_id,
                        TranscriptTurn {
                            role: Role::User,
                            text: user_transcription_event.user_transcript,
                            timestamp: Utc::now(),
                        },
                    )
                    .await;
            }
            AiInboundFrame::AgentResponse {
                agent_response_event,
            } => {
                self.transcript
                    .append(
                        &self.call_id,
                        TranscriptTurn {
                            role: Role::Agent,
                            text: agent_response_event.agent_response,
                            timestamp: Utc::now(),
                        },
                    )
                    .await;
            }
            AiInboundFrame::Unknown => {
                debug!("unrecognized AI frame type, ignoring");
            }
        }
    }
}
