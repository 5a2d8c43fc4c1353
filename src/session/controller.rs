//! Session controller for the conversational client
//!
//! `ChatSession` owns the interaction state machine, the conversation log,
//! the model selector, the microphone and the backend gateway, and funnels
//! every network interaction through a single-flight state gate. UI layers
//! drive it through the operation methods and render from the
//! `SessionEvent` stream, querying the session directly for snapshots.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::config::SessionConfig;
use crate::audio::{AudioCapture, Microphone};
use crate::conversation::{ConversationEntry, ConversationLog, Role};
use crate::gateway::{BackendGateway, ChatReply, TranscribeReply};
use crate::language::Language;
use crate::reply::decompose_reply;
use crate::settings::{ModelDescriptor, ModelSelector, SelectionIssue, Settings};
use crate::state::{InteractionState, StatusLine};
use crate::Result;

/// Notification that a render pass is worth doing.
///
/// Events carry the changed value for convenience, but state should be
/// queried from the session directly rather than reconstructed from the
/// stream.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// An entry was appended to the conversation log
    EntryAppended(ConversationEntry),
    /// The interaction state changed
    StateChanged(InteractionState),
    /// The status line changed
    StatusChanged(StatusLine),
}

/// What a talk-control press should do, decided under the state lock
enum TalkTransition {
    Begin,
    Finish,
    Dropped,
}

/// Mutable session state behind the lock
struct SessionCore {
    state: InteractionState,
    status: StatusLine,
    language: Language,
    log: ConversationLog,
    selector: ModelSelector,
    settings_open: bool,
}

/// Controller for one conversation session.
///
/// All operations take `&self`, so the session can be shared behind an
/// `Arc` between a driver task and observers. Locks are never held across
/// await points; the microphone lock is acquired before the state lock
/// when both are needed.
pub struct ChatSession {
    core: RwLock<SessionCore>,
    gateway: Box<dyn BackendGateway>,
    microphone: Mutex<Box<dyn Microphone>>,
    event_tx: Sender<SessionEvent>,
    config: SessionConfig,
}

impl ChatSession {
    /// Create a session over the given gateway and microphone.
    ///
    /// Returns the session and the receiver for its event stream. The
    /// conversation log starts with the welcome entry, which is emitted as
    /// the first event.
    pub fn new(
        gateway: Box<dyn BackendGateway>,
        microphone: Box<dyn Microphone>,
        config: SessionConfig,
    ) -> (Self, Receiver<SessionEvent>) {
        let (event_tx, event_rx) = unbounded();

        let log = ConversationLog::new();
        let welcome = log.entries()[0].clone();

        let session = Self {
            core: RwLock::new(SessionCore {
                state: InteractionState::Idle,
                status: StatusLine::Ready,
                language: config.language,
                log,
                selector: ModelSelector::new(),
                settings_open: false,
            }),
            gateway,
            microphone: Mutex::new(microphone),
            event_tx,
            config,
        };
        session.emit(SessionEvent::EntryAppended(welcome));

        (session, event_rx)
    }

    /// Send a typed message and render the reply.
    ///
    /// Whitespace-only input is ignored without any state change. The
    /// message is dropped (with a warning) when the session is not idle.
    /// The session returns to `Idle` on every path.
    pub async fn submit_text(&self, text: &str) {
        let message = text.trim();
        if message.is_empty() {
            return;
        }
        if !self.try_begin_processing("submit_text") {
            return;
        }

        let request_id = Uuid::new_v4();
        debug!(%request_id, chars = message.len(), "sending chat message");

        self.append_entry(Role::User, message);
        self.set_status(StatusLine::Processing);

        let language = self.language().code();
        let outcome = self.gateway.send_text(message, language).await;
        self.handle_chat_reply(request_id, outcome).await;

        self.set_state(InteractionState::Idle);
    }

    /// Toggle the talk control.
    ///
    /// From `Idle` this starts recording (when the microphone can be
    /// acquired); from `Recording` it stops the take and uploads it for
    /// transcription; during `Processing` the press is dropped. The
    /// microphone is released on every path that reached it, and an upload
    /// always returns the session to `Idle`.
    pub async fn toggle_talk(&self) {
        // The device is driven under the microphone lock so rapid presses
        // serialize; the upload itself runs after the lock drops.
        let upload = {
            let mut microphone = self.microphone.lock();
            match self.claim_talk() {
                TalkTransition::Begin => {
                    match microphone.start_capture() {
                        Ok(()) => {
                            info!("microphone capture started");
                            self.emit(SessionEvent::StateChanged(InteractionState::Recording));
                            self.set_status(StatusLine::Recording);
                        }
                        Err(e) => {
                            error!(error = %e, "microphone acquisition failed");
                            // Roll the claim back; no Recording event was
                            // emitted, so observers never saw the attempt.
                            self.core.write().state = InteractionState::Idle;
                            self.set_status(StatusLine::MicrophoneError(e.detail().to_string()));
                        }
                    }
                    None
                }
                TalkTransition::Finish => {
                    self.set_status(StatusLine::RecordingStopped);
                    self.emit(SessionEvent::StateChanged(InteractionState::Processing));
                    Some(microphone.stop_capture())
                }
                TalkTransition::Dropped => None,
            }
        };

        if let Some(take) = upload {
            self.upload_take(take).await;
        }
    }

    /// Reset the conversation to the welcome entry.
    ///
    /// Permitted in any state; a reply still in flight appends after the
    /// reset under the restarted numbering.
    pub fn new_conversation(&self) {
        let welcome = self.core.write().log.reset();
        self.emit(SessionEvent::EntryAppended(welcome));
        self.set_status(StatusLine::Ready);
        info!("conversation reset");
    }

    /// Refresh the model list, replacing the set wholesale.
    ///
    /// A fetch failure is logged and leaves the previous set untouched.
    pub async fn refresh_models(&self) {
        if !self.try_begin_processing("refresh_models") {
            return;
        }

        let request_id = Uuid::new_v4();
        match self.gateway.list_models().await {
            Ok(list) => {
                info!(%request_id, count = list.models.len(), "model list refreshed");
                self.core.write().selector.load_models(list.models);
            }
            Err(e) => warn!(%request_id, error = %e, "model list fetch failed"),
        }

        self.set_state(InteractionState::Idle);
    }

    /// Refresh the stored settings, replacing committed and pending
    /// selections wholesale.
    ///
    /// Surfaces the transcription warning when the loaded selection cannot
    /// transcribe. A fetch failure is logged and leaves settings untouched.
    pub async fn refresh_settings(&self) {
        if !self.try_begin_processing("refresh_settings") {
            return;
        }

        let request_id = Uuid::new_v4();
        match self.gateway.fetch_settings().await {
            Ok(settings) => {
                info!(%request_id, transcription = %settings.transcription_model,
                      response = %settings.response_model, "settings refreshed");
                let issue = {
                    let mut core = self.core.write();
                    core.selector.load_settings(settings);
                    core.selector.validate()
                };
                if issue == Some(SelectionIssue::CannotTranscribe) {
                    self.set_status(StatusLine::TranscriptionModelWarning);
                }
            }
            Err(e) => warn!(%request_id, error = %e, "settings fetch failed"),
        }

        self.set_state(InteractionState::Idle);
    }

    /// Fetch the model list, then the stored settings.
    pub async fn initialize(&self) {
        self.refresh_models().await;
        self.refresh_settings().await;
    }

    /// Save the pending model selections.
    ///
    /// A pending transcription model missing from the model set refuses
    /// the save outright. A model that cannot transcribe needs `confirmed`
    /// to proceed; an unconfirmed attempt surfaces the warning and makes
    /// no backend call. On success the pending selections become committed
    /// and the settings surface closes; on failure they are retained so
    /// the user can retry.
    pub async fn save_settings(&self, confirmed: bool) {
        let issue = self.core.read().selector.validate();
        match issue {
            Some(SelectionIssue::UnknownTranscriptionModel) => {
                warn!("settings save refused: transcription model not in the model set");
                self.set_status(StatusLine::TranscriptionModelMissing);
                return;
            }
            Some(SelectionIssue::CannotTranscribe) if !confirmed => {
                warn!("settings save needs confirmation: selected model cannot transcribe");
                self.set_status(StatusLine::TranscriptionModelWarning);
                return;
            }
            _ => {}
        }

        if !self.try_begin_processing("save_settings") {
            return;
        }

        let request_id = Uuid::new_v4();
        self.set_status(StatusLine::SavingSettings);

        let pending = self.core.read().selector.pending().clone();
        debug!(%request_id, transcription = %pending.transcription_model,
               response = %pending.response_model, "saving settings");

        match self.gateway.save_settings(&pending).await {
            Ok(reply) if reply.success => {
                info!(%request_id, "settings saved");
                let committed = reply.settings.unwrap_or(pending);
                {
                    let mut core = self.core.write();
                    core.selector.load_settings(committed);
                    core.settings_open = false;
                }
                self.set_status(StatusLine::SettingsSaved);
            }
            Ok(reply) => {
                error!(%request_id, error = reply.error.as_deref().unwrap_or("rejected"),
                       "settings save rejected");
                self.set_status(StatusLine::SettingsSaveFailed);
            }
            Err(e) => {
                error!(%request_id, error = %e, "settings save failed");
                self.set_status(StatusLine::RequestError(e.detail().to_string()));
            }
        }

        self.set_state(InteractionState::Idle);
    }

    /// Select the transcription language
    pub fn set_language(&self, language: Language) {
        self.core.write().language = language;
        debug!(language = %language, "language selected");
    }

    /// The currently selected transcription language
    pub fn language(&self) -> Language {
        self.core.read().language
    }

    /// Open the settings surface
    pub fn open_settings(&self) {
        self.core.write().settings_open = true;
    }

    /// Close the settings surface, discarding nothing; pending selections
    /// survive until the next refresh or save
    pub fn close_settings(&self) {
        self.core.write().settings_open = false;
    }

    /// Whether the settings surface is open
    pub fn settings_open(&self) -> bool {
        self.core.read().settings_open
    }

    /// Update the pending transcription model (applied on save)
    pub fn select_transcription_model(&self, id: &str) {
        self.core.write().selector.select_transcription_model(id);
    }

    /// Update the pending response model (applied on save)
    pub fn select_response_model(&self, id: &str) {
        self.core.write().selector.select_response_model(id);
    }

    /// The current interaction state
    pub fn state(&self) -> InteractionState {
        self.core.read().state
    }

    /// The current status line
    pub fn status(&self) -> StatusLine {
        self.core.read().status.clone()
    }

    /// Snapshot of the conversation entries
    pub fn entries(&self) -> Vec<ConversationEntry> {
        self.core.read().log.entries().to_vec()
    }

    /// Snapshot of the available models
    pub fn models(&self) -> Vec<ModelDescriptor> {
        self.core.read().selector.models().to_vec()
    }

    /// Snapshot of the models eligible for transcription
    pub fn transcription_models(&self) -> Vec<ModelDescriptor> {
        self.core
            .read()
            .selector
            .transcription_models()
            .into_iter()
            .cloned()
            .collect()
    }

    /// The last settings acknowledged by the backend
    pub fn settings(&self) -> Settings {
        self.core.read().selector.committed().clone()
    }

    /// The selections not yet saved
    pub fn pending_settings(&self) -> Settings {
        self.core.read().selector.pending().clone()
    }

    /// Decide what a talk press does, flipping the state under the lock.
    ///
    /// The `Idle -> Recording` claim happens before the microphone is
    /// touched so no concurrent action can slip in while the device is
    /// being acquired; `toggle_talk` rolls the claim back if acquisition
    /// fails.
    fn claim_talk(&self) -> TalkTransition {
        let mut core = self.core.write();
        match core.state {
            InteractionState::Idle => {
                core.state = InteractionState::Recording;
                TalkTransition::Begin
            }
            InteractionState::Recording => {
                core.state = InteractionState::Processing;
                TalkTransition::Finish
            }
            InteractionState::Processing => {
                warn!("talk control dropped: a request is already in flight");
                TalkTransition::Dropped
            }
        }
    }

    /// Upload a finished take and render the transcription outcome.
    async fn upload_take(&self, take: Result<AudioCapture>) {
        let request_id = Uuid::new_v4();
        match take {
            Ok(capture) => {
                let blob = capture.finalize();
                debug!(%request_id, bytes = blob.len(), mime = %blob.mime_type,
                       "uploading recording");
                self.set_status(StatusLine::Transcribing);

                let language = self.language().code();
                let outcome = self.gateway.send_audio(blob, language).await;
                self.microphone.lock().release();
                self.handle_transcribe_reply(request_id, outcome).await;
            }
            Err(e) => {
                error!(%request_id, error = %e, "stopping capture failed");
                self.microphone.lock().release();
                self.set_status(StatusLine::RequestError(e.detail().to_string()));
            }
        }

        self.set_state(InteractionState::Idle);
    }

    async fn handle_chat_reply(&self, request_id: Uuid, outcome: Result<ChatReply>) {
        match outcome {
            Ok(reply) => match reply.message() {
                Some(response) => {
                    let response = response.to_string();
                    self.render_ai_response(request_id, &response).await;
                    self.set_status(StatusLine::ResponseReceived);
                }
                None => {
                    error!(%request_id,
                           error = reply.error.as_deref().unwrap_or("no response in payload"),
                           "backend returned no response");
                    self.set_status(StatusLine::ResponseFailed);
                }
            },
            Err(e) => {
                error!(%request_id, error = %e, "chat request failed");
                self.set_status(StatusLine::RequestError(e.detail().to_string()));
            }
        }
    }

    async fn handle_transcribe_reply(&self, request_id: Uuid, outcome: Result<TranscribeReply>) {
        match outcome {
            Ok(reply) => match reply.transcription() {
                Some(text) => {
                    let text = text.to_string();
                    info!(%request_id, chars = text.len(), "transcription received");
                    self.append_entry(Role::User, &text);
                    self.set_status(StatusLine::TranscriptionComplete);

                    if let Some(response) = reply.ai_response.as_deref() {
                        let response = response.to_string();
                        self.stagger().await;
                        self.render_ai_response(request_id, &response).await;
                    }
                }
                None => {
                    error!(%request_id,
                           error = reply.error.as_deref().unwrap_or("empty transcription"),
                           "transcription failed");
                    self.set_status(StatusLine::TranscriptionFailed);
                }
            },
            Err(e) => {
                error!(%request_id, error = %e, "audio upload failed");
                self.set_status(StatusLine::RequestError(e.detail().to_string()));
            }
        }
    }

    /// Decompose a response and append its entries, staggering the tool
    /// output after the primary message.
    async fn render_ai_response(&self, request_id: Uuid, response: &str) {
        let reply = decompose_reply(response);
        debug!(%request_id, tool_output = reply.has_tool_output(), "rendering response");

        self.append_entry(Role::Assistant, &reply.primary);
        for block in &reply.tool_outputs {
            self.stagger().await;
            self.append_entry(Role::ToolOutput, block);
        }
    }

    /// Move `Idle -> Processing` for one network interaction.
    ///
    /// Returns false and logs the drop when the session is busy; actions
    /// are never queued.
    fn try_begin_processing(&self, action: &'static str) -> bool {
        {
            let mut core = self.core.write();
            if !core.state.is_idle() {
                warn!(action, state = %core.state, "action dropped: session is busy");
                return false;
            }
            core.state = InteractionState::Processing;
        }
        self.emit(SessionEvent::StateChanged(InteractionState::Processing));
        true
    }

    fn set_state(&self, state: InteractionState) {
        self.core.write().state = state;
        self.emit(SessionEvent::StateChanged(state));
    }

    fn set_status(&self, status: StatusLine) {
        self.core.write().status = status.clone();
        self.emit(SessionEvent::StatusChanged(status));
    }

    fn append_entry(&self, role: Role, text: &str) {
        let entry = self.core.write().log.append(role, text);
        self.emit(SessionEvent::EntryAppended(entry));
    }

    async fn stagger(&self) {
        if !self.config.stagger_delay.is_zero() {
            tokio::time::sleep(self.config.stagger_delay).await;
        }
    }

    /// Events are fire and forget; a dropped receiver never blocks the
    /// session.
    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}
