//! Drives one controller through a parsed script and records what the host
//! would have seen.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::bridge::HostCallbacks;
use crate::config::ComponentArgs;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::editor::{Editor, EditorError};
use crate::host::{HostElement, ToolbarMount};
use crate::lifecycle::EditorLifecycleController;
use crate::script::{Command, ScriptLine};

type Transcript = Arc<Mutex<Vec<String>>>;

/// Records construction failures as transcript lines and logs them.
struct TranscriptSink {
    transcript: Transcript,
}

impl DiagnosticSink for TranscriptSink {
    fn construction_failed(&self, editor: &str, error: &EditorError) {
        TracingSink.construction_failed(editor, error);
        self.transcript.lock().push(format!("error {editor}: {error}"));
    }
}

pub struct Session {
    controller: EditorLifecycleController,
    element: HostElement,
    toolbar: ToolbarMount,
    construction: Option<JoinHandle<()>>,
    transcript: Transcript,
}

impl Session {
    pub fn new(args: ComponentArgs) -> Self {
        let transcript = Transcript::default();
        let callbacks = transcript_callbacks(&transcript);
        let sink = Arc::new(TranscriptSink {
            transcript: Arc::clone(&transcript),
        });
        Self {
            controller: EditorLifecycleController::with_diagnostics(args, callbacks, sink),
            element: HostElement::new("editor"),
            toolbar: ToolbarMount::new("toolbar"),
            construction: None,
            transcript,
        }
    }

    pub const fn controller(&self) -> &EditorLifecycleController {
        &self.controller
    }

    pub async fn run(&mut self, script: &[ScriptLine]) {
        for line in script {
            self.apply(line).await;
        }
    }

    async fn apply(&mut self, line: &ScriptLine) {
        debug!(line = line.line, command = ?line.command, "session command");
        match &line.command {
            Command::Mount => {
                self.construction = self.controller.mount(self.element.clone());
            }
            Command::Unmount => self.controller.unmount(),
            Command::Toolbar => self.controller.set_toolbar_mount(self.toolbar.clone()),
            Command::Disable => {
                self.settle().await;
                self.controller.set_disabled(true);
            }
            Command::Enable => {
                self.settle().await;
                self.controller.set_disabled(false);
            }
            Command::Value(value) => {
                self.settle().await;
                self.controller.set_value(value);
            }
            Command::Wait(duration) => tokio::time::sleep(*duration).await,
            command => {
                self.settle().await;
                let Some(editor) = self.controller.editor() else {
                    self.note(line.line, "editor not ready");
                    return;
                };
                self.apply_to_editor(line.line, command, editor.as_ref());
            }
        }
    }

    fn apply_to_editor(&self, line: usize, command: &Command, editor: &dyn Editor) {
        match command {
            Command::Type(text) => {
                if editor.is_read_only() {
                    self.note(line, "editor is read-only");
                    return;
                }
                editor.set_data(&append_text(&editor.get_data(), text));
            }
            Command::Set(markup) => {
                if editor.is_read_only() {
                    self.note(line, "editor is read-only");
                    return;
                }
                editor.set_data(markup);
            }
            Command::Focus => editor.focus_tracker().set_focused(true),
            Command::Blur => editor.focus_tracker().set_focused(false),
            Command::Upload { file, response } => match editor.plugins().file_repository() {
                Some(repository) => repository
                    .create_loader(file.as_str())
                    .set_upload_response(response.clone()),
                None => self.note(line, "no upload plugin loaded"),
            },
            _ => {}
        }
    }

    /// Wait for an in-flight construction to finish.
    async fn settle(&mut self) {
        if let Some(handle) = self.construction.take()
            && let Err(err) = handle.await
        {
            warn!(%err, "construction task did not complete");
        }
    }

    fn note(&self, line: usize, reason: &str) {
        warn!(line, reason, "command skipped");
        self.transcript.lock().push(format!("skip line {line}: {reason}"));
    }

    /// Settle outstanding work and return the transcript, ending with the
    /// lifecycle state and toolbar placement.
    pub async fn finish(mut self) -> Vec<String> {
        self.settle().await;
        let state = self.controller.state();
        let mut transcript = self.transcript.lock().clone();
        transcript.push(format!("state {state}"));
        transcript.push(format!("toolbar {}", self.toolbar.child_count()));
        transcript
    }
}

fn transcript_callbacks(transcript: &Transcript) -> HostCallbacks {
    let ready = Arc::clone(transcript);
    let input = Arc::clone(transcript);
    let focus = Arc::clone(transcript);
    let blur = Arc::clone(transcript);
    let upload = Arc::clone(transcript);
    HostCallbacks::new()
        .on_ready(move |_| ready.lock().push("ready".to_string()))
        .on_input(move |data| input.lock().push(format!("input {data}")))
        .on_focus(move || focus.lock().push("focus".to_string()))
        .on_blur(move || blur.lock().push("blur".to_string()))
        .on_upload(move |response| upload.lock().push(format!("upload {response}")))
}

/// Append typed text to the last paragraph, or start one.
fn append_text(data: &str, text: &str) -> String {
    match data.rfind("</p>") {
        Some(end) => format!("{}{text}{}", &data[..end], &data[end..]),
        None => format!("{data}<p>{text}</p>"),
    }
}
