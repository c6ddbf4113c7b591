//! Open/closed state machine for the tip dialog.
//!
//! The machine never touches the DOM. Each input yields the list of effects
//! the view has to apply, in order.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogPhase {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogInput {
    TriggerActivated,
    CloseActivated,
    EscapePressed,
    /// A pointer interaction whose composed path misses both trigger and dialog.
    PointerOutside,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogEffect {
    ShowDialog,
    HideDialog,
    SetExpanded(bool),
    FocusClose,
    FocusTrigger,
    PreventDefault,
    /// Start the QR draw for the given build.
    RenderQr { build: u64 },
}

/// Progress of the QR draw within one build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QrProgress {
    #[default]
    Idle,
    Pending,
    Rendered,
    Unconfigured,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rebuild {
    pub was_open: bool,
    pub build: u64,
}

#[derive(Clone, Debug, Default)]
pub struct DialogState {
    phase: DialogPhase,
    qr: QrProgress,
    build: u64,
}

impl DialogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == DialogPhase::Open
    }

    pub fn build(&self) -> u64 {
        self.build
    }

    pub fn qr_progress(&self) -> QrProgress {
        self.qr
    }

    pub fn qr_rendered(&self) -> bool {
        self.qr == QrProgress::Rendered
    }

    pub fn handle(&mut self, input: DialogInput) -> Vec<DialogEffect> {
        match (self.phase, input) {
            (DialogPhase::Closed, DialogInput::TriggerActivated) => self.open(),
            (DialogPhase::Open, DialogInput::TriggerActivated)
            | (DialogPhase::Open, DialogInput::CloseActivated)
            | (DialogPhase::Open, DialogInput::PointerOutside) => self.close(),
            (DialogPhase::Open, DialogInput::EscapePressed) => {
                let mut effects = vec![DialogEffect::PreventDefault];
                effects.extend(self.close());
                effects
            }
            (DialogPhase::Closed, _) => Vec::new(),
        }
    }

    pub fn open(&mut self) -> Vec<DialogEffect> {
        if self.is_open() {
            return Vec::new();
        }
        self.phase = DialogPhase::Open;
        let mut effects = vec![
            DialogEffect::ShowDialog,
            DialogEffect::SetExpanded(true),
            DialogEffect::FocusClose,
        ];
        if self.qr == QrProgress::Idle {
            self.qr = QrProgress::Pending;
            effects.push(DialogEffect::RenderQr { build: self.build });
        }
        effects
    }

    pub fn close(&mut self) -> Vec<DialogEffect> {
        if !self.is_open() {
            return Vec::new();
        }
        self.phase = DialogPhase::Closed;
        vec![
            DialogEffect::HideDialog,
            DialogEffect::SetExpanded(false),
            DialogEffect::FocusTrigger,
        ]
    }

    /// Called before the view is rebuilt. The fresh view starts closed with
    /// no QR, so the caller reopens when `was_open` is set.
    pub fn begin_rebuild(&mut self) -> Rebuild {
        let was_open = self.is_open();
        self.phase = DialogPhase::Closed;
        self.qr = QrProgress::Idle;
        self.build = self.build.wrapping_add(1);
        Rebuild {
            was_open,
            build: self.build,
        }
    }

    /// Records the result of a QR attempt. Returns `false` for a stale build,
    /// in which case the caller must leave the current view alone.
    pub fn finish_qr(&mut self, build: u64, outcome: QrProgress) -> bool {
        if build != self.build || self.qr != QrProgress::Pending {
            return false;
        }
        self.qr = outcome;
        true
    }
}
