use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::twitch::error::LoginResult;
use crate::twitch::oauth::popup::{
    PopupAccessError, PopupFeatures, PopupOpener, PopupWindow, ScreenGeometry,
};

/// What the scripted popup reports on one poll tick.
#[derive(Clone, Debug)]
pub enum PopupStep {
    CrossOrigin,
    Location(String),
    AccessError(String),
    Closed,
}

/// Observations shared between a scripted popup and the test.
#[derive(Default)]
pub struct PopupRecorder {
    ticks: AtomicUsize,
    closed: AtomicBool,
}

impl PopupRecorder {
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct ScriptedPopup {
    steps: Mutex<(VecDeque<PopupStep>, PopupStep)>,
    recorder: Arc<PopupRecorder>,
}

impl PopupWindow for ScriptedPopup {
    // Each poll tick starts with `is_closed`, so the script advances here.
    fn is_closed(&self) -> bool {
        self.recorder.ticks.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.steps.lock().unwrap();
        let (pending, current) = &mut *guard;
        if let Some(next) = pending.pop_front() {
            *current = next;
        }
        matches!(current, PopupStep::Closed)
    }

    fn location(&self) -> Result<String, PopupAccessError> {
        let guard = self.steps.lock().unwrap();
        match &guard.1 {
            PopupStep::Location(href) => Ok(href.clone()),
            PopupStep::AccessError(message) => Err(PopupAccessError::Other(message.clone())),
            PopupStep::CrossOrigin | PopupStep::Closed => Err(PopupAccessError::CrossOrigin(
                "Blocked a frame with origin \"http://localhost:4200\"".to_string(),
            )),
        }
    }

    fn close(&self) {
        self.recorder.closed.store(true, Ordering::SeqCst);
    }
}

/// Opener handing out one popup that replays `steps`, one per tick, repeating the last one.
pub struct ScriptedOpener {
    origin: String,
    script: Mutex<Option<VecDeque<PopupStep>>>,
    recorder: Arc<PopupRecorder>,
    opened: Mutex<Vec<(String, String, PopupFeatures)>>,
}

impl ScriptedOpener {
    pub fn new(origin: &str, steps: Vec<PopupStep>) -> Self {
        Self {
            origin: origin.to_string(),
            script: Mutex::new(Some(steps.into())),
            recorder: Arc::new(PopupRecorder::default()),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Opener whose `open` always fails as if a popup blocker intervened.
    pub fn blocked(origin: &str) -> Self {
        let opener = Self::new(origin, Vec::new());
        *opener.script.lock().unwrap() = None;
        opener
    }

    pub fn recorder(&self) -> Arc<PopupRecorder> {
        Arc::clone(&self.recorder)
    }

    /// `(url, name, features)` of every `open` call.
    pub fn opened(&self) -> Vec<(String, String, PopupFeatures)> {
        self.opened.lock().unwrap().clone()
    }
}

impl PopupOpener for ScriptedOpener {
    fn screen(&self) -> ScreenGeometry {
        ScreenGeometry {
            width: 1920,
            height: 1080,
        }
    }

    fn host_origin(&self) -> LoginResult<String> {
        Ok(self.origin.clone())
    }

    fn open(
        &self,
        url: &str,
        name: &str,
        features: &PopupFeatures,
    ) -> LoginResult<Option<Box<dyn PopupWindow>>> {
        self.opened
            .lock()
            .unwrap()
            .push((url.to_string(), name.to_string(), *features));
        let Some(steps) = self.script.lock().unwrap().take() else {
            return Ok(None);
        };
        Ok(Some(Box::new(ScriptedPopup {
            steps: Mutex::new((steps, PopupStep::CrossOrigin)),
            recorder: Arc::clone(&self.recorder),
        })))
    }
}
