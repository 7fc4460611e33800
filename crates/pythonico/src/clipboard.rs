//! System clipboard with an in-process fallback.
//!
//! When no system clipboard is reachable (headless sessions, SSH) copy/paste still works
//! within the running editor.

pub struct ClipboardBridge {
    system: Option<arboard::Clipboard>,
    local: String,
}

impl ClipboardBridge {
    /// Connect to the system clipboard, falling back to local storage.
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                tracing::warn!(%err, "system clipboard unavailable; using local clipboard");
                None
            }
        };
        Self {
            system,
            local: String::new(),
        }
    }

    /// A clipboard that never touches the system clipboard.
    #[cfg(test)]
    pub fn local() -> Self {
        Self {
            system: None,
            local: String::new(),
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.local = text.to_string();
        if let Some(system) = self.system.as_mut()
            && let Err(err) = system.set_text(text)
        {
            tracing::warn!(%err, "failed to write system clipboard");
        }
    }

    pub fn get_text(&mut self) -> String {
        match self.system.as_mut().map(|system| system.get_text()) {
            Some(Ok(text)) => text,
            Some(Err(err)) => {
                tracing::debug!(%err, "system clipboard read failed; using local copy");
                self.local.clone()
            }
            None => self.local.clone(),
        }
    }
}

impl std::fmt::Debug for ClipboardBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardBridge")
            .field("system", &self.system.is_some())
            .field("local_len", &self.local.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_round_trip() {
        let mut clipboard = ClipboardBridge::local();
        assert_eq!(clipboard.get_text(), "");
        clipboard.set_text("def f():\n    pass");
        assert_eq!(clipboard.get_text(), "def f():\n    pass");
    }
}
