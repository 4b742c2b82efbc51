use crossterm::event::KeyCode;

/// What a key press did to the widget, so the caller knows whether to clear
/// its search input or repaint the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key was not one of Up/Down/Enter, or the widget had nothing to act on.
    Ignored,
    /// Highlight cursor moved.
    Moved,
    /// Enter on a highlighted entry and the accept callback took it. The
    /// widget has hidden itself; the caller should clear the search input.
    Accepted(String),
    /// Enter on a highlighted entry but the accept callback refused it. The
    /// widget stays open with the cursor unchanged.
    Rejected,
}

/// Keyboard-navigable result list with a highlight cursor. All accept/reject
/// policy lives in the caller-supplied callback; the widget only tracks the
/// candidate list, the cursor, and visibility.
#[derive(Debug, Clone)]
pub struct Autocomplete {
    results: Option<Vec<String>>,
    cursor: isize,
    visible: bool,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new()
    }
}

impl Autocomplete {
    pub fn new() -> Self {
        Self {
            results: None,
            cursor: -1,
            visible: false,
        }
    }

    /// Replaces the result list (order preserved), resets the cursor, and
    /// shows the widget. An empty candidate list is allowed and still shows.
    pub fn populate(&mut self, candidates: Vec<String>) {
        self.results = Some(candidates);
        self.cursor = -1;
        self.visible = true;
    }

    /// Hides the widget and resets the cursor. Idempotent.
    pub fn hide(&mut self) {
        self.visible = false;
        self.cursor = -1;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// -1 while nothing is highlighted, otherwise an index into `results`.
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn results(&self) -> &[String] {
        self.results.as_deref().unwrap_or_default()
    }

    pub fn highlighted(&self) -> Option<&str> {
        let results = self.results.as_deref()?;
        usize::try_from(self.cursor)
            .ok()
            .and_then(|idx| results.get(idx))
            .map(String::as_str)
    }

    /// Reacts to Up/Down/Enter only. `try_add` receives the highlighted text
    /// on Enter and returns whether it was accepted; on acceptance the widget
    /// hides itself.
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        try_add: impl FnMut(&str) -> bool,
    ) -> KeyOutcome {
        let results_len = match &self.results {
            Some(results) if self.visible => results.len(),
            // Never populated or already hidden: reset and ignore.
            _ => {
                self.cursor = -1;
                return KeyOutcome::Ignored;
            }
        };

        match key {
            KeyCode::Up | KeyCode::Down => {
                if results_len == 0 {
                    self.cursor = -1;
                    return KeyOutcome::Ignored;
                }
                let offset = if key == KeyCode::Up { -1 } else { 1 };
                // Same clamp as moving a list highlight: no wraparound, and
                // either direction leaves -1 for the first entry.
                self.cursor = (self.cursor + offset).clamp(0, results_len as isize - 1);
                KeyOutcome::Moved
            }
            KeyCode::Enter => {
                let Some(entry) = self.highlighted().map(str::to_string) else {
                    return KeyOutcome::Ignored;
                };
                self.accept(entry, try_add)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Mouse selection of `text`: identical accept path to Enter.
    pub fn handle_click(
        &mut self,
        text: &str,
        try_add: impl FnMut(&str) -> bool,
    ) -> KeyOutcome {
        if !self.visible {
            return KeyOutcome::Ignored;
        }
        self.accept(text.to_string(), try_add)
    }

    fn accept(&mut self, entry: String, mut try_add: impl FnMut(&str) -> bool) -> KeyOutcome {
        if try_add(&entry) {
            self.hide();
            KeyOutcome::Accepted(entry)
        } else {
            KeyOutcome::Rejected
        }
    }
}
