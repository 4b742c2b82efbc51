use std::collections::VecDeque;
use std::path::Path;

use crossterm::event::KeyCode;

use crate::autocomplete::{Autocomplete, KeyOutcome};
use crate::chart::{ChartSpec, build_chart};
use crate::dataset::Dataset;
use crate::export::{ExportedChart, export_chart_png};
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Picker,
    Charts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerFocus {
    Search,
    Browse,
    Roster,
}

/// Messages from the dataset loader thread.
pub enum Delta {
    Dataset(Dataset),
    Log(String),
}

/// All session state. Created empty at startup; the dataset arrives once via
/// `apply_delta` and is never mutated after.
pub struct AppState {
    pub screen: Screen,
    pub focus: PickerFocus,
    pub dataset: Option<Dataset>,
    pub roster: Roster,
    pub autocomplete: Autocomplete,
    pub search: String,
    pub browse_selected: usize,
    pub roster_selected: usize,
    pub charts: Vec<ChartSpec>,
    pub chart_tab: usize,
    pub exports: Vec<ExportedChart>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Picker,
            focus: PickerFocus::Search,
            dataset: None,
            roster: Roster::new(),
            autocomplete: Autocomplete::new(),
            search: String::new(),
            browse_selected: 0,
            roster_selected: 0,
            charts: Vec::new(),
            chart_tab: 0,
            exports: Vec::new(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// The picker is inert until the dataset has arrived.
    pub fn dataset_ready(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            PickerFocus::Search => PickerFocus::Browse,
            PickerFocus::Browse => PickerFocus::Roster,
            PickerFocus::Roster => PickerFocus::Search,
        };
    }

    /// Accept policy for a candidate name: it must exist in the dataset and
    /// not already be chosen. This is the single place additions happen.
    fn try_add(dataset: Option<&Dataset>, roster: &mut Roster, name: &str) -> bool {
        dataset.is_some_and(|d| d.contains(name)) && roster.add(name)
    }

    /// Routes a key press to the autocomplete; on acceptance the search input
    /// is cleared (the widget has already hidden itself).
    pub fn autocomplete_key(&mut self, key: KeyCode) -> KeyOutcome {
        let mut widget = std::mem::take(&mut self.autocomplete);
        let dataset = self.dataset.as_ref();
        let roster = &mut self.roster;
        let outcome = widget.handle_key(key, |name| Self::try_add(dataset, roster, name));
        self.autocomplete = widget;
        self.after_accept(&outcome);
        outcome
    }

    /// Mouse selection in the dropdown, same accept path as Enter.
    pub fn autocomplete_click(&mut self, text: &str) -> KeyOutcome {
        let mut widget = std::mem::take(&mut self.autocomplete);
        let dataset = self.dataset.as_ref();
        let roster = &mut self.roster;
        let outcome = widget.handle_click(text, |name| Self::try_add(dataset, roster, name));
        self.autocomplete = widget;
        self.after_accept(&outcome);
        outcome
    }

    fn after_accept(&mut self, outcome: &KeyOutcome) {
        if let KeyOutcome::Accepted(name) = outcome {
            self.search.clear();
            let line = format!("[INFO] Added {name}");
            self.push_log(line);
        }
    }

    pub fn search_push(&mut self, c: char) {
        if !self.dataset_ready() {
            return;
        }
        self.search.push(c);
        self.refresh_autocomplete();
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.refresh_autocomplete();
    }

    /// Repopulates the dropdown from the current query; an empty query hides
    /// it rather than listing everyone.
    fn refresh_autocomplete(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        if self.search.trim().is_empty() {
            self.autocomplete.hide();
        } else {
            self.autocomplete
                .populate(dataset.matching_names(&self.search));
        }
    }

    /// Adds the highlighted entry of the browse list, the "native selection
    /// control" path next to the autocomplete.
    pub fn add_browse_selection(&mut self) {
        let Some(name) = self
            .dataset
            .as_ref()
            .and_then(|d| d.names().get(self.browse_selected))
            .cloned()
        else {
            return;
        };
        if Self::try_add(self.dataset.as_ref(), &mut self.roster, &name) {
            self.push_log(format!("[INFO] Added {name}"));
        }
    }

    pub fn browse_len(&self) -> usize {
        self.dataset.as_ref().map_or(0, |d| d.names().len())
    }

    pub fn select_next(&mut self) {
        match self.focus {
            PickerFocus::Browse => {
                let len = self.browse_len();
                if len > 0 {
                    self.browse_selected = (self.browse_selected + 1).min(len - 1);
                }
            }
            PickerFocus::Roster => {
                let len = self.roster.len();
                if len > 0 {
                    self.roster_selected = (self.roster_selected + 1).min(len - 1);
                }
            }
            PickerFocus::Search => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            PickerFocus::Browse => self.browse_selected = self.browse_selected.saturating_sub(1),
            PickerFocus::Roster => self.roster_selected = self.roster_selected.saturating_sub(1),
            PickerFocus::Search => {}
        }
    }

    /// Removes the highlighted roster entry.
    pub fn remove_selected(&mut self) {
        let Some(name) = self.roster.selected().get(self.roster_selected).cloned() else {
            return;
        };
        self.roster.remove(&name);
        self.roster_selected = self
            .roster_selected
            .min(self.roster.len().saturating_sub(1));
        self.push_log(format!("[INFO] Removed {name}"));
    }

    pub fn remove_all(&mut self) {
        if self.roster.is_empty() {
            return;
        }
        self.roster.clear();
        self.roster_selected = 0;
        self.push_log("[INFO] Removed all players");
    }

    /// Rebuilds every chart for the current roster. Replaces any previous
    /// charts wholesale, so redrawing never accumulates. Returns whether
    /// anything was built; an empty roster is a logged no-op.
    pub fn render_charts(&mut self) -> bool {
        let Some(dataset) = &self.dataset else {
            self.push_log("[WARN] Dataset not loaded yet");
            return false;
        };
        if self.roster.is_empty() {
            self.push_log("[INFO] No players chosen");
            return false;
        }
        self.charts = dataset
            .metrics()
            .iter()
            .filter_map(|metric| build_chart(*metric, dataset, self.roster.selected()))
            .collect();
        self.chart_tab = 0;
        self.exports.clear();
        let line = format!(
            "[INFO] Built {} charts for {} players",
            self.charts.len(),
            self.roster.len()
        );
        self.push_log(line);
        !self.charts.is_empty()
    }

    pub fn current_chart(&self) -> Option<&ChartSpec> {
        self.charts.get(self.chart_tab)
    }

    pub fn next_chart_tab(&mut self) {
        if !self.charts.is_empty() {
            self.chart_tab = (self.chart_tab + 1) % self.charts.len();
        }
    }

    pub fn prev_chart_tab(&mut self) {
        if !self.charts.is_empty() {
            self.chart_tab = (self.chart_tab + self.charts.len() - 1) % self.charts.len();
        }
    }

    /// Writes one PNG per built chart and records the results for the UI.
    pub fn export_charts(&mut self, dir: &Path, stamp: &str) {
        if self.charts.is_empty() {
            self.push_log("[INFO] Nothing to export yet");
            return;
        }
        self.exports.clear();
        for spec in self.charts.clone() {
            match export_chart_png(&spec, dir, stamp) {
                Ok(exported) => {
                    let line = format!(
                        "[INFO] Exported {} ({}x{})",
                        exported.path.display(),
                        exported.width,
                        exported.height
                    );
                    self.push_log(line);
                    self.exports.push(exported);
                }
                Err(err) => {
                    self.push_log(format!("[ERROR] Export failed: {err:#}"));
                }
            }
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Dataset(dataset) => {
            state.browse_selected = 0;
            state.dataset = Some(dataset);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
