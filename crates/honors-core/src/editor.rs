//! Assignment editor state.
//!
//! The editor is a reducer: every change arrives as an [`EditorEvent`] through
//! [`HonorsEditor::apply`], and views read the resulting state. I/O lives in
//! [`EditorController`](crate::EditorController).
//!
//! ```text
//! Idle { loading_readings, loading_members } -> Ready -> Saving -> Ready | Error
//! ```
//!
//! Selecting a new date always returns to `Idle`. Loads for the date carry
//! the generation that [`EditorEvent::DateSelected`] started; results from an
//! older generation are ignored.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::assignment::{Assignment, MemberSummary};
use crate::cycle::{select_cycle, select_honor_map, ReadingCycle, ReadingCycleConfig};
use crate::date::DateRange;
use crate::reading::{ReadingItem, ReadingsState};
use crate::roster::{build_roster, HonorSlot};

/// Text of the toast shown after a successful save.
pub const SAVED_NOTICE: &str = "Honors saved";

/// Where the editor is in its load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum EditorStatus {
    Idle {
        loading_readings: bool,
        loading_members: bool,
    },
    Ready,
    Saving,
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Everything that can change editor state.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// Switch to a date; starts a new load generation.
    DateSelected(NaiveDate),
    ReadingsLoaded {
        generation: u64,
        result: Result<Vec<ReadingItem>, String>,
    },
    ConfigLoaded {
        generation: u64,
        result: Result<ReadingCycleConfig, String>,
    },
    AssignmentsLoaded {
        generation: u64,
        assignments: Vec<Assignment>,
    },
    /// Member search finished. Not tied to a date.
    MembersLoaded(Result<Vec<MemberSummary>, String>),
    /// Local edit; nothing is persisted until a save.
    MemberSelected {
        honor: String,
        member_id: Option<i64>,
    },
    SaveStarted,
    SaveFinished {
        generation: u64,
        result: Result<(), String>,
    },
    NoticeDismissed,
}

/// Editor state for one date selection.
#[derive(Debug, Clone)]
pub struct HonorsEditor {
    date: NaiveDate,
    generation: u64,
    readings: ReadingsState,
    config: ReadingCycleConfig,
    config_loading: bool,
    config_error: Option<String>,
    members: Vec<MemberSummary>,
    members_loading: bool,
    members_error: Option<String>,
    assignments: IndexMap<String, Option<i64>>,
    saved: IndexMap<String, Option<i64>>,
    assignments_loading: bool,
    status: EditorStatus,
    notice: Option<Notice>,
}

impl HonorsEditor {
    /// A freshly mounted editor: members are pending, no date load started yet.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            generation: 0,
            readings: ReadingsState::new(),
            config: ReadingCycleConfig::default(),
            config_loading: false,
            config_error: None,
            members: Vec::new(),
            members_loading: true,
            members_error: None,
            assignments: IndexMap::new(),
            saved: IndexMap::new(),
            assignments_loading: false,
            status: EditorStatus::Idle {
                loading_readings: false,
                loading_members: true,
            },
            notice: None,
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::DateSelected(date) => {
                self.date = date;
                self.generation = self.readings.begin(DateRange::single(date));
                self.config_loading = true;
                self.config_error = None;
                self.assignments_loading = true;
                self.assignments.clear();
                self.saved.clear();
                self.notice = None;
                self.status = EditorStatus::Idle {
                    loading_readings: true,
                    loading_members: self.members_loading,
                };
            }
            EditorEvent::ReadingsLoaded { generation, result } => {
                if !self.readings.finish(generation, result) {
                    debug!(generation, "Ignoring superseded readings");
                    return;
                }
                self.refresh_status();
            }
            EditorEvent::ConfigLoaded { generation, result } => {
                if generation != self.generation {
                    return;
                }
                self.config_loading = false;
                match result {
                    Ok(config) => self.config = config,
                    Err(message) => {
                        self.config = ReadingCycleConfig::default();
                        self.config_error = Some(message);
                    }
                }
                self.refresh_status();
            }
            EditorEvent::AssignmentsLoaded {
                generation,
                assignments,
            } => {
                if generation != self.generation {
                    return;
                }
                self.assignments_loading = false;
                self.saved = assignments
                    .into_iter()
                    .map(|a| (a.honor, a.member_id))
                    .collect();
                self.assignments = self.saved.clone();
                self.refresh_status();
            }
            EditorEvent::MembersLoaded(result) => {
                self.members_loading = false;
                match result {
                    Ok(members) => {
                        self.members = members;
                        self.members_error = None;
                    }
                    Err(message) => self.members_error = Some(message),
                }
                self.refresh_status();
            }
            EditorEvent::MemberSelected { honor, member_id } => {
                if !self.is_editable() {
                    debug!(honor = %honor, "Ignoring edit while editor is busy");
                    return;
                }
                if !self.assignments.contains_key(&honor)
                    && !self.roster().iter().any(|slot| slot.key == honor)
                {
                    debug!(honor = %honor, "Ignoring edit for honor not on the roster");
                    return;
                }
                self.assignments.insert(honor, member_id);
            }
            EditorEvent::SaveStarted => {
                if self.is_editable() {
                    self.status = EditorStatus::Saving;
                    self.notice = None;
                }
            }
            EditorEvent::SaveFinished { generation, result } => {
                if generation != self.generation || self.status != EditorStatus::Saving {
                    return;
                }
                match result {
                    Ok(()) => {
                        self.saved = self.assignments.clone();
                        self.status = EditorStatus::Ready;
                        self.notice = Some(Notice {
                            kind: NoticeKind::Success,
                            text: SAVED_NOTICE.to_string(),
                        });
                    }
                    Err(message) => {
                        self.status = EditorStatus::Error {
                            message: message.clone(),
                        };
                        self.notice = Some(Notice {
                            kind: NoticeKind::Error,
                            text: message,
                        });
                    }
                }
            }
            EditorEvent::NoticeDismissed => self.notice = None,
        }
    }

    fn refresh_status(&mut self) {
        if !matches!(self.status, EditorStatus::Idle { .. }) {
            return;
        }
        let loading_readings =
            self.readings.loading || self.config_loading || self.assignments_loading;
        let loading_members = self.members_loading;
        self.status = if loading_readings || loading_members {
            EditorStatus::Idle {
                loading_readings,
                loading_members,
            }
        } else {
            EditorStatus::Ready
        };
    }

    fn is_editable(&self) -> bool {
        matches!(self.status, EditorStatus::Ready | EditorStatus::Error { .. })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Generation of the current date load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> &EditorStatus {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn readings(&self) -> &ReadingsState {
        &self.readings
    }

    pub fn config(&self) -> ReadingCycleConfig {
        self.config
    }

    pub fn config_error(&self) -> Option<&str> {
        self.config_error.as_deref()
    }

    pub fn members(&self) -> &[MemberSummary] {
        &self.members
    }

    pub fn members_error(&self) -> Option<&str> {
        self.members_error.as_deref()
    }

    /// The reading item for the selected date.
    pub fn reading_item(&self) -> Option<&ReadingItem> {
        self.readings.item_for(self.date)
    }

    /// Which honor map the roster comes from.
    pub fn cycle(&self) -> ReadingCycle {
        self.reading_item()
            .map(|item| select_cycle(item, self.config))
            .unwrap_or(ReadingCycle::None)
    }

    /// Assignable honors for the selected date.
    pub fn roster(&self) -> Vec<HonorSlot> {
        self.reading_item()
            .map(|item| build_roster(&select_honor_map(item, self.config)))
            .unwrap_or_default()
    }

    /// Locally selected member for an honor.
    pub fn assignment(&self, honor: &str) -> Option<i64> {
        self.assignments.get(honor).copied().flatten()
    }

    /// Local edits differ from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        let assigned = |map: &IndexMap<String, Option<i64>>| {
            let mut pairs: Vec<(String, i64)> = map
                .iter()
                .filter_map(|(k, v)| v.map(|id| (k.clone(), id)))
                .collect();
            pairs.sort();
            pairs
        };
        assigned(&self.assignments) != assigned(&self.saved)
    }

    /// The complete set to send on save.
    ///
    /// Every roster honor appears in roster order, `None` when open. Honors
    /// that were loaded but are not on the current roster follow, so a save
    /// never silently drops them.
    pub fn save_payload(&self) -> Vec<Assignment> {
        let roster = self.roster();
        let mut payload: Vec<Assignment> = roster
            .iter()
            .map(|slot| Assignment::new(slot.key.clone(), self.assignment(&slot.key)))
            .collect();
        for (honor, member_id) in &self.assignments {
            if !roster.iter().any(|slot| &slot.key == honor) {
                payload.push(Assignment::new(honor.clone(), *member_id));
            }
        }
        payload
    }
}
