//! Drives an [`HonorsEditor`] against an [`HonorsSource`].

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::assignment::{Assignment, MemberSummary};
use crate::cycle::ReadingCycleConfig;
use crate::date::DateRange;
use crate::editor::{EditorEvent, EditorStatus, HonorsEditor};
use crate::error::HonorsError;
use crate::reading::ReadingItem;
use crate::source::HonorsSource;

/// Results of the three per-date fetches.
struct DateLoad {
    readings: Result<Vec<ReadingItem>, String>,
    config: Result<ReadingCycleConfig, String>,
    assignments: Vec<Assignment>,
}

/// Performs the editor's I/O and feeds results back as events.
pub struct EditorController<S> {
    source: S,
    editor: HonorsEditor,
    member_limit: usize,
}

impl<S: HonorsSource> EditorController<S> {
    /// Create a controller for `date`. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(source: S, date: NaiveDate, member_limit: usize) -> Self {
        Self {
            source,
            editor: HonorsEditor::new(date),
            member_limit,
        }
    }

    /// Fetch the member list and the initial date, concurrently.
    pub async fn mount(&mut self) {
        let date = self.editor.date();
        self.editor.apply(EditorEvent::DateSelected(date));
        let generation = self.editor.generation();

        let (members, load) = tokio::join!(
            fetch_members(&self.source, self.member_limit),
            fetch_date(&self.source, date)
        );

        self.editor.apply(EditorEvent::MembersLoaded(members));
        self.apply_date_load(generation, load);
    }

    /// Switch to another date and reload readings, config and assignments.
    pub async fn select_date(&mut self, date: NaiveDate) {
        self.editor.apply(EditorEvent::DateSelected(date));
        let generation = self.editor.generation();
        let load = fetch_date(&self.source, date).await;
        self.apply_date_load(generation, load);
    }

    /// Pick a member for an honor. Local only.
    pub fn select_member(&mut self, honor: impl Into<String>, member_id: Option<i64>) {
        self.editor.apply(EditorEvent::MemberSelected {
            honor: honor.into(),
            member_id,
        });
    }

    /// Persist the full assignment set for the current date.
    ///
    /// On failure the editor moves to `Error` with the server's message and
    /// keeps local edits; nothing is retried.
    pub async fn save(&mut self) -> Result<(), HonorsError> {
        self.editor.apply(EditorEvent::SaveStarted);
        if self.editor.status() != &EditorStatus::Saving {
            return Err(HonorsError::Rejected(
                "Honors are still loading; try again shortly".to_string(),
            ));
        }

        let date = self.editor.date();
        let generation = self.editor.generation();
        let payload = self.editor.save_payload();
        info!(date = %date, honors = payload.len(), "Saving honors");

        let result = self.source.save_assignments(date, &payload).await;
        if let Err(err) = &result {
            warn!(date = %date, error = %err, "Saving honors failed");
        }

        self.editor.apply(EditorEvent::SaveFinished {
            generation,
            result: result.as_ref().map(|_| ()).map_err(|e| e.to_string()),
        });
        result
    }

    pub fn dismiss_notice(&mut self) {
        self.editor.apply(EditorEvent::NoticeDismissed);
    }

    pub fn editor(&self) -> &HonorsEditor {
        &self.editor
    }

    pub fn into_editor(self) -> HonorsEditor {
        self.editor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn apply_date_load(&mut self, generation: u64, load: DateLoad) {
        self.editor.apply(EditorEvent::ReadingsLoaded {
            generation,
            result: load.readings,
        });
        self.editor.apply(EditorEvent::ConfigLoaded {
            generation,
            result: load.config,
        });
        self.editor.apply(EditorEvent::AssignmentsLoaded {
            generation,
            assignments: load.assignments,
        });
    }
}

async fn fetch_members<S: HonorsSource>(
    source: &S,
    limit: usize,
) -> Result<Vec<MemberSummary>, String> {
    source.members(limit).await.map_err(|err| {
        warn!(error = %err, "Member search failed");
        err.to_string()
    })
}

async fn fetch_date<S: HonorsSource>(source: &S, date: NaiveDate) -> DateLoad {
    let (readings, config, assignments) = tokio::join!(
        source.readings(DateRange::single(date)),
        source.reading_cycle(),
        source.load_assignments(date)
    );

    let readings = readings.map_err(|err| {
        warn!(date = %date, error = %err, "Calendar fetch failed");
        err.to_string()
    });
    let config = config.map_err(|err| {
        warn!(error = %err, "Reading cycle fetch failed");
        err.to_string()
    });
    // Missing assignments just mean nothing has been saved yet.
    let assignments = assignments.unwrap_or_else(|err| {
        warn!(date = %date, error = %err, "Assignment load failed");
        Vec::new()
    });

    DateLoad {
        readings,
        config,
        assignments,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::reading::{HonorMap, HonorMeta};
    use crate::roster::MAFTIR_KEY;

    /// In-memory source with switchable failures.
    #[derive(Default)]
    struct MemorySource {
        items: Vec<ReadingItem>,
        triennial: bool,
        members: Vec<MemberSummary>,
        stored: Mutex<HashMap<NaiveDate, Vec<Assignment>>>,
        fail_calendar: bool,
        fail_members: bool,
        reject_saves: Option<String>,
    }

    #[async_trait]
    impl HonorsSource for MemorySource {
        async fn readings(&self, range: DateRange) -> Result<Vec<ReadingItem>, HonorsError> {
            if self.fail_calendar {
                return Err(HonorsError::unavailable("calendar", "HTTP 500"));
            }
            Ok(self
                .items
                .iter()
                .filter(|item| range.contains(item.date))
                .cloned()
                .collect())
        }

        async fn members(&self, limit: usize) -> Result<Vec<MemberSummary>, HonorsError> {
            if self.fail_members {
                return Err(HonorsError::unavailable("member search", "HTTP 500"));
            }
            Ok(self.members.iter().take(limit).cloned().collect())
        }

        async fn reading_cycle(&self) -> Result<ReadingCycleConfig, HonorsError> {
            Ok(ReadingCycleConfig {
                triennial: self.triennial,
            })
        }

        async fn load_assignments(&self, date: NaiveDate) -> Result<Vec<Assignment>, HonorsError> {
            Ok(self
                .stored
                .lock()
                .await
                .get(&date)
                .cloned()
                .unwrap_or_default())
        }

        async fn save_assignments(
            &self,
            date: NaiveDate,
            assignments: &[Assignment],
        ) -> Result<(), HonorsError> {
            if let Some(message) = &self.reject_saves {
                return Err(HonorsError::Rejected(message.clone()));
            }
            self.stored.lock().await.insert(date, assignments.to_vec());
            Ok(())
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()
    }

    fn reading() -> ReadingItem {
        let mut item = ReadingItem::new(day(), "Nasso");
        let full: HonorMap = ["1", "2", "3", "4", "5", "6", "7", "M"]
            .iter()
            .map(|k| (*k, HonorMeta::new("Numbers", "4:21", "4:37")))
            .collect();
        let tri: HonorMap = ["1", "2", "3", "M"]
            .iter()
            .map(|k| (*k, HonorMeta::new("Numbers", "5:11", "5:15")))
            .collect();
        item.fullkriyah = Some(full);
        item.triennial = Some(tri);
        item
    }

    fn source() -> MemorySource {
        MemorySource {
            items: vec![reading()],
            members: vec![MemberSummary {
                id: 5,
                first_name: "Sarah".to_string(),
                last_name: "Levi".to_string(),
                email: None,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_mount_loads_roster_and_members() {
        let mut controller = EditorController::new(source(), day(), 50);
        controller.mount().await;

        let editor = controller.editor();
        assert_eq!(editor.status(), &EditorStatus::Ready);
        assert_eq!(editor.roster().len(), 8);
        assert_eq!(editor.members().len(), 1);
    }

    #[tokio::test]
    async fn test_triennial_setting_changes_roster() {
        let mut source = source();
        source.triennial = true;
        let mut controller = EditorController::new(source, day(), 50);
        controller.mount().await;

        let keys: Vec<String> = controller
            .editor()
            .roster()
            .into_iter()
            .map(|slot| slot.key)
            .collect();
        assert_eq!(keys, vec!["1", "2", "3", "M"]);
    }

    #[tokio::test]
    async fn test_save_then_reload_round_trips() {
        let mut controller = EditorController::new(source(), day(), 50);
        controller.mount().await;
        controller.select_member("1", Some(5));
        controller.select_member(MAFTIR_KEY, None);
        controller.save().await.unwrap();

        controller.select_date(day()).await;
        let editor = controller.editor();
        assert_eq!(editor.assignment("1"), Some(5));
        assert_eq!(editor.assignment("M"), None);

        let stored = controller.source().stored.lock().await;
        let saved = stored.get(&day()).unwrap();
        assert_eq!(saved.len(), 8);
        assert!(saved.contains(&Assignment::new("1", Some(5))));
        assert!(saved.contains(&Assignment::new("M", None)));
    }

    #[tokio::test]
    async fn test_save_failure_surfaces_server_message() {
        let mut source = source();
        source.reject_saves = Some("Assignments for this date are locked".to_string());
        let mut controller = EditorController::new(source, day(), 50);
        controller.mount().await;
        controller.select_member("1", Some(5));

        let err = controller.save().await.unwrap_err();
        assert_eq!(err.to_string(), "Assignments for this date are locked");
        assert_eq!(
            controller.editor().status(),
            &EditorStatus::Error {
                message: "Assignments for this date are locked".to_string()
            }
        );
        assert_eq!(controller.editor().assignment("1"), Some(5));
    }

    #[tokio::test]
    async fn test_calendar_failure_gives_empty_roster() {
        let mut source = source();
        source.fail_calendar = true;
        let mut controller = EditorController::new(source, day(), 50);
        controller.mount().await;

        let editor = controller.editor();
        assert_eq!(editor.status(), &EditorStatus::Ready);
        assert!(editor.roster().is_empty());
        assert!(editor.readings().error.is_some());
    }

    #[tokio::test]
    async fn test_member_failure_keeps_page_usable() {
        let mut source = source();
        source.fail_members = true;
        let mut controller = EditorController::new(source, day(), 50);
        controller.mount().await;

        let editor = controller.editor();
        assert_eq!(editor.status(), &EditorStatus::Ready);
        assert!(editor.members().is_empty());
        assert_eq!(editor.roster().len(), 8);
    }

    #[tokio::test]
    async fn test_save_before_mount_is_refused() {
        let mut controller = EditorController::new(source(), day(), 50);
        assert!(controller.save().await.is_err());
        assert!(controller.source().stored.lock().await.is_empty());
    }
}
