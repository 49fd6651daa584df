//! View models shared by the page templates.

use honors_core::{HonorsEditor, Notice, NoticeKind, ReadingCycle};

/// Header block describing the reading for a date.
#[derive(Debug, Clone)]
pub struct ReadingSummary {
    pub name: String,
    pub hebrew: Option<String>,
    pub hdate: Option<String>,
    pub summary: Option<String>,
    /// Which honor map supplied the roster, for the caption.
    pub cycle: &'static str,
    pub tri_year: Option<String>,
}

/// One option in an honor's member dropdown.
#[derive(Debug, Clone)]
pub struct MemberOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

/// One row of the honors table.
#[derive(Debug, Clone)]
pub struct HonorRow {
    pub key: String,
    pub label: String,
    pub range: String,
    pub options: Vec<MemberOption>,
    /// Display name of the assigned member, when there is one.
    pub assigned: Option<String>,
}

/// A toast as the templates see it.
#[derive(Debug, Clone)]
pub struct NoticeView {
    pub class: &'static str,
    pub text: String,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        let class = match notice.kind {
            NoticeKind::Success => "toast-success",
            NoticeKind::Error => "toast-error",
        };
        Self {
            class,
            text: notice.text.clone(),
        }
    }
}

fn cycle_caption(cycle: ReadingCycle) -> &'static str {
    match cycle {
        ReadingCycle::Triennial => "Triennial cycle",
        ReadingCycle::FullKriyah => "Full kriyah",
        ReadingCycle::Weekday => "Weekday reading",
        ReadingCycle::None => "No reading",
    }
}

/// Reading header for the editor's date, if the calendar returned one.
pub fn reading_summary(editor: &HonorsEditor) -> Option<ReadingSummary> {
    let item = editor.reading_item()?;
    Some(ReadingSummary {
        name: item.name.en.clone(),
        hebrew: item.name.he.clone(),
        hdate: item.hdate.clone(),
        summary: item.summary.clone(),
        cycle: cycle_caption(editor.cycle()),
        tri_year: item.tri_year.as_ref().map(|year| year.to_string()),
    })
}

/// Table rows for the editor's roster. An empty member list still yields
/// one row per honor, each offering only the open choice and any member
/// already assigned.
pub fn honor_rows(editor: &HonorsEditor) -> Vec<HonorRow> {
    editor
        .roster()
        .into_iter()
        .map(|slot| {
            let selected = editor.assignment(&slot.key);
            let mut options: Vec<MemberOption> = editor
                .members()
                .iter()
                .map(|member| MemberOption {
                    id: member.id,
                    name: member.display_name(),
                    selected: selected == Some(member.id),
                })
                .collect();
            let assigned = selected.map(|id| member_name(editor, id));
            // Keep an assignment the member list doesn't cover, or a form
            // save would clear it.
            if let (Some(id), Some(name)) = (selected, &assigned) {
                if !options.iter().any(|option| option.selected) {
                    options.push(MemberOption {
                        id,
                        name: name.clone(),
                        selected: true,
                    });
                }
            }
            HonorRow {
                range: slot.meta.range(),
                key: slot.key,
                label: slot.label,
                options,
                assigned,
            }
        })
        .collect()
}

/// Name for a member id, falling back to the id when the member is not in
/// the loaded list.
pub fn member_name(editor: &HonorsEditor, id: i64) -> String {
    editor
        .members()
        .iter()
        .find(|member| member.id == id)
        .map(|member| member.display_name())
        .unwrap_or_else(|| format!("Member #{}", id))
}
