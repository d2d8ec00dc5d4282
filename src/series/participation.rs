//! Groups assignment participation rows into a module → assignment table.

use tracing::warn;

use crate::contracts::ParticipationEntry;
use crate::series::types::{AssignmentParticipation, ModuleParticipation};

/// Counts `on_time`, `floating` and `late` submissions per assignment,
/// grouped by module. Modules and assignments keep first-seen order.
pub fn group_participations(entries: &[ParticipationEntry]) -> Vec<ModuleParticipation> {
    let mut modules: Vec<ModuleParticipation> = Vec::new();

    for entry in entries {
        let module_pos = match modules.iter().position(|m| m.module_id == entry.module_id) {
            Some(pos) => pos,
            None => {
                modules.push(ModuleParticipation {
                    module_id: entry.module_id.clone(),
                    module_name: entry.module_name.clone(),
                    assignments: Vec::new(),
                });
                modules.len() - 1
            }
        };
        let module = &mut modules[module_pos];

        let assignment_pos = match module
            .assignments
            .iter()
            .position(|a| a.id == entry.assignment_id)
        {
            Some(pos) => pos,
            None => {
                module.assignments.push(AssignmentParticipation {
                    id: entry.assignment_id.clone(),
                    title: entry.title.clone(),
                    ..Default::default()
                });
                module.assignments.len() - 1
            }
        };
        let assignment = &mut module.assignments[assignment_pos];

        match entry.status.to_lowercase().as_str() {
            "on_time" => assignment.on_time += 1,
            "floating" => assignment.floating += 1,
            "late" => assignment.late += 1,
            other => warn!(
                status = other,
                assignment_id = %entry.assignment_id,
                "Unknown participation status"
            ),
        }
    }

    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(module: &str, assignment: &str, status: &str) -> ParticipationEntry {
        ParticipationEntry {
            module_id: module.to_string(),
            module_name: format!("Module {module}"),
            assignment_id: assignment.to_string(),
            title: format!("Assignment {assignment}"),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_groups_and_counts() {
        let entries = vec![
            entry("1", "a", "On_Time"),
            entry("1", "a", "Late"),
            entry("2", "c", "Floating"),
            entry("1", "b", "on_time"),
            entry("1", "a", "LATE"),
        ];
        let modules = group_participations(&entries);

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].module_id, "1");
        assert_eq!(modules[0].assignments.len(), 2);

        let a = &modules[0].assignments[0];
        assert_eq!(a.id, "a");
        assert_eq!((a.on_time, a.floating, a.late), (1, 0, 2));
        assert_eq!(a.total(), 3);

        assert_eq!(modules[1].assignments[0].floating, 1);
    }

    #[test]
    fn test_unknown_status_is_not_counted() {
        let modules = group_participations(&[entry("1", "a", "excused")]);
        assert_eq!(modules[0].assignments[0].total(), 0);
    }
}
