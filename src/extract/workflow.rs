//! Workflow steps from narrative sections
//!
//! Sections written for one actor that hold prose or lists rather than
//! field tables describe what that actor does, one paragraph per step.

use std::collections::HashSet;

use tracing::debug;

use crate::config::{ActionKeywords, ParserConfig};
use crate::document::parsing::list::strip_list_marker;
use crate::document::{ActionType, Section, WorkflowStep, Workflows};

/// Ordered steps per actor, concatenated across sections in document order.
///
/// `field_table_sections` holds the indices of sections carrying a field
/// definition table; those describe a form, not a process. Other tables in a
/// section do not stop its paragraphs from becoming steps.
pub fn extract_workflows(
    sections: &[Section],
    field_table_sections: &HashSet<usize>,
    config: &ParserConfig,
) -> Workflows {
    let mut workflows = Workflows::new();

    for (index, section) in sections.iter().enumerate() {
        if section.content.is_empty() {
            continue;
        }

        let Some(actor) = config
            .actors
            .match_actor(&section.heading)
            .or_else(|| config.actors.match_actor(&section.parent_path))
        else {
            continue;
        };

        if field_table_sections.contains(&index) {
            debug!(
                section = %section.heading,
                section_index = index,
                actor = %actor,
                "section holds a field table, not a workflow"
            );
            continue;
        }

        let steps = workflows.entry(actor).or_default();
        for paragraph in &section.content {
            let text = strip_list_marker(paragraph);
            if text.is_empty() {
                continue;
            }
            steps.push(WorkflowStep {
                actor,
                order: steps.len() as u32 + 1,
                text: text.to_string(),
                action_type: classify_action(text, &config.action_keywords),
            });
        }

        debug!(
            section = %section.heading,
            section_index = index,
            actor = %actor,
            steps = steps.len(),
            "narrative section"
        );
    }

    workflows
}

/// First action, in configured order, with a keyword starting a word of `text`
pub fn classify_action(text: &str, actions: &[ActionKeywords]) -> ActionType {
    let text = text.to_lowercase();
    actions
        .iter()
        .find(|entry| {
            entry
                .keywords
                .iter()
                .any(|keyword| starts_word(&text, &keyword.to_lowercase()))
        })
        .map(|entry| entry.action)
        .unwrap_or(ActionType::Other)
}

/// `keyword` occurs in `text` at a word start, so "approve" matches "approved"
/// but "create" does not match "recreate"
fn starts_word(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    text.match_indices(keyword).any(|(position, _)| {
        text[..position]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Actor, RawTable};

    fn narrative(heading: &str, parent_path: &str, content: &[&str]) -> Section {
        let mut section = Section::new(heading.to_string(), None, 2, parent_path.to_string());
        section.content = content.iter().map(|c| c.to_string()).collect();
        section
    }

    #[test]
    fn test_classify_action() {
        let actions = ParserConfig::default().action_keywords;
        assert_eq!(classify_action("Initiator logs in to the portal", &actions), ActionType::Login);
        assert_eq!(classify_action("Initiator creates a new request", &actions), ActionType::Create);
        assert_eq!(classify_action("System validates the PAN", &actions), ActionType::Validate);
        assert_eq!(classify_action("Approver approves or rejects", &actions), ActionType::Approve);
        assert_eq!(classify_action("An email is sent to the vendor", &actions), ActionType::Notify);
        assert_eq!(classify_action("Vendor submits the form", &actions), ActionType::Submit);
        assert_eq!(classify_action("The request is closed", &actions), ActionType::Other);
        // "recreate" does not start with the keyword
        assert_eq!(classify_action("Nothing to recreate", &actions), ActionType::Other);
        // Earlier action wins when several match
        assert_eq!(
            classify_action("After login, fill and submit the form", &actions),
            ActionType::Login
        );
    }

    #[test]
    fn test_steps_are_ordered_per_actor() {
        let mut with_table = narrative("Initiator Fields", "", &["Fill the form below"]);
        with_table.raw_tables.push(RawTable {
            headers: vec!["Field".to_string(), "Type".to_string()],
            rows: Vec::new(),
            section: 1,
            index: 0,
        });

        let sections = vec![
            narrative("Initiator Behaviour", "Process", &["1. Initiator logs in", "2. Creates a request"]),
            with_table,
            narrative("Approver Behaviour", "Process", &["• Approver reviews", "• Approves the request"]),
            narrative("Version History", "", &["Draft"]),
            narrative("Submission", "Initiator Behaviour", &["Submits the request"]),
        ];

        let field_table_sections = HashSet::from([1]);
        let workflows = extract_workflows(&sections, &field_table_sections, &ParserConfig::default());
        assert_eq!(workflows.len(), 2);

        let initiator = &workflows[&Actor::Initiator];
        let texts: Vec<&str> = initiator.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Initiator logs in", "Creates a request", "Submits the request"]);
        let orders: Vec<u32> = initiator.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(initiator[0].action_type, ActionType::Login);
        assert_eq!(initiator[2].action_type, ActionType::Submit);

        let approver = &workflows[&Actor::Approver];
        assert_eq!(approver.len(), 2);
        assert_eq!(approver[0].actor, Actor::Approver);
        assert_eq!(approver[1].action_type, ActionType::Approve);
    }

    #[test]
    fn test_non_field_table_keeps_narrative_steps() {
        let mut section = narrative(
            "Approver Behaviour",
            "",
            &["Approver reviews the request", "Approver approves the request"],
        );
        section.raw_tables.push(RawTable {
            headers: vec!["Level".to_string(), "Approver".to_string()],
            rows: vec![vec!["1".to_string(), "Finance Head".to_string()]],
            section: 0,
            index: 0,
        });

        let workflows = extract_workflows(&[section], &HashSet::new(), &ParserConfig::default());
        let approver = &workflows[&Actor::Approver];
        assert_eq!(approver.len(), 2);
        assert_eq!(approver[1].action_type, ActionType::Approve);
    }
}
