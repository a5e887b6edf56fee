use crate::issues::Issue;

/// How a picker invocation ended, decoded once from the highlighted row and
/// the key that resolved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Select(String),
    CreateBranch,
    Delete(String),
    OpenEditor(String),
    ChangeAgent,
    ToggleSkipPermissions,
    Issue { number: u64, title: String },
}

impl PickerOutcome {
    /// Outcome of pressing Enter on a row carrying `value`
    pub fn from_value(value: &str) -> Self {
        match Issue::from_value(value) {
            Some(issue) => Self::Issue {
                number: issue.number,
                title: issue.title,
            },
            None => Self::Select(value.to_owned()),
        }
    }

    /// Whether `value` is an ordinary branch row, as opposed to an issue row
    pub fn is_branch_value(value: &str) -> bool {
        Issue::from_value(value).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_branch_values() {
        assert_eq!(
            PickerOutcome::from_value("feature/x"),
            PickerOutcome::Select("feature/x".into())
        );
        assert!(PickerOutcome::is_branch_value("main"));
    }

    #[test]
    fn decodes_issue_values() {
        let issue = Issue {
            number: 42,
            title: "Fix: the thing".into(),
        };
        assert_eq!(
            PickerOutcome::from_value(&issue.value()),
            PickerOutcome::Issue {
                number: 42,
                title: "Fix: the thing".into()
            }
        );
        assert!(!PickerOutcome::is_branch_value(&issue.value()));
    }
}
