use std::fmt;

/// Progress flags reported by background refreshers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    FetchDone,
    IssuesFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub target: String,
    pub seconds: u64,
}

/// Title line above the search bar.
///
/// The status flags only ever move one way, so refreshers reporting in any
/// order converge on the same header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub fetching: bool,
    pub issues_failed: bool,
    pub countdown: Option<Countdown>,
}

impl Header {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fetching(mut self, fetching: bool) -> Self {
        self.fetching = fetching;
        self
    }

    pub fn apply(&mut self, change: StatusChange) {
        match change {
            StatusChange::FetchDone => self.fetching = false,
            StatusChange::IssuesFailed => self.issues_failed = true,
        }
    }

    /// Status suffixes in display order
    pub fn status(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if self.fetching {
            parts.push("(Fetching...)".to_string());
        }
        if self.issues_failed {
            parts.push("(GitHub issues failed)".to_string());
        }
        if let Some(countdown) = &self.countdown {
            parts.push(format!(
                "(auto-selecting {} in {}s...)",
                countdown.target, countdown.seconds
            ));
        }
        parts
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        for part in self.status() {
            write!(f, " {part}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title() {
        assert_eq!(Header::new("Pick").to_string(), "Pick");
    }

    #[test]
    fn status_changes_commute() {
        let mut a = Header::new("Pick").fetching(true);
        a.apply(StatusChange::IssuesFailed);
        a.apply(StatusChange::FetchDone);

        let mut b = Header::new("Pick").fetching(true);
        b.apply(StatusChange::FetchDone);
        b.apply(StatusChange::IssuesFailed);

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Pick (GitHub issues failed)");
    }

    #[test]
    fn countdown_suffix() {
        let mut header = Header::new("Pick").fetching(true);
        header.countdown = Some(Countdown {
            target: "main".into(),
            seconds: 3,
        });
        assert_eq!(
            header.to_string(),
            "Pick (Fetching...) (auto-selecting main in 3s...)"
        );
    }
}
