#![allow(dead_code)]
//! Fixture builders shared by the integration tests.

use chrono::{DateTime, TimeZone, Utc};
use lazybeads::data::{Issue, Snapshot, Status};
use std::collections::HashSet;

/// Timestamp `minutes` after a fixed epoch.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

pub fn issue(id: &str, status: Status) -> Issue {
    Issue::new(id, format!("Issue {}", id), status)
}

pub fn open(id: &str) -> Issue {
    issue(id, Status::Open)
}

pub fn in_progress(id: &str) -> Issue {
    issue(id, Status::InProgress)
}

pub fn closed(id: &str, closed_minutes: i64) -> Issue {
    let mut i = issue(id, Status::Closed);
    i.closed_at = Some(at(closed_minutes));
    i
}

pub fn with_priority(mut issue: Issue, priority: u8, updated_minutes: i64) -> Issue {
    issue.priority = priority;
    issue.updated_at = Some(at(updated_minutes));
    issue
}

pub fn blocked(mut issue: Issue, by: &str) -> Issue {
    issue.blocked_by.push(by.to_string());
    issue
}

pub fn snapshot(issues: Vec<Issue>, ready: &[&str]) -> Snapshot {
    let ready_ids: HashSet<String> = ready.iter().map(|s| s.to_string()).collect();
    Snapshot::new(issues, ready_ids)
}

pub fn ids<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    items.into_iter().map(str::to_string).collect()
}

/// A scriptable stand-in for the `bd` binary.
///
/// Every invocation appends its arguments to `calls.log`. A subcommand
/// prints `<sub>.json` when present and exits 1 when `<sub>.fail` exists.
pub struct FakeBd {
    dir: tempfile::TempDir,
}

impl FakeBd {
    #[cfg(unix)]
    pub fn new() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().display().to_string();
        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$*\" >> '{root}/calls.log'\n\
             if [ -f '{root}/'\"$1\"'.fail' ]; then cat '{root}/'\"$1\"'.fail' >&2; exit 1; fi\n\
             if [ \"$1\" = comments ] && [ \"$2\" = add ]; then exit 0; fi\n\
             if [ -f '{root}/'\"$1\"'.json' ]; then cat '{root}/'\"$1\"'.json'; fi\n"
        );
        let path = dir.path().join("bd");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir }
    }

    pub fn program(&self) -> String {
        self.dir.path().join("bd").display().to_string()
    }

    /// Canned stdout for `bd <subcommand> ...`.
    pub fn respond(&self, subcommand: &str, json: &str) {
        std::fs::write(self.dir.path().join(format!("{}.json", subcommand)), json).unwrap();
    }

    /// Make `bd <subcommand> ...` fail with `stderr`.
    pub fn fail(&self, subcommand: &str, stderr: &str) {
        std::fs::write(self.dir.path().join(format!("{}.fail", subcommand)), stderr).unwrap();
    }

    /// Argument lines of every invocation so far.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// A config whose `bd` is `fake` and which never polls on its own.
pub fn fake_config(fake: &FakeBd) -> lazybeads::config::Config {
    let mut config = lazybeads::config::Config::default();
    config.bd.program = fake.program();
    config.polling.interval_secs = 0;
    config
}
