//! Commit extraction from Git repositories.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use revharvest_commit::{Commit, NO_DATE};
use revharvest_config::Config;
use revharvest_git::{GitCli, GitCommands, ProcessRunner, SystemProcessRunner};
use tracing::{debug, info, warn};

use crate::{CommitQueue, CoreError, CoreResult};

/// Matches the identifier in the first line of raw `git show` output.
static COMMIT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^commit (\S+)").expect("invalid regex"));

/// Outcome of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Number of identifiers the run attempted.
    pub requested: usize,

    /// Number of commits handed to the queue.
    pub extracted: usize,

    /// Identifiers skipped because git could not deliver their date or diff.
    pub skipped: Vec<String>,
}

impl ExtractionSummary {
    /// Returns true if no identifier was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} commits extracted",
            self.extracted, self.requested
        )?;
        if !self.skipped.is_empty() {
            write!(f, " ({} skipped)", self.skipped.len())?;
        }
        Ok(())
    }
}

/// Extracts commits through the git command line and publishes them to a [`CommitQueue`].
pub struct CommitExtractor<R = SystemProcessRunner> {
    git: GitCli<R>,
    queue: Arc<CommitQueue>,
    put_timeout: Option<Duration>,
}

impl CommitExtractor<SystemProcessRunner> {
    /// Creates an extractor running the git executable named in the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Setup`] if git is not available.
    pub fn from_config(config: &Config, queue: Arc<CommitQueue>) -> CoreResult<Self> {
        let commands =
            GitCommands::new(&config.git.program).with_context_lines(config.git.context_lines);
        let extractor = Self::new(SystemProcessRunner, commands, queue)?;
        Ok(extractor.with_put_timeout(config.queue.put_timeout()))
    }
}

impl<R: ProcessRunner> CommitExtractor<R> {
    /// Creates an extractor after checking that git can be run.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Setup`] if the version probe fails.
    pub fn new(runner: R, commands: GitCommands, queue: Arc<CommitQueue>) -> CoreResult<Self> {
        let git = GitCli::new(runner, commands);
        let version = git.probe().map_err(CoreError::Setup)?;
        debug!(%version, "commit extractor created");
        Ok(Self {
            git,
            queue,
            put_timeout: None,
        })
    }

    /// Limits how long a full queue may block the extractor.
    ///
    /// `None`, the default, waits until the consumer makes room or closes the queue.
    #[must_use]
    pub fn with_put_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.put_timeout = timeout;
        self
    }

    /// Extracts every commit in the repository history.
    ///
    /// # Errors
    ///
    /// Fails if the commit identifiers cannot be listed, the log is empty, or
    /// a commit cannot be handed to the queue.
    pub fn extract_all(&self, repository: &Path) -> CoreResult<ExtractionSummary> {
        info!(?repository, "full extraction of all commits");
        let ids = self.git.commit_ids(repository)?;
        self.extract_ids(repository, &ids)
    }

    /// Extracts the given commits.
    ///
    /// Identifiers git cannot resolve are skipped; an empty list succeeds.
    ///
    /// # Errors
    ///
    /// Fails only if a commit cannot be handed to the queue.
    pub fn extract_selected<S: AsRef<str>>(
        &self,
        repository: &Path,
        ids: &[S],
    ) -> CoreResult<ExtractionSummary> {
        info!(?repository, count = ids.len(), "selective extraction");
        self.extract_ids(repository, ids)
    }

    /// Parses one commit from raw `git show` text without running git.
    ///
    /// The text must start with `commit <id>`. The commit gets [`NO_DATE`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedCommit`] if no identifier is found, or an
    /// error if the commit cannot be handed to the queue.
    pub fn extract_raw(&self, raw: &str) -> CoreResult<ExtractionSummary> {
        debug!("extraction of single commit text");
        let id = commit_id_from_text(raw).ok_or_else(|| {
            CoreError::MalformedCommit("text does not start with \"commit <id>\"".to_string())
        })?;

        self.publish(Commit::parse(id, NO_DATE, raw))?;
        Ok(ExtractionSummary {
            requested: 1,
            extracted: 1,
            skipped: Vec::new(),
        })
    }

    /// Returns the queue commits are published to.
    pub fn queue(&self) -> &Arc<CommitQueue> {
        &self.queue
    }

    fn extract_ids<S: AsRef<str>>(
        &self,
        repository: &Path,
        ids: &[S],
    ) -> CoreResult<ExtractionSummary> {
        let mut summary = ExtractionSummary {
            requested: ids.len(),
            ..ExtractionSummary::default()
        };

        for id in ids {
            let id = id.as_ref();
            debug!(%id, "extracting commit");

            let Some(date) = self.git.committer_date(repository, id) else {
                warn!(%id, "committer date not available, skipping commit");
                summary.skipped.push(id.to_string());
                continue;
            };
            let Some(text) = self.git.commit_text(repository, id) else {
                warn!(%id, "commit content not available, skipping commit");
                summary.skipped.push(id.to_string());
                continue;
            };

            self.publish(Commit::parse(id, date, &text))?;
            summary.extracted += 1;
        }

        info!(%summary, "extraction finished");
        Ok(summary)
    }

    fn publish(&self, commit: Commit) -> CoreResult<()> {
        let id = commit.id().to_string();
        debug!(%id, artifacts = commit.changed_artifacts().len(), "publishing commit");
        self.queue
            .put(commit, self.put_timeout)
            .map_err(|source| CoreError::Enqueue { id, source })
    }
}

/// Returns the identifier following `commit ` at the very start of `raw`.
fn commit_id_from_text(raw: &str) -> Option<&str> {
    COMMIT_ID_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueueState;
    use revharvest_git::ProcessOutput;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Answers known command lines from a table, fails everything else and
    /// records every call.
    #[derive(Default)]
    struct ScriptedRunner {
        responses: HashMap<String, ProcessOutput>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new() -> Self {
            Self::default().respond(
                &GitCommands::default().version(),
                ProcessOutput::success("git version 2.43.0\n"),
            )
        }

        fn respond(mut self, command: &[String], output: ProcessOutput) -> Self {
            self.responses.insert(command.join(" "), output);
            self
        }

        fn with_commit(self, id: &str, date: &str, text: &str) -> Self {
            let commands = GitCommands::default();
            self.respond(
                &commands.committer_date(id),
                ProcessOutput::success(format!("{date}\n")),
            )
            .respond(&commands.commit_changes(id), ProcessOutput::success(text))
        }

        fn with_log(self, ids: &[&str]) -> Self {
            self.respond(
                &GitCommands::default().list_commits(),
                ProcessOutput::success(ids.join("\n")),
            )
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, command: &[String], _working_dir: Option<&Path>) -> ProcessOutput {
            let line = command.join(" ");
            self.calls.lock().unwrap().push(line.clone());
            self.responses
                .get(&line)
                .cloned()
                .unwrap_or_else(|| ProcessOutput::failure("unknown revision"))
        }
    }

    fn repo() -> PathBuf {
        PathBuf::from("/tmp/repo")
    }

    fn open_queue(capacity: usize) -> Arc<CommitQueue> {
        let queue = Arc::new(CommitQueue::new(capacity).unwrap());
        queue.open().unwrap();
        queue
    }

    fn extractor(runner: ScriptedRunner, queue: &Arc<CommitQueue>) -> CommitExtractor<ScriptedRunner> {
        CommitExtractor::new(runner, GitCommands::default(), Arc::clone(queue)).unwrap()
    }

    fn drain_now(queue: &CommitQueue) -> Vec<Commit> {
        std::iter::from_fn(|| queue.get()).collect()
    }

    fn commit_text(id: &str, path: &str) -> String {
        format!(
            "commit {id}\nAuthor: Test User <test@example.com>\n\n    change {path}\n\n\
             diff --git a/{path} b/{path}\n\
             index 1111111..2222222 100644\n\
             --- a/{path}\n\
             +++ b/{path}\n\
             @@ -1 +1,2 @@\n\
             \x20existing\n\
             +added\n"
        )
    }

    #[test]
    fn test_setup_fails_without_git() {
        let queue = open_queue(1);
        let result = CommitExtractor::new(
            ScriptedRunner::default(),
            GitCommands::default(),
            Arc::clone(&queue),
        );
        assert!(matches!(result, Err(CoreError::Setup(_))));
    }

    #[test]
    fn test_extract_all() {
        let runner = ScriptedRunner::new()
            .with_log(&["bbb", "aaa"])
            .with_commit("bbb", "2024-03-02 10:00:00 +0000", &commit_text("bbb", "src/b.rs"))
            .with_commit("aaa", "2024-03-01 10:00:00 +0000", &commit_text("aaa", "src/a.rs"));
        let queue = open_queue(10);

        let summary = extractor(runner, &queue).extract_all(&repo()).unwrap();
        assert_eq!(summary.requested, 2);
        assert_eq!(summary.extracted, 2);
        assert!(summary.is_complete());

        let commits = drain_now(&queue);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].id(), "bbb");
        assert_eq!(commits[0].date(), "2024-03-02 10:00:00 +0000");
        assert_eq!(commits[0].changed_artifacts()[0].path(), "/src/b.rs");
        assert_eq!(commits[0].changed_artifacts()[0].content(), [" existing", "+added", ""]);
        assert_eq!(commits[1].id(), "aaa");
    }

    #[test]
    fn test_extract_all_empty_log_fails() {
        let runner = ScriptedRunner::new().with_log(&[]);
        let queue = open_queue(10);

        let result = extractor(runner, &queue).extract_all(&repo());
        assert!(matches!(
            result,
            Err(CoreError::Git(revharvest_git::GitError::EmptyLog))
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extract_all_listing_failure() {
        let queue = open_queue(10);
        let result = extractor(ScriptedRunner::new(), &queue).extract_all(&repo());
        assert!(matches!(
            result,
            Err(CoreError::Git(revharvest_git::GitError::ListingFailed(_)))
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extract_all_skips_unavailable_commits() {
        let commands = GitCommands::default();
        let runner = ScriptedRunner::new()
            .with_log(&["ccc", "bbb", "aaa"])
            .with_commit("ccc", "2024-03-03 10:00:00 +0000", &commit_text("ccc", "c.txt"))
            // date available, diff not
            .respond(
                &commands.committer_date("bbb"),
                ProcessOutput::success("2024-03-02 10:00:00 +0000\n"),
            )
            .with_commit("aaa", "2024-03-01 10:00:00 +0000", &commit_text("aaa", "a.txt"));
        let queue = open_queue(10);

        let summary = extractor(runner, &queue).extract_all(&repo()).unwrap();
        assert_eq!(summary.extracted, 2);
        assert_eq!(summary.skipped, ["bbb"]);
        assert_eq!(summary.to_string(), "2 of 3 commits extracted (1 skipped)");

        let ids: Vec<String> = drain_now(&queue).iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, ["ccc", "aaa"]);
    }

    #[test]
    fn test_missing_date_skips_diff_call() {
        let queue = open_queue(10);
        let extractor = extractor(ScriptedRunner::new(), &queue);

        let summary = extractor.extract_selected(&repo(), &["zzz"]).unwrap();
        assert_eq!(summary.skipped, ["zzz"]);

        let calls = runner_calls(&extractor);
        assert_eq!(calls.len(), 2);
        assert!(calls[1].contains("--format=%ci"));
    }

    #[test]
    fn test_extract_selected() {
        let runner = ScriptedRunner::new()
            .with_commit("a9c1b95", "2024-03-01 10:00:00 +0000", &commit_text("a9c1b95", "f1"))
            .with_commit("7d485f6", "2024-03-02 10:00:00 +0000", &commit_text("7d485f6", "f2"))
            .with_commit("b38ba5d", "2024-03-03 10:00:00 +0000", &commit_text("b38ba5d", "f3"));
        let queue = open_queue(10);

        let requested = vec![
            "a9c1b95".to_string(),
            "7d485f6".to_string(),
            "b38ba5d".to_string(),
        ];
        let summary = extractor(runner, &queue)
            .extract_selected(&repo(), requested.as_slice())
            .unwrap();
        assert_eq!(summary.extracted, 3);

        let mut ids: Vec<String> = drain_now(&queue).iter().map(|c| c.id().to_string()).collect();
        ids.sort();
        let mut expected = requested.clone();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_extract_selected_empty_list_succeeds() {
        let queue = open_queue(10);
        let summary = extractor(ScriptedRunner::new(), &queue)
            .extract_selected::<&str>(&repo(), &[])
            .unwrap();
        assert_eq!(summary, ExtractionSummary::default());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extract_selected_unknown_ids_succeeds() {
        let queue = open_queue(10);
        let summary = extractor(ScriptedRunner::new(), &queue)
            .extract_selected(&repo(), &["nope1", "nope2"])
            .unwrap();
        assert_eq!(summary.extracted, 0);
        assert_eq!(summary.skipped, ["nope1", "nope2"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extract_raw_merge_commit() {
        let raw = "commit abc123 Merge: 1111111 2222222\n\
                   Author: Test User <test@example.com>\n\
                   \n    Merge branch 'feature'\n";
        let queue = open_queue(1);
        let extractor = extractor(ScriptedRunner::new(), &queue);

        let summary = extractor.extract_raw(raw).unwrap();
        assert_eq!(summary.extracted, 1);

        let commit = queue.get().unwrap();
        assert_eq!(commit.id(), "abc123");
        assert_eq!(commit.date(), NO_DATE);
        assert!(commit.changed_artifacts().is_empty());
        assert_eq!(commit.header()[0], "commit abc123 Merge: 1111111 2222222");

        // only the version probe ran
        assert_eq!(runner_calls(&extractor).len(), 1);
    }

    #[test]
    fn test_extract_raw_with_artifacts() {
        let queue = open_queue(1);
        extractor(ScriptedRunner::new(), &queue)
            .extract_raw(&commit_text("87d1eb2f72a8", "drivers/media/Kconfig"))
            .unwrap();

        let commit = queue.get().unwrap();
        assert_eq!(commit.id(), "87d1eb2f72a8");
        let artifact = &commit.changed_artifacts()[0];
        assert_eq!(artifact.path(), "/drivers/media/Kconfig");
        assert_eq!(artifact.name(), "Kconfig");
    }

    #[test]
    fn test_extract_raw_malformed() {
        let queue = open_queue(1);
        let extractor = extractor(ScriptedRunner::new(), &queue);

        for raw in ["", "Author: nobody", "commit ", "commit  abc", " commit abc", "commit\nabc"] {
            let result = extractor.extract_raw(raw);
            assert!(
                matches!(result, Err(CoreError::MalformedCommit(_))),
                "expected failure for {raw:?}"
            );
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extract_raw_on_closed_queue() {
        let queue = open_queue(1);
        queue.close();

        let result = extractor(ScriptedRunner::new(), &queue).extract_raw("commit abc\n");
        match result {
            Err(CoreError::Enqueue { id, .. }) => assert_eq!(id, "abc"),
            other => panic!("Expected Enqueue error, got {other:?}"),
        }
        assert_eq!(queue.state(), QueueState::Closed);
    }

    #[test]
    fn test_put_timeout_stops_run() {
        let runner = ScriptedRunner::new()
            .with_log(&["bbb", "aaa"])
            .with_commit("bbb", "2024-03-02 10:00:00 +0000", &commit_text("bbb", "b"))
            .with_commit("aaa", "2024-03-01 10:00:00 +0000", &commit_text("aaa", "a"));
        let queue = open_queue(1);

        let result = extractor(runner, &queue)
            .with_put_timeout(Some(Duration::from_millis(20)))
            .extract_all(&repo());
        match result {
            Err(CoreError::Enqueue { id, source }) => {
                assert_eq!(id, "aaa");
                assert!(matches!(source, crate::PutError::TimedOut(_, _)));
            }
            other => panic!("Expected Enqueue error, got {other:?}"),
        }
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_commit_id_from_text() {
        assert_eq!(commit_id_from_text("commit abc"), Some("abc"));
        assert_eq!(commit_id_from_text("commit abc\nAuthor: x"), Some("abc"));
        assert_eq!(commit_id_from_text("commit abc\tfoo"), Some("abc"));
        assert_eq!(commit_id_from_text("commit abc123 Merge: 1 2"), Some("abc123"));
        assert_eq!(commit_id_from_text("commit "), None);
    }

    #[test]
    fn test_summary_display() {
        let summary = ExtractionSummary {
            requested: 4,
            extracted: 4,
            skipped: Vec::new(),
        };
        assert_eq!(summary.to_string(), "4 of 4 commits extracted");
    }

    fn runner_calls(extractor: &CommitExtractor<ScriptedRunner>) -> Vec<String> {
        extractor.git.runner().calls.lock().unwrap().clone()
    }
}
