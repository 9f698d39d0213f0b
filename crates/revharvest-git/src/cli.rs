//! Git command line wrapper.

use std::path::Path;

use tracing::debug;

use crate::{GitCommands, GitError, GitResult, ProcessRunner};

/// Retrieves commit data by running git through a [`ProcessRunner`].
pub struct GitCli<R> {
    runner: R,
    commands: GitCommands,
}

impl<R: ProcessRunner> GitCli<R> {
    /// Creates a wrapper without checking that git is available.
    pub fn new(runner: R, commands: GitCommands) -> Self {
        Self { runner, commands }
    }

    /// Runs the version probe and returns the reported version line.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Unavailable`] if the probe does not succeed.
    pub fn probe(&self) -> GitResult<String> {
        let output = self.runner.run(&self.commands.version(), None);
        if !output.success {
            return Err(GitError::Unavailable {
                program: self.commands.program().to_string(),
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        let version = output.stdout.trim().to_string();
        debug!(%version, "git available");
        Ok(version)
    }

    /// Lists the identifiers of all commits reachable in the repository.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ListingFailed`] if the log call fails and
    /// [`GitError::EmptyLog`] if it prints no identifiers.
    pub fn commit_ids(&self, repository: &Path) -> GitResult<Vec<String>> {
        debug!(?repository, "listing commit identifiers");
        let output = self
            .runner
            .run(&self.commands.list_commits(), Some(repository));
        if !output.success {
            return Err(GitError::ListingFailed(output.stderr.trim_end().to_string()));
        }

        let ids: Vec<String> = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if ids.is_empty() {
            return Err(GitError::EmptyLog);
        }
        Ok(ids)
    }

    /// Returns the committer date of one commit, or `None` if git failed.
    pub fn committer_date(&self, repository: &Path, id: &str) -> Option<String> {
        let output = self
            .runner
            .run(&self.commands.committer_date(id), Some(repository));
        output.success.then(|| output.stdout.trim().to_string())
    }

    /// Returns the full `git show` text of one commit, or `None` if git failed.
    pub fn commit_text(&self, repository: &Path, id: &str) -> Option<String> {
        let output = self
            .runner
            .run(&self.commands.commit_changes(id), Some(repository));
        output.success.then_some(output.stdout)
    }

    /// Returns the process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }
}
