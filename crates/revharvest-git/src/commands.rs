//! Argument vectors for the Git calls made during extraction.

/// Default git executable, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "git";

/// Default number of context lines requested per diff, large enough to show whole files.
pub const DEFAULT_CONTEXT_LINES: u32 = 100_000;

/// Ends option parsing so the following argument is always a revision.
const END_OF_OPTIONS: &str = "--end-of-options";

/// Builds the Git command lines used by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommands {
    program: String,
    context_lines: u32,
}

impl GitCommands {
    /// Creates commands for the given git executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    /// Sets the number of context lines requested for diffs.
    #[must_use]
    pub fn with_context_lines(mut self, context_lines: u32) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// Returns the git executable.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the number of context lines requested for diffs.
    pub fn context_lines(&self) -> u32 {
        self.context_lines
    }

    /// `git --version`
    pub fn version(&self) -> Vec<String> {
        self.build(&["--version"])
    }

    /// `git log --pretty=format:%h`
    pub fn list_commits(&self) -> Vec<String> {
        self.build(&["log", "--pretty=format:%h"])
    }

    /// `git show -s --format=%ci --end-of-options <id>`
    ///
    /// Identifiers come from user-supplied lists; `--end-of-options` keeps one
    /// starting with `-` from being read as an option.
    pub fn committer_date(&self, id: &str) -> Vec<String> {
        self.build(&["show", "-s", "--format=%ci", END_OF_OPTIONS, id])
    }

    /// `git show -U<n> --no-renames --end-of-options <id>`
    ///
    /// Renames are disabled so that every touched file shows up as its own
    /// `diff --git` section.
    pub fn commit_changes(&self, id: &str) -> Vec<String> {
        let context = format!("-U{}", self.context_lines);
        self.build(&["show", &context, "--no-renames", END_OF_OPTIONS, id])
    }

    fn build(&self, args: &[&str]) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(args.iter().map(|arg| (*arg).to_string()))
            .collect()
    }
}

impl Default for GitCommands {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}
