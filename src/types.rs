use std::fmt;

/// Which half of the action chain a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Build,
    Restart,
}

impl Stage {
    /// Progressive form used in log lines ("building...").
    pub fn verb(self) -> &'static str {
        match self {
            Stage::Build => "building",
            Stage::Restart => "restarting",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Build => f.write_str("build"),
            Stage::Restart => f.write_str("restart"),
        }
    }
}

/// How a shell command ended.
///
/// - `Success`: exited within the timeout with status zero.
/// - `NonZeroExit`: exited within the timeout with a failing status. Processes
///   killed by a signal, or that could not be spawned at all, report `-1`.
/// - `TimedOut`: still running when the timeout elapsed; the process was
///   killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    NonZeroExit(i32),
    TimedOut,
}

impl CommandOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, CommandOutcome::Success)
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Success => f.write_str("success"),
            CommandOutcome::NonZeroExit(code) => write!(f, "exit status {code}"),
            CommandOutcome::TimedOut => f.write_str("timed out"),
        }
    }
}
