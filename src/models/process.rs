/// Bookkeeping record for one executed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    pub pid: u32,
    pub command: String,
    pub args: Vec<String>,
    /// Milliseconds since the epoch.
    pub started_at: u64,
    /// `None` while the command is still running.
    pub exit_code: Option<i32>,
}

impl Process {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.exit_code.is_none()
    }
}
