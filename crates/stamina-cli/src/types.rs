use std::path::PathBuf;

use stamina_core::JobReport;

#[derive(Debug)]
pub struct BuildResult {
    pub job_file: PathBuf,
    pub output: PathBuf,
    pub reports: Vec<JobReport>,
    /// Nodes written to the graph, all jobs together.
    pub nodes: usize,
}

impl BuildResult {
    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(JobReport::is_failed)
    }
}
