use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("burn-key search exhausted after {iterations} iterations at difficulty {difficulty}")]
    ExhaustedSearch { iterations: u64, difficulty: usize },
}
