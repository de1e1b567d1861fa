use thiserror::Error;

use uni_agent::AgentError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    World(#[from] AgentError),

    #[error("failed to start worker {rank}: {source}")]
    Spawn {
        rank:   usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create tick barrier: {0}")]
    Barrier(#[source] std::io::Error),

    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: usize },

    #[error("worker process {rank} exited abnormally (wait status {status})")]
    WorkerFailed { rank: usize, status: i32 },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("the simulation has already halted")]
    Halted,
}

pub type SimResult<T> = Result<T, SimError>;
