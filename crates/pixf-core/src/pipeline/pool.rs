//! Bounded worker pool for concurrent encode + write.
//!
//! The task queue is filled and closed before any worker starts, so workers
//! exit once it drains. Every task yields exactly one result; the caller
//! collects all of them, keeping the first error, and joins every worker
//! before returning.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::config::PoolConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::DecodedImage;

use super::buffer::BufferPool;
use super::encode::Encoder;
use super::persist::Persister;

/// One unit of work: an image and the output index that names its file.
#[derive(Debug)]
pub struct EncodeTask {
    pub index: usize,
    pub image: DecodedImage,
}

/// Fixed-size pool of encode workers sharing one buffer pool.
pub struct EncodePool {
    workers: usize,
    buffers: BufferPool,
}

impl EncodePool {
    pub fn new(workers: usize, buffers: BufferPool) -> Self {
        Self {
            workers: workers.max(1),
            buffers,
        }
    }

    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.effective_workers(), BufferPool::from_config(config))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn buffers(&self) -> &BufferPool {
        &self.buffers
    }

    /// Encode every task with `encoder` and write it through `persister`.
    ///
    /// Returns the written paths ordered by output index, or the first error
    /// any worker reported. A failing task does not stop the others.
    pub async fn run(
        &self,
        tasks: Vec<EncodeTask>,
        encoder: Encoder,
        persister: &Persister,
    ) -> PipelineResult<Vec<PathBuf>> {
        let total = tasks.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        let worker_count = self.workers.min(total);
        tracing::debug!(
            "Encoding {} image(s) as {} with {} worker(s)",
            total,
            encoder.key(),
            worker_count
        );

        let (task_tx, task_rx) = mpsc::channel::<EncodeTask>(total);
        for task in tasks {
            task_tx
                .send(task)
                .await
                .map_err(|_| PipelineError::Worker("task queue closed early".into()))?;
        }
        drop(task_tx);
        let task_rx = Arc::new(Mutex::new(task_rx));

        let (result_tx, mut result_rx) = mpsc::channel::<PipelineResult<(usize, PathBuf)>>(total);
        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            let task_rx = Arc::clone(&task_rx);
            let result_tx = result_tx.clone();
            let buffers = self.buffers.clone();
            let persister = persister.clone();
            workers.spawn(async move {
                loop {
                    let next = task_rx.lock().await.recv().await;
                    let Some(task) = next else { break };
                    let index = task.index;

                    let buffers = buffers.clone();
                    let persister = persister.clone();
                    let outcome = tokio::task::spawn_blocking(move || {
                        encode_and_write(task, encoder, &buffers, &persister)
                    })
                    .await
                    .unwrap_or_else(|e| {
                        Err(PipelineError::Worker(format!("image #{}: {}", index + 1, e)))
                    });

                    if result_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
                tracing::trace!("Encode worker {} finished", worker_id);
            });
        }
        drop(result_tx);

        let mut first_err: Option<PipelineError> = None;
        let mut written = Vec::with_capacity(total);
        let mut received = 0;
        while received < total {
            let Some(outcome) = result_rx.recv().await else {
                break;
            };
            received += 1;
            match outcome {
                Ok(entry) => written.push(entry),
                Err(e) => {
                    tracing::error!("{}", e);
                    first_err.get_or_insert(e);
                }
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                first_err.get_or_insert(PipelineError::Worker(e.to_string()));
            }
        }

        if let Some(e) = first_err {
            return Err(e);
        }
        if received < total {
            return Err(PipelineError::Worker(format!(
                "pool stopped after {} of {} result(s)",
                received, total
            )));
        }

        written.sort_by_key(|(index, _)| *index);
        Ok(written.into_iter().map(|(_, path)| path).collect())
    }
}

/// Encode one image into a pooled buffer and write it out.
fn encode_and_write(
    task: EncodeTask,
    encoder: Encoder,
    buffers: &BufferPool,
    persister: &Persister,
) -> PipelineResult<(usize, PathBuf)> {
    let mut buf = buffers.checkout();
    encoder
        .encode(&task.image, &mut buf)
        .map_err(|e| PipelineError::Encode {
            index: task.index + 1,
            message: e.to_string(),
        })?;
    let path = persister.write(task.index, encoder.extension(), &buf)?;
    Ok((task.index, path))
}
