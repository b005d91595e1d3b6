use std::marker::PhantomData;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use anyhow::Context;

use crate::foundation::error::{RecolorError, RecolorResult};
use crate::render::gpu::context::GpuContext;

type Job<S> = Box<dyn FnOnce(&GpuContext, &mut S) + Send>;

/// A dedicated thread owning one [`GpuContext`] and some per-node state `S`.
///
/// All GPU work for a node is marshalled onto this thread with [`GpuWorker::run`], so the device
/// and every object created from it are only ever touched from one place. `S` never leaves the
/// worker thread and is dropped there before the context.
pub struct GpuWorker<S> {
    tx: Option<mpsc::Sender<Job<S>>>,
    handle: Option<JoinHandle<()>>,
    adapter: String,
    _state: PhantomData<fn() -> S>,
}

impl<S: 'static> GpuWorker<S> {
    /// Start the worker thread, open a context on it, then build the state with `init`.
    ///
    /// Blocks until both succeed or one fails; a failure is returned here and the thread exits.
    pub fn spawn<I>(name: &str, init: I) -> RecolorResult<Self>
    where
        I: FnOnce(&GpuContext) -> RecolorResult<S> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job<S>>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<RecolorResult<String>>(1);

        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                let ctx = match GpuContext::new() {
                    Ok(ctx) => ctx,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let mut state = match init(&ctx) {
                    Ok(state) => state,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(ctx.adapter_name().to_owned()));

                while let Ok(job) = rx.recv() {
                    job(&ctx, &mut state);
                }
                drop(state);
                tracing::debug!("gpu worker exiting");
            })
            .with_context(|| format!("spawn gpu worker thread {name:?}"))?;

        let ready = ready_rx
            .recv()
            .map_err(|_| RecolorError::gpu("gpu worker exited during startup"));
        match ready.and_then(|r| r) {
            Ok(adapter) => Ok(Self {
                tx: Some(tx),
                handle: Some(handle),
                adapter,
                _state: PhantomData,
            }),
            Err(e) => {
                let _ = handle.join();
                Err(e)
            }
        }
    }

    /// Run `f` on the worker thread and wait for its result.
    pub fn run<R, F>(&self, f: F) -> RecolorResult<R>
    where
        F: FnOnce(&GpuContext, &mut S) -> RecolorResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| RecolorError::gpu("gpu worker has shut down"))?;
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        tx.send(Box::new(move |ctx, state| {
            let _ = reply_tx.send(f(ctx, state));
        }))
        .map_err(|_| RecolorError::gpu("gpu worker thread is gone"))?;
        reply_rx
            .recv()
            .map_err(|_| RecolorError::gpu("gpu worker dropped the job (thread panicked?)"))?
    }

    /// Name of the adapter the context was opened on.
    pub fn adapter_name(&self) -> &str {
        &self.adapter
    }

    /// Whether [`GpuWorker::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.tx.is_none()
    }

    /// Stop accepting jobs and join the thread. Idempotent.
    pub fn shutdown(&mut self) -> RecolorResult<()> {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| RecolorError::gpu("gpu worker thread panicked"))?;
        }
        Ok(())
    }
}

impl<S> Drop for GpuWorker<S> {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/render/gpu/worker.rs"]
mod tests;
