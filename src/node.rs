use crate::config::{BlendConfig, NodeConfig};
use crate::contract::{Residency, StreamContract};
use crate::foundation::core::{Packet, Timestamp};
use crate::foundation::error::{RecolorError, RecolorResult};
use crate::foundation::frame::ImageFrame;
use crate::render::executor::{BlendExecutor, FrameResource, create_executor};

/// Lifecycle of a [`RecolorNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// Created, not yet opened.
    Uninitialized,
    /// Opened; accepts frames.
    Ready,
    /// Closed; all further calls fail.
    Closed,
}

/// A recolor node: one image stream plus one mask stream in, one image stream out.
///
/// The executor is picked once in [`RecolorNode::open`] from the residency of the bound
/// streams; [`RecolorNode::process`] never branches on residency.
pub struct RecolorNode {
    state: NodeState,
    executor: Option<Box<dyn BlendExecutor>>,
    last_timestamp: Option<Timestamp>,
    emitted: u64,
}

impl Default for RecolorNode {
    fn default() -> Self {
        Self::new()
    }
}

impl RecolorNode {
    /// An unopened node.
    pub fn new() -> Self {
        Self {
            state: NodeState::Uninitialized,
            executor: None,
            last_timestamp: None,
            emitted: 0,
        }
    }

    /// Create and open a node in one step.
    pub fn from_config(config: &NodeConfig) -> RecolorResult<Self> {
        let mut node = Self::new();
        node.open(config)?;
        Ok(node)
    }

    /// Validate the stream contract and options, then create the matching executor.
    #[tracing::instrument(skip_all)]
    pub fn open(&mut self, config: &NodeConfig) -> RecolorResult<()> {
        self.ensure_state(NodeState::Uninitialized, "open")?;
        let contract = config.contract();
        let residency = contract.validate()?;
        let blend = BlendConfig::from_options(&config.options)?;
        let executor = create_executor(residency, &blend)?;
        self.open_with_executor(&contract, executor)
    }

    /// Open with a caller-provided executor. Its residency must match the contract's.
    pub fn open_with_executor(
        &mut self,
        contract: &StreamContract,
        executor: Box<dyn BlendExecutor>,
    ) -> RecolorResult<()> {
        self.ensure_state(NodeState::Uninitialized, "open")?;
        let residency = contract.validate()?;
        if executor.residency() != residency {
            return Err(RecolorError::configuration(format!(
                "streams are {residency} but the executor is {}",
                executor.residency()
            )));
        }
        tracing::debug!(%residency, "recolor node opened");
        self.executor = Some(executor);
        self.state = NodeState::Ready;
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Residency of the streams this node was opened with.
    pub fn residency(&self) -> Option<Residency> {
        self.executor.as_ref().map(|e| e.residency())
    }

    /// Number of output packets produced so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Consume one image and an optional mask at `timestamp`.
    ///
    /// Returns the recolored image at the same timestamp, or `None` when the mask is absent
    /// for this timestamp. Timestamps must strictly increase across calls, including calls
    /// that produce no output.
    #[tracing::instrument(skip(self, image, mask), fields(ts = %timestamp))]
    pub fn process(
        &mut self,
        timestamp: Timestamp,
        image: FrameResource,
        mask: Option<FrameResource>,
    ) -> RecolorResult<Option<Packet<FrameResource>>> {
        self.ensure_state(NodeState::Ready, "process")?;
        if let Some(last) = self.last_timestamp
            && timestamp <= last
        {
            return Err(RecolorError::contract(format!(
                "timestamp {timestamp} is not after previous timestamp {last}"
            )));
        }

        let executor = self.ready_executor("process")?;
        let expected = executor.residency();
        check_residency(&image, expected, "image")?;
        if let Some(mask) = &mask {
            check_residency(mask, expected, "mask")?;
        }

        let out = executor.process(&image, mask.as_ref())?;
        self.last_timestamp = Some(timestamp);
        Ok(out.map(|frame| {
            self.emitted += 1;
            Packet::new(timestamp, frame)
        }))
    }

    /// Convert a host frame into this node's residency.
    pub fn import(&mut self, frame: ImageFrame) -> RecolorResult<FrameResource> {
        self.ready_executor("import")?.import(frame)
    }

    /// Bring a frame back to host memory.
    pub fn export(&mut self, frame: &FrameResource) -> RecolorResult<ImageFrame> {
        self.ready_executor("export")?.export(frame)
    }

    /// Release executor resources. Idempotent.
    #[tracing::instrument(skip_all)]
    pub fn close(&mut self) -> RecolorResult<()> {
        let executor = self.executor.take();
        self.state = NodeState::Closed;
        if let Some(mut executor) = executor {
            executor.shutdown()?;
            tracing::debug!(emitted = self.emitted, "recolor node closed");
        }
        Ok(())
    }

    fn ensure_state(&self, expected: NodeState, op: &str) -> RecolorResult<()> {
        if self.state != expected {
            return Err(RecolorError::contract(format!(
                "cannot {op} a node in state {:?}",
                self.state
            )));
        }
        Ok(())
    }

    fn ready_executor(
        &mut self,
        op: &str,
    ) -> RecolorResult<&mut (dyn BlendExecutor + 'static)> {
        self.ensure_state(NodeState::Ready, op)?;
        self.executor
            .as_deref_mut()
            .ok_or_else(|| RecolorError::contract(format!("cannot {op}: node has no executor")))
    }
}

fn check_residency(frame: &FrameResource, expected: Residency, what: &str) -> RecolorResult<()> {
    if frame.residency() != expected {
        return Err(RecolorError::contract(format!(
            "{what} frame is {} but the node expects {expected}",
            frame.residency()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/node.rs"]
mod tests;
