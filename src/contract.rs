use crate::foundation::error::{RecolorError, RecolorResult};

/// Where a frame lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Residency {
    /// Host memory ([`crate::ImageFrame`]).
    Cpu,
    /// GPU texture memory.
    Gpu,
}

impl std::fmt::Display for Residency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Gpu => write!(f, "gpu"),
        }
    }
}

/// A named stream a recolor node can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StreamTag {
    /// Host image.
    #[serde(rename = "IMAGE")]
    Image,
    /// GPU image.
    #[serde(rename = "IMAGE_GPU")]
    ImageGpu,
    /// Host mask.
    #[serde(rename = "MASK")]
    Mask,
    /// GPU mask.
    #[serde(rename = "MASK_GPU")]
    MaskGpu,
}

impl StreamTag {
    /// Residency of frames carried on this stream.
    pub fn residency(self) -> Residency {
        match self {
            Self::Image | Self::Mask => Residency::Cpu,
            Self::ImageGpu | Self::MaskGpu => Residency::Gpu,
        }
    }

    fn is_image(self) -> bool {
        matches!(self, Self::Image | Self::ImageGpu)
    }

    fn is_mask(self) -> bool {
        matches!(self, Self::Mask | Self::MaskGpu)
    }
}

impl std::fmt::Display for StreamTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Image => "IMAGE",
            Self::ImageGpu => "IMAGE_GPU",
            Self::Mask => "MASK",
            Self::MaskGpu => "MASK_GPU",
        };
        f.write_str(s)
    }
}

/// The set of streams a node is bound to at setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamContract {
    inputs: Vec<StreamTag>,
    outputs: Vec<StreamTag>,
}

impl StreamContract {
    /// Bind input and output tags. Call [`StreamContract::validate`] before use.
    pub fn new(inputs: Vec<StreamTag>, outputs: Vec<StreamTag>) -> Self {
        Self { inputs, outputs }
    }

    /// `IMAGE` + `MASK` in, `IMAGE` out.
    pub fn cpu() -> Self {
        Self::new(vec![StreamTag::Image, StreamTag::Mask], vec![StreamTag::Image])
    }

    /// `IMAGE_GPU` + `MASK_GPU` in, `IMAGE_GPU` out.
    pub fn gpu() -> Self {
        Self::new(
            vec![StreamTag::ImageGpu, StreamTag::MaskGpu],
            vec![StreamTag::ImageGpu],
        )
    }

    /// Input tags.
    pub fn inputs(&self) -> &[StreamTag] {
        &self.inputs
    }

    /// Output tags.
    pub fn outputs(&self) -> &[StreamTag] {
        &self.outputs
    }

    /// Check the binding and return the residency every stream shares.
    ///
    /// Exactly one image tag on each side, exactly one mask input, and no mixing of host and
    /// GPU streams.
    pub fn validate(&self) -> RecolorResult<Residency> {
        if self.inputs.is_empty() {
            return Err(RecolorError::configuration("node has no input streams"));
        }
        if self.outputs.is_empty() {
            return Err(RecolorError::configuration("node has no output streams"));
        }

        let input_image = exactly_one(&self.inputs, StreamTag::is_image, "input image")?;
        let output_image = exactly_one(&self.outputs, StreamTag::is_image, "output image")?;
        let mask = exactly_one(&self.inputs, StreamTag::is_mask, "input mask")?;
        if let Some(tag) = self.outputs.iter().find(|t| t.is_mask()) {
            return Err(RecolorError::configuration(format!(
                "{tag} is not a valid output stream"
            )));
        }

        let residency = input_image.residency();
        for tag in [output_image, mask] {
            if tag.residency() != residency {
                return Err(RecolorError::configuration(format!(
                    "cannot mix {input_image} ({residency}) with {tag} ({})",
                    tag.residency()
                )));
            }
        }
        Ok(residency)
    }
}

fn exactly_one(
    tags: &[StreamTag],
    pred: fn(StreamTag) -> bool,
    what: &str,
) -> RecolorResult<StreamTag> {
    let mut found = tags.iter().copied().filter(|t| pred(*t));
    match (found.next(), found.next()) {
        (Some(tag), None) => Ok(tag),
        (None, _) => Err(RecolorError::configuration(format!("missing {what} stream"))),
        (Some(a), Some(b)) => Err(RecolorError::configuration(format!(
            "expected exactly one {what} stream, found {a} and {b}"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/contract.rs"]
mod tests;
