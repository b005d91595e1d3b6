use std::path::Path;

use crate::contract::{StreamContract, StreamTag};
use crate::foundation::error::{RecolorError, RecolorResult};

/// Which mask channel supplies the blend weight.
///
/// `Unknown` is what an unset selector deserializes to in older configs; it behaves as `Red`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaskChannel {
    /// Unspecified; treated as [`MaskChannel::Red`].
    #[serde(alias = "unknown")]
    Unknown,
    /// First (red-like) channel of a multi-channel mask.
    #[default]
    #[serde(alias = "red")]
    Red,
    /// Fourth channel of an RGBA mask.
    #[serde(alias = "alpha")]
    Alpha,
}

impl MaskChannel {
    /// Collapse `Unknown` into `Red`.
    pub fn resolved(self) -> Self {
        match self {
            Self::Unknown | Self::Red => Self::Red,
            Self::Alpha => Self::Alpha,
        }
    }

    /// Interleaved channel index read from a multi-channel mask.
    pub fn plane_index(self) -> usize {
        match self.resolved() {
            Self::Alpha => 3,
            _ => 0,
        }
    }

    /// Vector component name the shader reads the weight from.
    pub fn shader_component(self) -> &'static str {
        match self.resolved() {
            Self::Alpha => "a",
            _ => "r",
        }
    }
}

/// An 8-bit RGB color as written in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    /// Red, 0..=255.
    pub r: u8,
    /// Green, 0..=255.
    pub g: u8,
    /// Blue, 0..=255.
    pub b: u8,
}

impl RgbColor {
    /// Build a color from its channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::str::FromStr for RgbColor {
    type Err = RecolorError;

    /// Parse `"r,g,b"` with each channel in 0..=255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RecolorError::configuration(format!("invalid color '{s}': {e}")))?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(RecolorError::configuration(format!(
                "color '{s}' must have exactly three channels"
            ))),
        }
    }
}

/// Raw recolor options as they appear in a node configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecolorOptions {
    /// Target color. Required.
    #[serde(default)]
    pub color: Option<RgbColor>,
    /// Mask channel selector; `Red` when absent.
    #[serde(default)]
    pub mask_channel: Option<MaskChannel>,
}

/// Validated, immutable blend settings shared by both executors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendConfig {
    target_color: [f32; 3],
    mask_channel: MaskChannel,
}

impl BlendConfig {
    /// Build from an 8-bit color; channels are normalized to `[0, 1]`.
    pub fn new(color: RgbColor, mask_channel: MaskChannel) -> Self {
        Self {
            target_color: [
                f32::from(color.r) / 255.0,
                f32::from(color.g) / 255.0,
                f32::from(color.b) / 255.0,
            ],
            mask_channel: mask_channel.resolved(),
        }
    }

    /// Validate raw options. A missing color is fatal.
    pub fn from_options(options: &RecolorOptions) -> RecolorResult<Self> {
        let color = options
            .color
            .ok_or_else(|| RecolorError::configuration("missing color option"))?;
        Ok(Self::new(color, options.mask_channel.unwrap_or_default()))
    }

    /// Target color normalized to `[0, 1]`.
    pub fn target_color(&self) -> [f32; 3] {
        self.target_color
    }

    /// Target color rescaled to `[0, 255]` for blending against 8-bit pixels.
    pub fn target_color_255(&self) -> [f32; 3] {
        self.target_color.map(|c| c * 255.0)
    }

    /// Mask channel selector (never `Unknown`).
    pub fn mask_channel(&self) -> MaskChannel {
        self.mask_channel
    }
}

/// Complete setup for one recolor node: bound streams plus options.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Input stream tags, e.g. `["IMAGE", "MASK"]`.
    pub inputs: Vec<StreamTag>,
    /// Output stream tags, e.g. `["IMAGE"]`.
    pub outputs: Vec<StreamTag>,
    /// Recolor options.
    #[serde(default)]
    pub options: RecolorOptions,
}

impl NodeConfig {
    /// Parse a JSON node configuration.
    pub fn from_json_str(s: &str) -> RecolorResult<Self> {
        serde_json::from_str(s).map_err(|e| RecolorError::serde(format!("node config: {e}")))
    }

    /// Read and parse a JSON node configuration file.
    pub fn from_path(path: &Path) -> RecolorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RecolorError::Other(anyhow::Error::new(e).context(format!(
                "read node config '{}'",
                path.display()
            )))
        })?;
        Self::from_json_str(&text)
    }

    /// The stream binding part of the configuration.
    pub fn contract(&self) -> StreamContract {
        StreamContract::new(self.inputs.clone(), self.outputs.clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
