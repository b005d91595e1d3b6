use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

use recolor::{
    ImageFrame, MaskChannel, NodeConfig, RecolorNode, RecolorOptions, RgbColor, StreamContract,
    Timestamp,
};

#[derive(Parser, Debug)]
#[command(name = "recolor", version, about = "Recolor the masked region of an image")]
struct Cli {
    /// Source image (PNG or JPEG).
    #[arg(long)]
    image: PathBuf,

    /// Mask image. Gray, RGB or RGBA; resized to the source if needed.
    #[arg(long)]
    mask: PathBuf,

    /// Output image path; format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Node configuration JSON (streams and options).
    #[arg(long, conflicts_with_all = ["color", "mask_channel"])]
    config: Option<PathBuf>,

    /// Target color as `R,G,B`.
    #[arg(long, required_unless_present = "config")]
    color: Option<RgbColor>,

    /// Mask channel holding the weight.
    #[arg(long, value_enum)]
    mask_channel: Option<ChannelArg>,

    /// Executor to run on. Overrides the streams of `--config`.
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChannelArg {
    Red,
    Alpha,
}

impl From<ChannelArg> for MaskChannel {
    fn from(c: ChannelArg) -> Self {
        match c {
            ChannelArg::Red => MaskChannel::Red,
            ChannelArg::Alpha => MaskChannel::Alpha,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Cpu,
    Gpu,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = node_config(&cli)?;

    let image = load_frame(&cli.image)?.to_rgb8();
    let mask = load_frame(&cli.mask)?;

    let mut node = RecolorNode::from_config(&config).context("open recolor node")?;
    let image = node.import(image)?;
    let mask = node.import(mask)?;
    let packet = node
        .process(Timestamp(0), image, Some(mask))?
        .context("recolor produced no output")?;
    let out = node.export(&packet.payload)?.to_rgb8();
    node.close()?;

    if let Some(parent) = cli.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    out.into_dynamic()?
        .save(&cli.out)
        .with_context(|| format!("write image '{}'", cli.out.display()))?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

fn node_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_path(path)?,
        None => {
            let contract = StreamContract::cpu();
            NodeConfig {
                inputs: contract.inputs().to_vec(),
                outputs: contract.outputs().to_vec(),
                options: RecolorOptions {
                    color: cli.color,
                    mask_channel: cli.mask_channel.map(MaskChannel::from),
                },
            }
        }
    };
    if let Some(backend) = cli.backend {
        let contract = match backend {
            BackendArg::Cpu => StreamContract::cpu(),
            BackendArg::Gpu => StreamContract::gpu(),
        };
        config.inputs = contract.inputs().to_vec();
        config.outputs = contract.outputs().to_vec();
    }
    Ok(config)
}

fn load_frame(path: &Path) -> anyhow::Result<ImageFrame> {
    let img = image::open(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(ImageFrame::from_dynamic(img)?)
}
