use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use vulkanalia::vk;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "LAVA LAVA";

/// Command line options for the `lava` binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "lava", version, about = "Draws a triangle through a bare Vulkan bootstrap")]
pub struct Config {
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Preferred presentation mode; FIFO is used when it is unavailable
    #[arg(long, value_enum, default_value_t = PresentModePreference::Mailbox)]
    pub present_mode: PresentModePreference,

    /// Enable the Khronos validation layer (`--validation false` to disable)
    #[arg(long, action = ArgAction::Set, default_value_t = cfg!(debug_assertions))]
    pub validation: bool,

    /// Print available devices, extensions and layers after startup
    #[arg(long)]
    pub list: bool,

    /// Load shaders from this directory instead of the built-in sources
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            present_mode: PresentModePreference::Mailbox,
            validation: cfg!(debug_assertions),
            list: false,
            shader_dir: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresentModePreference {
    Fifo,
    Mailbox,
    Immediate,
}

impl PresentModePreference {
    pub fn mode(self) -> vk::PresentModeKHR {
        match self {
            Self::Fifo => vk::PresentModeKHR::FIFO,
            Self::Mailbox => vk::PresentModeKHR::MAILBOX,
            Self::Immediate => vk::PresentModeKHR::IMMEDIATE,
        }
    }
}
