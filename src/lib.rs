#![allow(unsafe_op_in_unsafe_fn, clippy::missing_safety_doc)]

//! A minimal Vulkan bootstrap: window, instance, device, swapchain, pipeline
//! and a frame loop drawing a single triangle.

pub mod app;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod instance;
pub mod pipeline;
pub mod shader;
pub mod swapchain;
pub mod sync;

pub use app::App;
pub use config::Config;

/// Number of frames the CPU may record ahead of the GPU.
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;
