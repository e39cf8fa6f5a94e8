use anyhow::{anyhow, Result};
use std::mem;
use vulkanalia::loader::{LibloadingLoader, LIBRARY};
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::{ExtDebugUtilsExtension, KhrSurfaceExtension, KhrSwapchainExtension};
use vulkanalia::window as vk_window;
use winit::window::Window;

use crate::commands::{
    create_command_buffers, create_command_pool, create_vertex_buffer, record_command_buffer,
};
use crate::config::Config;
use crate::device::{create_logical_device, pick_physical_device, QueueFamilyIndices};
use crate::instance::{create_instance, instance_extensions, instance_layers, numbered};
use crate::pipeline::{create_framebuffers, create_pipeline, create_render_pass};
use crate::shader::ShaderLoader;
use crate::swapchain::{
    create_swapchain, create_swapchain_image_views, is_minimized, needs_recreate, SwapchainSupport,
};
use crate::sync::{create_render_finished_semaphores, create_sync_objects, next_frame};

/// Every Vulkan handle the app owns, plus the properties they were created with.
#[derive(Clone, Debug, Default)]
pub struct AppData {
    pub validation: bool,
    pub messenger: vk::DebugUtilsMessengerEXT,
    pub surface: vk::SurfaceKHR,
    pub physical_device: vk::PhysicalDevice,
    pub queue_families: QueueFamilyIndices,
    pub graphics_queue: vk::Queue,
    pub present_queue: vk::Queue,
    pub swapchain_format: vk::Format,
    pub swapchain_extent: vk::Extent2D,
    pub swapchain: vk::SwapchainKHR,
    pub swapchain_images: Vec<vk::Image>,
    pub swapchain_image_views: Vec<vk::ImageView>,
    pub render_pass: vk::RenderPass,
    pub pipeline_layout: vk::PipelineLayout,
    pub pipeline: vk::Pipeline,
    pub framebuffers: Vec<vk::Framebuffer>,
    pub command_pool: vk::CommandPool,
    pub vertex_buffer: vk::Buffer,
    pub vertex_buffer_memory: vk::DeviceMemory,
    pub command_buffers: Vec<vk::CommandBuffer>,
    pub image_available_semaphores: Vec<vk::Semaphore>,
    pub render_finished_semaphores: Vec<vk::Semaphore>,
    pub in_flight_fences: Vec<vk::Fence>,
}

impl AppData {
    /// Moves every swapchain-dependent handle out, leaving null handles and
    /// empty lists in their place.
    pub fn take_swapchain_handles(&mut self) -> SwapchainHandles {
        self.swapchain_images.clear();
        SwapchainHandles {
            swapchain: mem::take(&mut self.swapchain),
            swapchain_image_views: mem::take(&mut self.swapchain_image_views),
            render_pass: mem::take(&mut self.render_pass),
            pipeline_layout: mem::take(&mut self.pipeline_layout),
            pipeline: mem::take(&mut self.pipeline),
            framebuffers: mem::take(&mut self.framebuffers),
            render_finished_semaphores: mem::take(&mut self.render_finished_semaphores),
        }
    }
}

/// Handles that are rebuilt whenever the swapchain is.
#[derive(Debug, Default)]
pub struct SwapchainHandles {
    pub swapchain: vk::SwapchainKHR,
    pub swapchain_image_views: Vec<vk::ImageView>,
    pub render_pass: vk::RenderPass,
    pub pipeline_layout: vk::PipelineLayout,
    pub pipeline: vk::Pipeline,
    pub framebuffers: Vec<vk::Framebuffer>,
    pub render_finished_semaphores: Vec<vk::Semaphore>,
}

pub struct App {
    entry: Entry,
    instance: Instance,
    device: Device,
    data: AppData,
    shaders: ShaderLoader,
    present_mode: vk::PresentModeKHR,
    frame: usize,
    pub resized: bool,
}

impl App {
    pub unsafe fn create(window: &Window, config: &Config) -> Result<Self> {
        let loader = LibloadingLoader::new(LIBRARY)?;
        let entry = Entry::new(loader).map_err(|b| anyhow!("{}", b))?;
        let shaders = ShaderLoader::new(config.shader_dir.clone())?;
        let present_mode = config.present_mode.mode();

        let mut data = AppData::default();
        let instance = create_instance(window, &entry, &mut data, config.validation)?;
        data.surface = vk_window::create_surface(&instance, window, window)?;
        pick_physical_device(&instance, &mut data)?;
        let device = create_logical_device(&entry, &instance, &mut data)?;
        create_swapchain(window, &instance, &device, &mut data, present_mode)?;
        create_swapchain_image_views(&device, &mut data)?;
        create_render_pass(&device, &mut data)?;
        create_pipeline(&device, &mut data, &shaders)?;
        create_framebuffers(&device, &mut data)?;
        create_command_pool(&device, &mut data)?;
        create_vertex_buffer(&instance, &device, &mut data)?;
        create_command_buffers(&device, &mut data)?;
        create_sync_objects(&device, &mut data)?;

        Ok(Self {
            entry,
            instance,
            device,
            data,
            shaders,
            present_mode,
            frame: 0,
            resized: false,
        })
    }

    pub unsafe fn render(&mut self, window: &Window) -> Result<()> {
        if is_minimized(window.inner_size()) {
            return Ok(());
        }

        let in_flight_fence = self.data.in_flight_fences[self.frame];

        self.device
            .wait_for_fences(&[in_flight_fence], true, u64::MAX)?;

        let result = self.device.acquire_next_image_khr(
            self.data.swapchain,
            u64::MAX,
            self.data.image_available_semaphores[self.frame],
            vk::Fence::null(),
        );

        let image_index = match result {
            Ok((image_index, _)) => image_index as usize,
            Err(vk::ErrorCode::OUT_OF_DATE_KHR) => return self.recreate_swapchain(window),
            Err(e) => return Err(anyhow!("{}", e)),
        };

        self.device.reset_fences(&[in_flight_fence])?;

        let command_buffer = self.data.command_buffers[self.frame];
        self.device
            .reset_command_buffer(command_buffer, vk::CommandBufferResetFlags::empty())?;

        record_command_buffer(&self.device, &self.data, command_buffer, image_index)?;

        let wait_semaphores = &[self.data.image_available_semaphores[self.frame]];
        let wait_stages = &[vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = &[command_buffer];
        let signal_semaphores = &[self.data.render_finished_semaphores[image_index]];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(wait_semaphores)
            .wait_dst_stage_mask(wait_stages)
            .command_buffers(command_buffers)
            .signal_semaphores(signal_semaphores);

        self.device
            .queue_submit(self.data.graphics_queue, &[submit_info], in_flight_fence)?;

        let swapchains = &[self.data.swapchain];
        let image_indices = &[image_index as u32];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(signal_semaphores)
            .swapchains(swapchains)
            .image_indices(image_indices);

        let result = self
            .device
            .queue_present_khr(self.data.present_queue, &present_info);
        if needs_recreate(result, self.resized).map_err(|e| anyhow!("{}", e))? {
            self.resized = false;
            self.recreate_swapchain(window)?;
        }

        self.frame = next_frame(self.frame);

        Ok(())
    }

    unsafe fn recreate_swapchain(&mut self, window: &Window) -> Result<()> {
        self.device.device_wait_idle()?;
        self.destroy_swapchain();
        create_swapchain(
            window,
            &self.instance,
            &self.device,
            &mut self.data,
            self.present_mode,
        )?;
        create_swapchain_image_views(&self.device, &mut self.data)?;
        create_render_pass(&self.device, &mut self.data)?;
        create_pipeline(&self.device, &mut self.data, &self.shaders)?;
        create_framebuffers(&self.device, &mut self.data)?;
        create_render_finished_semaphores(&self.device, &mut self.data)?;
        log::debug!(
            "Recreated swapchain at {}x{}",
            self.data.swapchain_extent.width,
            self.data.swapchain_extent.height
        );
        Ok(())
    }

    // Safe to repeat: a second call only sees null handles and empty lists.
    unsafe fn destroy_swapchain(&mut self) {
        let handles = self.data.take_swapchain_handles();
        for semaphore in handles.render_finished_semaphores {
            self.device.destroy_semaphore(semaphore, None);
        }
        for framebuffer in handles.framebuffers {
            self.device.destroy_framebuffer(framebuffer, None);
        }
        self.device.destroy_pipeline(handles.pipeline, None);
        self.device
            .destroy_pipeline_layout(handles.pipeline_layout, None);
        self.device.destroy_render_pass(handles.render_pass, None);
        for image_view in handles.swapchain_image_views {
            self.device.destroy_image_view(image_view, None);
        }
        self.device.destroy_swapchain_khr(handles.swapchain, None);
    }

    pub unsafe fn destroy(&mut self) {
        if let Err(e) = self.device.device_wait_idle() {
            log::error!("Failed to wait for device idle: {}", e);
        }

        self.destroy_swapchain();

        for semaphore in self.data.image_available_semaphores.drain(..) {
            self.device.destroy_semaphore(semaphore, None);
        }
        for fence in self.data.in_flight_fences.drain(..) {
            self.device.destroy_fence(fence, None);
        }

        // Frees the command buffers allocated from it as well.
        self.device
            .destroy_command_pool(self.data.command_pool, None);
        self.data.command_buffers.clear();

        self.device.destroy_buffer(self.data.vertex_buffer, None);
        self.device
            .free_memory(self.data.vertex_buffer_memory, None);

        self.device.destroy_device(None);
        self.instance.destroy_surface_khr(self.data.surface, None);

        if self.data.validation {
            self.instance
                .destroy_debug_utils_messenger_ext(self.data.messenger, None);
        }

        self.instance.destroy_instance(None);
    }

    /// Prints the device, extension and layer inventory to stdout.
    pub unsafe fn print_inventory(&self) -> Result<()> {
        let devices = self
            .instance
            .enumerate_physical_devices()?
            .into_iter()
            .map(|d| self.instance.get_physical_device_properties(d).device_name)
            .collect::<Vec<_>>();
        print!("Devices available:\n{}", numbered(&devices));
        print!(
            "Extensions available:\n{}",
            numbered(&instance_extensions(&self.entry)?)
        );
        print!("Layers available:\n{}", numbered(&instance_layers(&self.entry)?));

        let support = SwapchainSupport::get(&self.instance, &self.data, self.data.physical_device)?;
        println!(
            "Number of surface formats available: {}",
            support.formats.len()
        );
        println!(
            "Number of surface present modes available: {}",
            support.present_modes.len()
        );

        Ok(())
    }
}
