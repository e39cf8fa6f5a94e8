use anyhow::{anyhow, Result};
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::{KhrSurfaceExtension, KhrSwapchainExtension};
use vulkanalia::VkResult;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::app::AppData;
use crate::device::QueueFamilyIndices;

#[derive(Clone, Debug)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub unsafe fn get(
        instance: &Instance,
        data: &AppData,
        physical_device: vk::PhysicalDevice,
    ) -> Result<Self> {
        Ok(Self {
            capabilities: instance
                .get_physical_device_surface_capabilities_khr(physical_device, data.surface)?,
            formats: instance
                .get_physical_device_surface_formats_khr(physical_device, data.surface)?,
            present_modes: instance
                .get_physical_device_surface_present_modes_khr(physical_device, data.surface)?,
        })
    }
}

pub fn get_swapchain_surface_format(
    formats: &[vk::SurfaceFormatKHR],
) -> Option<vk::SurfaceFormatKHR> {
    let preferred = |format: vk::Format| {
        formats.iter().copied().find(|f| {
            f.format == format && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
    };

    preferred(vk::Format::B8G8R8A8_SRGB)
        .or_else(|| preferred(vk::Format::B8G8R8A8_UNORM))
        .or_else(|| formats.first().copied())
}

/// FIFO is the only mode every surface must support, so it backs up `preferred`.
pub fn get_swapchain_present_mode(
    present_modes: &[vk::PresentModeKHR],
    preferred: vk::PresentModeKHR,
) -> vk::PresentModeKHR {
    present_modes
        .iter()
        .copied()
        .find(|m| *m == preferred)
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

pub fn get_swapchain_extent(
    capabilities: vk::SurfaceCapabilitiesKHR,
    size: PhysicalSize<u32>,
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        let clamp = |min: u32, max: u32, v: u32| min.max(max.min(v));
        vk::Extent2D::builder()
            .width(clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
                size.width,
            ))
            .height(clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
                size.height,
            ))
            .build()
    }
}

/// A window with no drawable area gets no frames.
pub fn is_minimized(size: PhysicalSize<u32>) -> bool {
    size.width == 0 || size.height == 0
}

/// Whether the swapchain has to be rebuilt after presenting. Any failure other
/// than `OUT_OF_DATE_KHR` is handed back, even after a resize.
pub fn needs_recreate(
    result: VkResult<vk::SuccessCode>,
    resized: bool,
) -> Result<bool, vk::ErrorCode> {
    match result {
        Ok(code) => Ok(resized || code == vk::SuccessCode::SUBOPTIMAL_KHR),
        Err(vk::ErrorCode::OUT_OF_DATE_KHR) => Ok(true),
        Err(e) => Err(e),
    }
}

pub fn get_swapchain_image_count(capabilities: vk::SurfaceCapabilitiesKHR) -> u32 {
    let image_count = capabilities.min_image_count + 1;
    if capabilities.max_image_count != 0 && image_count > capabilities.max_image_count {
        capabilities.max_image_count
    } else {
        image_count
    }
}

/// Concurrent sharing is only needed when two distinct families touch the images.
pub fn get_sharing_mode(indices: QueueFamilyIndices) -> (vk::SharingMode, Vec<u32>) {
    if indices.graphics != indices.present {
        (vk::SharingMode::CONCURRENT, indices.unique())
    } else {
        (vk::SharingMode::EXCLUSIVE, Vec::new())
    }
}

pub unsafe fn create_swapchain(
    window: &Window,
    instance: &Instance,
    device: &Device,
    data: &mut AppData,
    preferred_present_mode: vk::PresentModeKHR,
) -> Result<()> {
    let support = SwapchainSupport::get(instance, data, data.physical_device)?;

    let surface_format = get_swapchain_surface_format(&support.formats)
        .ok_or_else(|| anyhow!("Surface reports no formats."))?;
    let present_mode = get_swapchain_present_mode(&support.present_modes, preferred_present_mode);
    let extent = get_swapchain_extent(support.capabilities, window.inner_size());
    let image_count = get_swapchain_image_count(support.capabilities);
    let (image_sharing_mode, queue_family_indices) = get_sharing_mode(data.queue_families);

    log::debug!(
        "Creating swapchain: {:?} {:?}, {:?}, {}x{}, {} images",
        surface_format.format,
        surface_format.color_space,
        present_mode,
        extent.width,
        extent.height,
        image_count
    );

    let info = vk::SwapchainCreateInfoKHR::builder()
        .surface(data.surface)
        .min_image_count(image_count)
        .image_format(surface_format.format)
        .image_color_space(surface_format.color_space)
        .image_extent(extent)
        .image_array_layers(1)
        .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
        .image_sharing_mode(image_sharing_mode)
        .queue_family_indices(&queue_family_indices)
        .pre_transform(support.capabilities.current_transform)
        .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
        .present_mode(present_mode)
        .clipped(true)
        .old_swapchain(vk::SwapchainKHR::null());

    data.swapchain = device.create_swapchain_khr(&info, None)?;
    data.swapchain_images = device.get_swapchain_images_khr(data.swapchain)?;
    data.swapchain_format = surface_format.format;
    data.swapchain_extent = extent;

    Ok(())
}

pub unsafe fn create_swapchain_image_views(device: &Device, data: &mut AppData) -> Result<()> {
    let components = vk::ComponentMapping::builder()
        .r(vk::ComponentSwizzle::IDENTITY)
        .g(vk::ComponentSwizzle::IDENTITY)
        .b(vk::ComponentSwizzle::IDENTITY)
        .a(vk::ComponentSwizzle::IDENTITY);

    let subresource_range = vk::ImageSubresourceRange::builder()
        .aspect_mask(vk::ImageAspectFlags::COLOR)
        .base_mip_level(0)
        .level_count(1)
        .base_array_layer(0)
        .layer_count(1);

    data.swapchain_image_views = data
        .swapchain_images
        .iter()
        .map(|i| {
            let info = vk::ImageViewCreateInfo::builder()
                .image(*i)
                .view_type(vk::ImageViewType::_2D)
                .format(data.swapchain_format)
                .components(components)
                .subresource_range(subresource_range);

            device.create_image_view(&info, None)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(())
}
