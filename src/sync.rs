use anyhow::Result;
use vulkanalia::prelude::v1_0::*;

use crate::app::AppData;
use crate::MAX_FRAMES_IN_FLIGHT;

pub unsafe fn create_sync_objects(device: &Device, data: &mut AppData) -> Result<()> {
    let semaphore_info = vk::SemaphoreCreateInfo::builder();
    // Signaled so the first wait on each frame returns immediately.
    let fence_info = vk::FenceCreateInfo::builder().flags(vk::FenceCreateFlags::SIGNALED);

    for _ in 0..MAX_FRAMES_IN_FLIGHT {
        data.image_available_semaphores
            .push(device.create_semaphore(&semaphore_info, None)?);
        data.in_flight_fences
            .push(device.create_fence(&fence_info, None)?);
    }

    create_render_finished_semaphores(device, data)
}

/// One per swapchain image: presentation may still hold the semaphore of an
/// image after its frame slot has been reused.
pub unsafe fn create_render_finished_semaphores(device: &Device, data: &mut AppData) -> Result<()> {
    let semaphore_info = vk::SemaphoreCreateInfo::builder();

    data.render_finished_semaphores = data
        .swapchain_images
        .iter()
        .map(|_| device.create_semaphore(&semaphore_info, None))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(())
}

/// Frame slot that follows `frame`.
pub fn next_frame(frame: usize) -> usize {
    (frame + 1) % MAX_FRAMES_IN_FLIGHT
}
