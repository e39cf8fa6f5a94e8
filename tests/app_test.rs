use lava::app::AppData;
use vulkanalia::vk::{self, Handle};

fn filled() -> AppData {
    AppData {
        swapchain: vk::SwapchainKHR::from_raw(1),
        swapchain_images: vec![vk::Image::from_raw(2), vk::Image::from_raw(3)],
        swapchain_image_views: vec![vk::ImageView::from_raw(4), vk::ImageView::from_raw(5)],
        render_pass: vk::RenderPass::from_raw(6),
        pipeline_layout: vk::PipelineLayout::from_raw(7),
        pipeline: vk::Pipeline::from_raw(8),
        framebuffers: vec![vk::Framebuffer::from_raw(9)],
        render_finished_semaphores: vec![vk::Semaphore::from_raw(10)],
        command_pool: vk::CommandPool::from_raw(11),
        ..Default::default()
    }
}

#[test]
fn test_take_swapchain_handles_moves_everything_out() {
    let mut data = filled();
    let handles = data.take_swapchain_handles();

    assert_eq!(handles.swapchain.as_raw(), 1);
    assert_eq!(handles.swapchain_image_views.len(), 2);
    assert_eq!(handles.render_pass.as_raw(), 6);
    assert_eq!(handles.pipeline_layout.as_raw(), 7);
    assert_eq!(handles.pipeline.as_raw(), 8);
    assert_eq!(handles.framebuffers.len(), 1);
    assert_eq!(handles.render_finished_semaphores.len(), 1);
}

#[test]
fn test_take_swapchain_handles_leaves_nulls() {
    let mut data = filled();
    data.take_swapchain_handles();

    assert!(data.swapchain.is_null());
    assert!(data.render_pass.is_null());
    assert!(data.pipeline_layout.is_null());
    assert!(data.pipeline.is_null());
    assert!(data.swapchain_images.is_empty());
    assert!(data.swapchain_image_views.is_empty());
    assert!(data.framebuffers.is_empty());
    assert!(data.render_finished_semaphores.is_empty());
    assert_eq!(data.command_pool.as_raw(), 11);
}

#[test]
fn test_second_teardown_has_nothing_to_destroy() {
    let mut data = filled();
    data.take_swapchain_handles();
    let again = data.take_swapchain_handles();

    assert!(again.swapchain.is_null());
    assert!(again.render_pass.is_null());
    assert!(again.pipeline_layout.is_null());
    assert!(again.pipeline.is_null());
    assert!(again.swapchain_image_views.is_empty());
    assert!(again.framebuffers.is_empty());
    assert!(again.render_finished_semaphores.is_empty());
}
