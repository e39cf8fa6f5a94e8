use lava::device::QueueFamilyIndices;
use lava::swapchain::{
    get_sharing_mode, get_swapchain_extent, get_swapchain_image_count,
    get_swapchain_present_mode, get_swapchain_surface_format, is_minimized, needs_recreate,
};
use vulkanalia::vk;
use winit::dpi::PhysicalSize;

fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
    vk::SurfaceFormatKHR {
        format,
        color_space,
    }
}

fn extent(width: u32, height: u32) -> vk::Extent2D {
    vk::Extent2D { width, height }
}

fn assert_extent_eq(actual: vk::Extent2D, width: u32, height: u32) {
    assert!(
        actual.width == width && actual.height == height,
        "Expected {}x{}, but got {}x{}",
        width,
        height,
        actual.width,
        actual.height
    );
}

fn capabilities(min_images: u32, max_images: u32) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count: min_images,
        max_image_count: max_images,
        current_extent: extent(u32::MAX, u32::MAX),
        min_image_extent: extent(100, 100),
        max_image_extent: extent(1000, 800),
        ..Default::default()
    }
}

#[test]
fn test_surface_format_prefers_srgb() {
    let formats = [
        format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
    ];
    let chosen = get_swapchain_surface_format(&formats).unwrap();
    assert_eq!(chosen.format, vk::Format::B8G8R8A8_SRGB);
}

#[test]
fn test_surface_format_falls_back_to_unorm() {
    let formats = [
        format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
    ];
    let chosen = get_swapchain_surface_format(&formats).unwrap();
    assert_eq!(chosen.format, vk::Format::B8G8R8A8_UNORM);
}

#[test]
fn test_surface_format_falls_back_to_first() {
    let formats = [
        format(vk::Format::R16G16B16A16_SFLOAT, vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT),
        format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
    ];
    let chosen = get_swapchain_surface_format(&formats).unwrap();
    assert_eq!(chosen.format, vk::Format::R16G16B16A16_SFLOAT);
    assert_eq!(chosen.color_space, vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT);
}

#[test]
fn test_surface_format_empty() {
    assert!(get_swapchain_surface_format(&[]).is_none());
}

#[test]
fn test_present_mode_uses_preference_when_available() {
    let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
    assert_eq!(
        get_swapchain_present_mode(&modes, vk::PresentModeKHR::MAILBOX),
        vk::PresentModeKHR::MAILBOX
    );
}

#[test]
fn test_present_mode_falls_back_to_fifo() {
    let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::FIFO_RELAXED];
    assert_eq!(
        get_swapchain_present_mode(&modes, vk::PresentModeKHR::IMMEDIATE),
        vk::PresentModeKHR::FIFO
    );
}

#[test]
fn test_extent_uses_current_extent() {
    let mut caps = capabilities(2, 0);
    caps.current_extent = extent(640, 480);
    assert_extent_eq(get_swapchain_extent(caps, PhysicalSize::new(1920, 1080)), 640, 480);
}

#[test]
fn test_extent_clamps_window_size() {
    let caps = capabilities(2, 0);
    assert_extent_eq(get_swapchain_extent(caps, PhysicalSize::new(1920, 50)), 1000, 100);
    assert_extent_eq(get_swapchain_extent(caps, PhysicalSize::new(800, 600)), 800, 600);
}

#[test]
fn test_extent_inverted_bounds_do_not_panic() {
    let mut caps = capabilities(2, 0);
    caps.min_image_extent = extent(500, 400);
    caps.max_image_extent = extent(300, 200);
    assert_extent_eq(get_swapchain_extent(caps, PhysicalSize::new(800, 600)), 500, 400);
    assert_extent_eq(get_swapchain_extent(caps, PhysicalSize::new(10, 10)), 500, 400);
}

#[test]
fn test_minimized_when_either_side_is_zero() {
    assert!(is_minimized(PhysicalSize::new(0, 0)));
    assert!(is_minimized(PhysicalSize::new(0, 600)));
    assert!(is_minimized(PhysicalSize::new(800, 0)));
    assert!(!is_minimized(PhysicalSize::new(800, 600)));
    assert!(!is_minimized(PhysicalSize::new(1, 1)));
}

#[test]
fn test_recreate_after_successful_present() {
    assert_eq!(needs_recreate(Ok(vk::SuccessCode::SUCCESS), false), Ok(false));
    assert_eq!(needs_recreate(Ok(vk::SuccessCode::SUCCESS), true), Ok(true));
    assert_eq!(needs_recreate(Ok(vk::SuccessCode::SUBOPTIMAL_KHR), false), Ok(true));
}

#[test]
fn test_recreate_when_out_of_date() {
    assert_eq!(needs_recreate(Err(vk::ErrorCode::OUT_OF_DATE_KHR), false), Ok(true));
    assert_eq!(needs_recreate(Err(vk::ErrorCode::OUT_OF_DATE_KHR), true), Ok(true));
}

#[test]
fn test_present_failure_survives_resize() {
    assert_eq!(
        needs_recreate(Err(vk::ErrorCode::SURFACE_LOST_KHR), true),
        Err(vk::ErrorCode::SURFACE_LOST_KHR)
    );
    assert_eq!(
        needs_recreate(Err(vk::ErrorCode::DEVICE_LOST), false),
        Err(vk::ErrorCode::DEVICE_LOST)
    );
}

#[test]
fn test_image_count_one_above_minimum() {
    assert_eq!(get_swapchain_image_count(capabilities(2, 8)), 3);
}

#[test]
fn test_image_count_unbounded_maximum() {
    assert_eq!(get_swapchain_image_count(capabilities(3, 0)), 4);
}

#[test]
fn test_image_count_capped_at_maximum() {
    assert_eq!(get_swapchain_image_count(capabilities(3, 3)), 3);
}

#[test]
fn test_sharing_exclusive_for_shared_family() {
    let (mode, indices) = get_sharing_mode(QueueFamilyIndices { graphics: 1, present: 1 });
    assert_eq!(mode, vk::SharingMode::EXCLUSIVE);
    assert!(indices.is_empty());
}

#[test]
fn test_sharing_concurrent_for_split_families() {
    let (mode, indices) = get_sharing_mode(QueueFamilyIndices { graphics: 0, present: 2 });
    assert_eq!(mode, vk::SharingMode::CONCURRENT);
    assert_eq!(indices, vec![0, 2]);
}
