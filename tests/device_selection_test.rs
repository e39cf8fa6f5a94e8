use anyhow::anyhow;
use lava::device::{
    device_type_score, select_best, surface_preference_warnings, QueueFamilyIndices,
};
use vulkanalia::vk;

fn family(flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
    vk::QueueFamilyProperties {
        queue_flags: flags,
        queue_count: 1,
        ..Default::default()
    }
}

#[test]
fn test_device_type_score_ordering() {
    assert_eq!(device_type_score(vk::PhysicalDeviceType::DISCRETE_GPU), 3);
    assert_eq!(device_type_score(vk::PhysicalDeviceType::INTEGRATED_GPU), 2);
    assert_eq!(device_type_score(vk::PhysicalDeviceType::VIRTUAL_GPU), 1);
    assert_eq!(device_type_score(vk::PhysicalDeviceType::CPU), 1);
    assert_eq!(device_type_score(vk::PhysicalDeviceType::OTHER), 0);
}

#[test]
fn test_select_best_prefers_highest_score() {
    let candidates = [(2, true), (3, true), (1, true)];
    assert_eq!(select_best(&candidates), Some(1));
}

#[test]
fn test_select_best_skips_unsuitable() {
    let candidates = [(3, false), (2, true)];
    assert_eq!(select_best(&candidates), Some(1));
}

#[test]
fn test_select_best_never_picks_zero_score() {
    assert_eq!(select_best(&[(0, true)]), None);
    assert_eq!(select_best(&[(0, true), (1, true)]), Some(1));
}

#[test]
fn test_select_best_tie_keeps_first() {
    let candidates = [(2, true), (2, true)];
    assert_eq!(select_best(&candidates), Some(0));
}

#[test]
fn test_select_best_empty() {
    assert_eq!(select_best(&[]), None);
}

#[test]
fn test_queue_families_shared() {
    let properties = [family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER)];
    let indices = QueueFamilyIndices::find(&properties, |_| Ok(true)).unwrap();
    assert_eq!(indices, QueueFamilyIndices { graphics: 0, present: 0 });
    assert_eq!(indices.unique(), vec![0]);
}

#[test]
fn test_queue_families_split() {
    let properties = [
        family(vk::QueueFlags::TRANSFER),
        family(vk::QueueFlags::GRAPHICS),
        family(vk::QueueFlags::COMPUTE),
    ];
    let indices = QueueFamilyIndices::find(&properties, |index| Ok(index == 2)).unwrap();
    assert_eq!(indices.graphics, 1);
    assert_eq!(indices.present, 2);
}

#[test]
fn test_queue_families_first_match_wins() {
    let properties = [
        family(vk::QueueFlags::GRAPHICS),
        family(vk::QueueFlags::GRAPHICS),
    ];
    let mut asked = Vec::new();
    let indices = QueueFamilyIndices::find(&properties, |index| {
        asked.push(index);
        Ok(true)
    })
    .unwrap();
    assert_eq!(indices.graphics, 0);
    assert_eq!(indices.present, 0);
    assert_eq!(asked, vec![0]);
}

#[test]
fn test_queue_families_missing_graphics() {
    let properties = [family(vk::QueueFlags::COMPUTE)];
    let error = QueueFamilyIndices::find(&properties, |_| Ok(true)).unwrap_err();
    assert!(error.to_string().contains("queue families"));
}

#[test]
fn test_queue_families_missing_present() {
    let properties = [family(vk::QueueFlags::GRAPHICS)];
    assert!(QueueFamilyIndices::find(&properties, |_| Ok(false)).is_err());
}

#[test]
fn test_queue_families_propagates_query_error() {
    let properties = [family(vk::QueueFlags::GRAPHICS)];
    let error = QueueFamilyIndices::find(&properties, |_| Err(anyhow!("surface lost"))).unwrap_err();
    assert_eq!(error.to_string(), "surface lost");
}

fn srgb(format: vk::Format) -> vk::SurfaceFormatKHR {
    vk::SurfaceFormatKHR {
        format,
        color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
    }
}

#[test]
fn test_surface_preferences_met() {
    let formats = [srgb(vk::Format::B8G8R8A8_SRGB)];
    let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
    assert!(surface_preference_warnings(&formats, &modes).is_empty());
}

#[test]
fn test_surface_preferences_warn_without_fifo() {
    let formats = [srgb(vk::Format::B8G8R8A8_UNORM)];
    let modes = [vk::PresentModeKHR::MAILBOX];
    assert_eq!(
        surface_preference_warnings(&formats, &modes),
        vec!["Device does not have any present mode available"]
    );
}

#[test]
fn test_surface_preferences_warn_for_each_gap() {
    let formats = [srgb(vk::Format::R8G8B8A8_UNORM)];
    let warnings = surface_preference_warnings(&formats, &[vk::PresentModeKHR::IMMEDIATE]);
    assert_eq!(
        warnings,
        vec![
            "Device does not have desired surface format available",
            "Device does not have desired present mode available",
            "Device does not have any present mode available",
        ]
    );
}
