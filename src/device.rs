use anyhow::{anyhow, Result};
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::KhrSurfaceExtension;
use vulkanalia::Version;

use crate::app::AppData;
use crate::error::SuitabilityError;
use crate::instance::{missing_names, VALIDATION_LAYER};
use crate::swapchain::SwapchainSupport;

pub const DEVICE_EXTENSIONS: &[vk::ExtensionName] = &[vk::KHR_SWAPCHAIN_EXTENSION.name];

const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilyIndices {
    pub unsafe fn get(
        instance: &Instance,
        data: &AppData,
        physical_device: vk::PhysicalDevice,
    ) -> Result<Self> {
        let properties = instance.get_physical_device_queue_family_properties(physical_device);
        Self::find(&properties, |index| {
            Ok(instance.get_physical_device_surface_support_khr(
                physical_device,
                index,
                data.surface,
            )?)
        })
    }

    /// Picks the first graphics-capable family and the first family for which
    /// `supports_present` answers true.
    pub fn find<F>(properties: &[vk::QueueFamilyProperties], mut supports_present: F) -> Result<Self>
    where
        F: FnMut(u32) -> Result<bool>,
    {
        let graphics = properties
            .iter()
            .position(|p| p.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .map(|i| i as u32);

        let mut present = None;
        for index in 0..properties.len() as u32 {
            if supports_present(index)? {
                present = Some(index);
                break;
            }
        }

        if let (Some(graphics), Some(present)) = (graphics, present) {
            Ok(Self { graphics, present })
        } else {
            Err(anyhow!(SuitabilityError("required queue families")))
        }
    }

    /// Distinct family indices, graphics first.
    pub fn unique(&self) -> Vec<u32> {
        if self.graphics == self.present {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }
}

/// Preference for a device type: discrete 3, integrated 2, other recognized
/// types 1, `OTHER` 0.
pub fn device_type_score(device_type: vk::PhysicalDeviceType) -> u32 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 3,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 2,
        vk::PhysicalDeviceType::OTHER => 0,
        _ => 1,
    }
}

/// Index of the best candidate, given `(score, suitable)` per device in
/// enumeration order. A zero score is never picked; ties keep the earlier one.
pub fn select_best(candidates: &[(u32, bool)]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, &(score, suitable)) in candidates.iter().enumerate() {
        if !suitable || score == 0 {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

pub unsafe fn pick_physical_device(instance: &Instance, data: &mut AppData) -> Result<()> {
    let physical_devices = instance.enumerate_physical_devices()?;
    if physical_devices.is_empty() {
        return Err(anyhow!("Failed to find GPUs with Vulkan support."));
    }

    let mut candidates = Vec::with_capacity(physical_devices.len());
    for &physical_device in &physical_devices {
        let properties = instance.get_physical_device_properties(physical_device);
        let score = device_type_score(properties.device_type);
        let suitable = match check_physical_device(instance, data, physical_device) {
            Ok(()) => true,
            Err(error) => {
                log::warn!(
                    "Skipping physical device (`{}`): {}",
                    properties.device_name,
                    error
                );
                false
            }
        };
        log::debug!(
            "Physical device `{}` ({:?}) scored {}",
            properties.device_name,
            properties.device_type,
            score
        );
        candidates.push((score, suitable));
    }

    let index = select_best(&candidates)
        .ok_or_else(|| anyhow!("Failed to find suitable physical device."))?;
    let physical_device = physical_devices[index];
    let properties = instance.get_physical_device_properties(physical_device);
    log::info!("Selected physical device (`{}`).", properties.device_name);

    data.physical_device = physical_device;
    data.queue_families = QueueFamilyIndices::get(instance, data, physical_device)?;
    report_surface_preferences(instance, data)?;

    Ok(())
}

unsafe fn check_physical_device(
    instance: &Instance,
    data: &AppData,
    physical_device: vk::PhysicalDevice,
) -> Result<()> {
    QueueFamilyIndices::get(instance, data, physical_device)?;
    check_physical_device_extensions(instance, physical_device)?;

    let support = SwapchainSupport::get(instance, data, physical_device)?;
    if support.formats.is_empty() || support.present_modes.is_empty() {
        return Err(anyhow!(SuitabilityError("swapchain support")));
    }

    Ok(())
}

unsafe fn check_physical_device_extensions(
    instance: &Instance,
    physical_device: vk::PhysicalDevice,
) -> Result<()> {
    let extensions = instance
        .enumerate_device_extension_properties(physical_device, None)?
        .iter()
        .map(|e| e.extension_name)
        .collect::<Vec<_>>();
    if missing_names(&extensions, DEVICE_EXTENSIONS).is_empty() {
        Ok(())
    } else {
        Err(anyhow!(SuitabilityError("required device extensions")))
    }
}

// Not fatal: the swapchain falls back to whatever the surface offers.
unsafe fn report_surface_preferences(instance: &Instance, data: &AppData) -> Result<()> {
    let support = SwapchainSupport::get(instance, data, data.physical_device)?;
    for warning in surface_preference_warnings(&support.formats, &support.present_modes) {
        log::warn!("{}", warning);
    }
    Ok(())
}

/// Warnings for a surface that lacks the preferred format or present modes.
pub fn surface_preference_warnings(
    formats: &[vk::SurfaceFormatKHR],
    present_modes: &[vk::PresentModeKHR],
) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    let has_format = formats.iter().any(|f| {
        (f.format == vk::Format::B8G8R8A8_SRGB || f.format == vk::Format::B8G8R8A8_UNORM)
            && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
    });
    if !has_format {
        warnings.push("Device does not have desired surface format available");
    }
    if !present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
        warnings.push("Device does not have desired present mode available");
    }
    if !present_modes.contains(&vk::PresentModeKHR::FIFO) {
        warnings.push("Device does not have any present mode available");
    }

    warnings
}

pub unsafe fn create_logical_device(
    entry: &Entry,
    instance: &Instance,
    data: &mut AppData,
) -> Result<Device> {
    let indices = data.queue_families;

    let queue_priorities = &[1.0];
    let queue_infos = indices
        .unique()
        .iter()
        .map(|i| {
            vk::DeviceQueueCreateInfo::builder()
                .queue_family_index(*i)
                .queue_priorities(queue_priorities)
        })
        .collect::<Vec<_>>();

    let layers = if data.validation {
        vec![VALIDATION_LAYER.as_ptr()]
    } else {
        vec![]
    };

    let mut extensions = DEVICE_EXTENSIONS
        .iter()
        .map(|n| n.as_ptr())
        .collect::<Vec<_>>();

    if cfg!(target_os = "macos") && entry.version()? >= PORTABILITY_MACOS_VERSION {
        extensions.push(vk::KHR_PORTABILITY_SUBSET_EXTENSION.name.as_ptr());
    }

    let features = vk::PhysicalDeviceFeatures::builder();

    let info = vk::DeviceCreateInfo::builder()
        .queue_create_infos(&queue_infos)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&extensions)
        .enabled_features(&features);

    let device = instance.create_device(data.physical_device, &info, None)?;

    data.graphics_queue = device.get_device_queue(indices.graphics, 0);
    data.present_queue = device.get_device_queue(indices.present, 0);

    Ok(device)
}
