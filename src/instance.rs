use anyhow::Result;
use std::collections::HashSet;
use std::ffi::CStr;
use std::os::raw::c_void;
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::ExtDebugUtilsExtension;
use vulkanalia::vk::EntryV1_1;
use vulkanalia::{window as vk_window, Version};
use winit::window::Window;

use crate::app::AppData;

pub const VALIDATION_LAYER: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");

// Required by the Vulkan SDK on macOS since 1.3.216.
const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

pub unsafe fn create_instance(
    window: &Window,
    entry: &Entry,
    data: &mut AppData,
    validation: bool,
) -> Result<Instance> {
    let loader_version = entry
        .enumerate_instance_version()
        .unwrap_or(vk::make_version(1, 0, 0));
    log::info!(
        "Vulkan loader version: {}.{}.{}",
        vk::version_major(loader_version),
        vk::version_minor(loader_version),
        vk::version_patch(loader_version)
    );

    let application_info = vk::ApplicationInfo::builder()
        .application_name(b"lava\0")
        .application_version(vk::make_version(0, 1, 0))
        .engine_name(b"No Engine\0")
        .engine_version(vk::make_version(1, 0, 0))
        .api_version(vk::make_version(1, 0, 0));

    let mut extensions = vk_window::get_required_instance_extensions(window)
        .iter()
        .map(|e| e.as_ptr())
        .collect::<Vec<_>>();

    data.validation = validation_enabled(validation, &instance_layers(entry)?);
    if validation && !data.validation {
        log::warn!("Validation layer requested but not available; continuing without it.");
    }

    let layers = if data.validation {
        extensions.push(vk::EXT_DEBUG_UTILS_EXTENSION.name.as_ptr());
        vec![VALIDATION_LAYER.as_ptr()]
    } else {
        Vec::new()
    };

    let flags = if cfg!(target_os = "macos") && entry.version()? >= PORTABILITY_MACOS_VERSION {
        log::info!("Enabling extensions for macOS portability.");
        extensions.push(
            vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION
                .name
                .as_ptr(),
        );
        extensions.push(vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name.as_ptr());
        vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
    } else {
        vk::InstanceCreateFlags::empty()
    };

    let mut info = vk::InstanceCreateInfo::builder()
        .application_info(&application_info)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&extensions)
        .flags(flags);

    let mut debug_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::all())
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .user_callback(Some(debug_callback));

    // Also covers messages emitted by instance creation and destruction.
    if data.validation {
        info = info.push_next(&mut debug_info);
    }

    let instance = entry.create_instance(&info, None)?;

    if data.validation {
        data.messenger = instance.create_debug_utils_messenger_ext(&debug_info, None)?;
    }

    Ok(instance)
}

extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vk::Bool32 {
    let data = unsafe { *data };
    let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
        log::debug!("({:?}) {}", type_, message);
    } else {
        log::trace!("({:?}) {}", type_, message);
    }

    vk::FALSE
}

/// Names of every instance layer the loader reports.
pub unsafe fn instance_layers(entry: &Entry) -> Result<Vec<vk::ExtensionName>> {
    Ok(entry
        .enumerate_instance_layer_properties()?
        .iter()
        .map(|l| l.layer_name)
        .collect())
}

/// Names of every instance extension the loader reports.
pub unsafe fn instance_extensions(entry: &Entry) -> Result<Vec<vk::ExtensionName>> {
    Ok(entry
        .enumerate_instance_extension_properties(None)?
        .iter()
        .map(|e| e.extension_name)
        .collect())
}

pub fn has_layer(available: &[vk::ExtensionName], name: &vk::ExtensionName) -> bool {
    available.contains(name)
}

/// Validation runs only when it was asked for and the layer is installed.
pub fn validation_enabled(requested: bool, available: &[vk::ExtensionName]) -> bool {
    requested && has_layer(available, &VALIDATION_LAYER)
}

/// Returns the names from `required` that are absent from `available`.
pub fn missing_names(
    available: &[vk::ExtensionName],
    required: &[vk::ExtensionName],
) -> Vec<vk::ExtensionName> {
    let available = available.iter().collect::<HashSet<_>>();
    required
        .iter()
        .filter(|n| !available.contains(n))
        .copied()
        .collect()
}

/// Formats a list as the inventory printer shows it: ` 1: name`, one per line.
pub fn numbered<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{:>2}: {}\n", i + 1, item))
        .collect()
}
