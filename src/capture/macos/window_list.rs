//! Window server enumeration through CGWindowListCopyWindowInfo

use crate::{
    error::{CaptureError, CaptureResult},
    types::{Rectangle, WindowDescriptor, WindowListScope},
};

use core_foundation::array::CFArrayRef;
use core_foundation::base::TCFType;
use core_foundation::boolean::{CFBoolean, CFBooleanRef};
use core_foundation::dictionary::{CFDictionaryGetValueIfPresent, CFDictionaryRef};
use core_foundation::number::{CFNumber, CFNumberRef};
use core_foundation::string::{CFString, CFStringRef};
use core_graphics::display::{
    kCGWindowListOptionAll, kCGWindowListOptionOnScreenOnly, CGDisplay,
    CGWindowListOption,
};
use std::ffi::c_void;

extern "C" {
    fn CFArrayGetValueAtIndex(the_array: CFArrayRef, idx: isize) -> *const c_void;
}

pub(super) fn list_option(scope: WindowListScope) -> CGWindowListOption {
    match scope {
        WindowListScope::All => kCGWindowListOptionAll,
        WindowListScope::OnScreenOnly => kCGWindowListOptionOnScreenOnly,
    }
}

/// Snapshot the window list in stacking order, front to back
pub fn list_windows(scope: WindowListScope) -> CaptureResult<Vec<WindowDescriptor>> {
    let info_array = CGDisplay::window_list_info(list_option(scope), None)
        .ok_or_else(|| {
            CaptureError::WindowEnumerationFailed(
                "CGWindowListCopyWindowInfo returned no list".to_string(),
            )
        })?;

    let count = info_array.len();
    let mut windows = Vec::with_capacity(count as usize);

    for index in 0..count {
        let dict = unsafe { CFArrayGetValueAtIndex(info_array.as_concrete_TypeRef(), index) };
        if dict.is_null() {
            continue;
        }
        // kCGWindowNumber is always present for a real window
        if let Some(window) = descriptor_from_info(dict as CFDictionaryRef) {
            windows.push(window);
        }
    }

    log::debug!("window server reported {} windows", windows.len());
    Ok(windows)
}

fn descriptor_from_info(dict: CFDictionaryRef) -> Option<WindowDescriptor> {
    let id = number_value(dict, "kCGWindowNumber")? as u32;

    let bounds = dictionary_value(dict, "kCGWindowBounds")
        .map(|value| {
            let bounds = value as CFDictionaryRef;
            Rectangle {
                x: number_value(bounds, "X").unwrap_or(0.0) as i32,
                y: number_value(bounds, "Y").unwrap_or(0.0) as i32,
                width: number_value(bounds, "Width").unwrap_or(0.0) as u32,
                height: number_value(bounds, "Height").unwrap_or(0.0) as u32,
            }
        })
        .unwrap_or_default();

    Some(WindowDescriptor {
        id,
        name: string_value(dict, "kCGWindowName").unwrap_or_default(),
        bounds,
        owner_name: string_value(dict, "kCGWindowOwnerName").unwrap_or_default(),
        layer: number_value(dict, "kCGWindowLayer").unwrap_or(0.0) as i32,
        is_on_screen: bool_value(dict, "kCGWindowIsOnscreen").unwrap_or(false),
    })
}

fn dictionary_value(dict: CFDictionaryRef, key: &str) -> Option<*const c_void> {
    let cf_key = CFString::new(key);
    let mut value: *const c_void = std::ptr::null();
    let present = unsafe {
        CFDictionaryGetValueIfPresent(dict, cf_key.as_concrete_TypeRef() as *const _, &mut value)
    };
    if present == 0 || value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn number_value(dict: CFDictionaryRef, key: &str) -> Option<f64> {
    let value = dictionary_value(dict, key)?;
    let number = unsafe { CFNumber::wrap_under_get_rule(value as CFNumberRef) };
    number.to_f64()
}

fn string_value(dict: CFDictionaryRef, key: &str) -> Option<String> {
    let value = dictionary_value(dict, key)?;
    let string = unsafe { CFString::wrap_under_get_rule(value as CFStringRef) };
    Some(string.to_string())
}

fn bool_value(dict: CFDictionaryRef, key: &str) -> Option<bool> {
    let value = dictionary_value(dict, key)?;
    let flag = unsafe { CFBoolean::wrap_under_get_rule(value as CFBooleanRef) };
    Some(flag.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_windows() {
        // Without screen recording permission titles may be empty; ids never are
        let windows = list_windows(WindowListScope::All).unwrap();
        for window in &windows {
            assert!(window.id > 0, "Window id should be > 0");
        }
    }
}
