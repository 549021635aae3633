//! Windows implementation of the window source using Win32 APIs.
//!
//! Enumerates visible top-level windows with `EnumWindows` and resolves
//! title, owning process, rectangle, class name, and foreground status per
//! handle. The idle timer comes from `GetLastInputInfo` against the system
//! tick count.

use std::time::Duration;

use tracing::trace;
use windows::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, RECT};
use windows::Win32::System::SystemInformation::GetTickCount;
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetForegroundWindow, GetWindowRect, GetWindowTextW,
    GetWindowThreadProcessId, IsWindowVisible,
};
use windows::core::PWSTR;

use crate::source::types::{SourceError, WindowHandle, WindowRecord, WindowRect};
use crate::source::WindowSource;

/// The Win32-backed window source.
#[derive(Debug, Default)]
pub struct Win32Source;

impl Win32Source {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSource for Win32Source {
    fn visible_windows(&self) -> Result<Vec<WindowRecord>, SourceError> {
        // Collect raw handles first; attribute resolution happens outside
        // the enumeration callback so a slow process query cannot stall it.
        let mut handles: Vec<isize> = Vec::new();
        unsafe {
            EnumWindows(
                Some(collect_visible),
                LPARAM(&mut handles as *mut Vec<isize> as isize),
            )
            .map_err(|e| SourceError::Enumeration(e.to_string()))?;
        }

        let foreground = unsafe { GetForegroundWindow() };
        let mut windows = Vec::with_capacity(handles.len());
        for raw in handles {
            let hwnd = HWND(raw as *mut core::ffi::c_void);
            match resolve_window(hwnd, foreground) {
                Some(record) => windows.push(record),
                // Owning process already gone or unreadable: skip, expected.
                None => trace!(handle = raw, "skipping window with unresolvable attributes"),
            }
        }
        Ok(windows)
    }

    fn idle_duration(&self) -> Result<Duration, SourceError> {
        let mut last_input = LASTINPUTINFO {
            cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
            dwTime: 0,
        };

        let ok = unsafe { GetLastInputInfo(&mut last_input) };
        if !ok.as_bool() {
            return Err(SourceError::IdleUnavailable(
                "GetLastInputInfo failed".to_string(),
            ));
        }

        // Tick counts wrap every ~49 days; wrapping_sub keeps the delta sane.
        let idle_ms = unsafe { GetTickCount() }.wrapping_sub(last_input.dwTime);
        Ok(Duration::from_millis(idle_ms as u64))
    }
}

unsafe extern "system" fn collect_visible(hwnd: HWND, lparam: LPARAM) -> BOOL {
    if IsWindowVisible(hwnd).as_bool() {
        let handles = &mut *(lparam.0 as *mut Vec<isize>);
        handles.push(hwnd.0 as isize);
    }
    BOOL(1)
}

/// Resolve the full attribute set for one window handle.
///
/// Returns `None` when any attribute cannot be read, which happens when
/// the owning process exits between enumeration and resolution.
fn resolve_window(hwnd: HWND, foreground: HWND) -> Option<WindowRecord> {
    let mut title_buf = [0u16; 512];
    let title_len = unsafe { GetWindowTextW(hwnd, &mut title_buf) };
    let title = String::from_utf16_lossy(&title_buf[..title_len.max(0) as usize]);

    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;

    let mut class_buf = [0u16; 256];
    let class_len = unsafe { GetClassNameW(hwnd, &mut class_buf) };
    if class_len <= 0 {
        return None;
    }
    let class_name = String::from_utf16_lossy(&class_buf[..class_len as usize]);

    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    if pid == 0 {
        return None;
    }

    Some(WindowRecord {
        handle: WindowHandle(hwnd.0 as usize as u64),
        title,
        process_name: process_name(pid)?,
        rect: WindowRect::new(rect.left, rect.top, rect.right, rect.bottom),
        class_name,
        is_foreground: hwnd == foreground,
    })
}

/// Look up the base name of a process image, without the `.exe` extension.
fn process_name(pid: u32) -> Option<String> {
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid).ok()?;

        let mut path_buf = [0u16; 1024];
        let mut len = path_buf.len() as u32;
        let result = QueryFullProcessImageNameW(
            handle,
            PROCESS_NAME_WIN32,
            PWSTR(path_buf.as_mut_ptr()),
            &mut len,
        );
        let _ = CloseHandle(handle);
        result.ok()?;

        let path = String::from_utf16_lossy(&path_buf[..len as usize]);
        let file_name = path.rsplit(['\\', '/']).next()?;
        let name = file_name
            .strip_suffix(".exe")
            .or_else(|| file_name.strip_suffix(".EXE"))
            .unwrap_or(file_name);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}
