use std::io::{self, Write};
use std::path::Path;

use super::types::{AnalyzerError, VolumeStats};
use super::utils::format_size;

/// Capacity and free space of the volume hosting `path`.
#[cfg(windows)]
pub fn volume_stats(path: &Path) -> Result<VolumeStats, AnalyzerError> {
    use std::os::windows::ffi::OsStrExt;
    use winapi::um::fileapi::GetDiskFreeSpaceExW;
    use winapi::um::winnt::ULARGE_INTEGER;

    let mut free_bytes_available: ULARGE_INTEGER = unsafe { std::mem::zeroed() };
    let mut total_bytes: ULARGE_INTEGER = unsafe { std::mem::zeroed() };
    let mut total_free_bytes: ULARGE_INTEGER = unsafe { std::mem::zeroed() };

    let wide_path: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    let success = unsafe {
        GetDiskFreeSpaceExW(
            wide_path.as_ptr(),
            &mut free_bytes_available,
            &mut total_bytes,
            &mut total_free_bytes,
        )
    };
    if success == 0 {
        return Err(volume_error(path, io::Error::last_os_error()));
    }

    Ok(VolumeStats {
        capacity_bytes: unsafe { *total_bytes.QuadPart() },
        free_bytes: unsafe { *total_free_bytes.QuadPart() },
    })
}

/// Capacity and free space of the volume hosting `path`.
#[cfg(unix)]
pub fn volume_stats(path: &Path) -> Result<VolumeStats, AnalyzerError> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        volume_error(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"),
        )
    })?;

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if ret != 0 {
        return Err(volume_error(path, io::Error::last_os_error()));
    }

    // f_frsize is the fragment size the block counts are expressed in
    let block_size = stat.f_frsize as u64;
    Ok(VolumeStats {
        capacity_bytes: stat.f_blocks as u64 * block_size,
        free_bytes: stat.f_bfree as u64 * block_size,
    })
}

#[cfg(not(any(unix, windows)))]
pub fn volume_stats(path: &Path) -> Result<VolumeStats, AnalyzerError> {
    Err(AnalyzerError::Volume(
        path.display().to_string(),
        "volume statistics are not supported on this platform".to_string(),
    ))
}

fn volume_error(path: &Path, err: io::Error) -> AnalyzerError {
    AnalyzerError::Volume(path.display().to_string(), err.to_string())
}

/// Emits the volume section of a report. A failed query degrades to a
/// diagnostic line instead of aborting the rest of the report.
pub fn write_volume_info(out: &mut dyn Write, path: &Path) -> io::Result<()> {
    writeln!(out, "Disk Usage Information for '{}':", path.display())?;
    match volume_stats(path) {
        Ok(stats) => {
            writeln!(out, "Total space: {}", format_size(stats.capacity_bytes))?;
            writeln!(out, "Used space:  {}", format_size(stats.used_bytes()))?;
            writeln!(
                out,
                "Free space:  {} ({:.2}%)",
                format_size(stats.free_bytes),
                stats.free_percent()
            )?;
        }
        Err(err) => writeln!(out, "Error retrieving disk information: {}", err)?,
    }
    Ok(())
}
