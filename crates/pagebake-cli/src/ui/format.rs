//! Sizes, durations and the build summary table.

use console::Term;
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

use super::colors_enabled;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;

/// Byte count as shown in the build summary.
///
/// ```
/// use pagebake_cli::ui::format_size;
///
/// assert_eq!(format_size(812), "812 B");
/// assert_eq!(format_size(4_300), "4.2 KiB");
/// assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
/// ```
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b < KIB => format!("{b} B"),
        b if b < MIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{:.1} MiB", b as f64 / MIB as f64),
    }
}

/// Elapsed time: milliseconds under a second, seconds above.
///
/// ```
/// use std::time::Duration;
/// use pagebake_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(84)), "84ms");
/// assert_eq!(format_duration(Duration::from_millis(2_250)), "2.25s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    match duration.as_millis() {
        ms if ms < 1000 => format!("{ms}ms"),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}

/// `path` relative to `root` when it lies inside it.
pub fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Print each written file with its size, right-aligned, then the total.
pub fn print_build_summary(entries: &[(String, u64)], duration: Duration) {
    let name_width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let line_width = (name_width + 16).min(Term::stderr().size().1 as usize);
    let divider = "─".repeat(line_width);
    let total: u64 = entries.iter().map(|(_, size)| size).sum();

    eprintln!();
    for (name, size) in entries {
        let size = format!("{:>10}", format_size(*size));
        if colors_enabled() {
            eprintln!("  {:<name_width$}  {}", name.cyan(), size.dimmed());
        } else {
            eprintln!("  {name:<name_width$}  {size}");
        }
    }
    eprintln!("{divider}");

    let total = format!(
        "{} file(s), {} in {}",
        entries.len(),
        format_size(total),
        format_duration(duration)
    );
    if colors_enabled() {
        eprintln!("  {}", total.bold());
    } else {
        eprintln!("  {total}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_boundaries() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(MIB - 1), "1024.0 KiB");
        assert_eq!(format_size(MIB + MIB / 2), "1.5 MiB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_secs(3)), "3.00s");
    }

    #[test]
    fn test_relative() {
        let root = Path::new("/site");
        assert_eq!(relative(Path::new("/site/dist/index.html"), root), Path::new("dist/index.html"));
        assert_eq!(relative(Path::new("/other/x.js"), root), Path::new("/other/x.js"));
    }
}
