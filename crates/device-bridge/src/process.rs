//! Process Resolution
//!
//! Maps a package name to its live pid via the device's process listing.

use crate::adb::{AdbClient, AdbError};

/// Resolves the pid currently owned by a package on one device.
///
/// An app that is not running is a normal result, not an error; resolution
/// is a side-effect-free read and safe to repeat at any frequency.
#[derive(Debug, Clone)]
pub struct ProcessResolver {
    adb: AdbClient,
    serial: String,
    package: String,
}

impl ProcessResolver {
    pub fn new(adb: AdbClient, serial: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            adb,
            serial: serial.into(),
            package: package.into(),
        }
    }

    /// The package this resolver is bound to
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Query the device process list for the package's main process.
    ///
    /// `Err` means the device could not be queried at all; `Ok(None)` means
    /// the package has no live process right now.
    pub async fn resolve(&self) -> Result<Option<u32>, AdbError> {
        let output = self.adb.shell(&self.serial, "ps -A").await?;
        Ok(find_process(&output, &self.package))
    }
}

/// Find the pid whose NAME column equals `package` in `ps` output.
///
/// The PID column index is taken from the header row so reordered columns
/// still parse. Secondary processes (`package:service`) do not match; only
/// the main process carries the bare package name.
fn find_process(ps_output: &str, package: &str) -> Option<u32> {
    let mut lines = ps_output.lines();
    let header = lines.next()?;
    let pid_col = header
        .split_whitespace()
        .position(|col| col.eq_ignore_ascii_case("pid"))
        .unwrap_or(1);

    for line in lines {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.last() == Some(&package) {
            if let Some(pid) = cols.get(pid_col).and_then(|c| c.parse().ok()) {
                return Some(pid);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS_OUTPUT: &str = "\
USER           PID  PPID     VSZ    RSS WCHAN            ADDR S NAME
root             1     0 10800648  5860 0                   0 S init
u0_a154       8241   905 13621416 91104 0                   0 S com.example.demo
u0_a154       8311   905 13572112 58720 0                   0 S com.example.demo:pushservice
u0_a91        9120   905 13331244 44812 0                   0 S com.android.vending
";

    #[test]
    fn finds_main_process_pid() {
        assert_eq!(find_process(PS_OUTPUT, "com.example.demo"), Some(8241));
    }

    #[test]
    fn unknown_package_is_none() {
        assert_eq!(find_process(PS_OUTPUT, "com.example.missing"), None);
    }

    #[test]
    fn matches_service_process_only_when_asked() {
        assert_eq!(
            find_process(PS_OUTPUT, "com.example.demo:pushservice"),
            Some(8311)
        );
    }

    #[test]
    fn locates_pid_column_from_header() {
        let reordered = "\
PID USER NAME
77 root com.example.demo
";
        assert_eq!(find_process(reordered, "com.example.demo"), Some(77));
    }

    #[test]
    fn empty_output_is_none() {
        assert_eq!(find_process("", "com.example.demo"), None);
        assert_eq!(find_process("USER PID NAME\n", "com.example.demo"), None);
    }
}
