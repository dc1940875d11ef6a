// Host memory probe - optional capability, probed once at startup
use crate::domain::metrics::MemoryReading;
use std::path::{Path, PathBuf};

/// Reads the process resident set from the host's procfs. Constructed once;
/// hosts without the capability get no probe and the monitor reports an
/// explicit unavailable reading instead of zero.
#[derive(Debug, Clone)]
pub struct MemoryProbe {
    status_path: PathBuf,
}

impl MemoryProbe {
    pub fn probe() -> Option<Self> {
        Self::probe_path("/proc/self/status")
    }

    fn probe_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.exists() {
            Some(Self {
                status_path: path.to_path_buf(),
            })
        } else {
            None
        }
    }

    /// Current resident set in whole mebibytes. Read failures degrade to
    /// `Unavailable` rather than a fake zero.
    pub fn read(&self) -> MemoryReading {
        match std::fs::read_to_string(&self.status_path) {
            Ok(status) => parse_vm_rss_kib(&status)
                .map(|kib| MemoryReading::Mebibytes(kib / 1024))
                .unwrap_or(MemoryReading::Unavailable),
            Err(_) => MemoryReading::Unavailable,
        }
    }
}

fn parse_vm_rss_kib(status: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vm_rss() {
        let status = "Name:\tpulseboard\nVmPeak:\t  104 kB\nVmRSS:\t   51200 kB\n";
        assert_eq!(parse_vm_rss_kib(status), Some(51_200));
    }

    #[test]
    fn test_parse_missing_field() {
        assert_eq!(parse_vm_rss_kib("Name:\tpulseboard\n"), None);
    }

    #[test]
    fn test_probe_absent_path() {
        assert!(MemoryProbe::probe_path("/nonexistent/status").is_none());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_probe_reads_resident_set() {
        let probe = MemoryProbe::probe().unwrap();
        match probe.read() {
            MemoryReading::Mebibytes(_) => {}
            MemoryReading::Unavailable => panic!("expected a reading on linux"),
        }
    }
}
