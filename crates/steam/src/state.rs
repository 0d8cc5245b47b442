//! Per-app install state bitmask as recorded in `StateFlags` of an ACF manifest.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Steam's `StateFlags` bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateFlags(u32);

impl StateFlags {
    pub const UNINSTALLED: Self = Self(1 << 0);
    pub const UPDATE_REQUIRED: Self = Self(1 << 1);
    pub const FULLY_INSTALLED: Self = Self(1 << 2);
    pub const ENCRYPTED: Self = Self(1 << 3);
    pub const LOCKED: Self = Self(1 << 4);
    pub const FILES_MISSING: Self = Self(1 << 5);
    pub const APP_RUNNING: Self = Self(1 << 6);
    pub const FILES_CORRUPT: Self = Self(1 << 7);
    pub const UPDATE_RUNNING: Self = Self(1 << 8);
    pub const UPDATE_PAUSED: Self = Self(1 << 9);
    pub const UPDATE_STARTED: Self = Self(1 << 10);
    pub const UNINSTALLING: Self = Self(1 << 11);
    pub const BACKUP_RUNNING: Self = Self(1 << 12);
    pub const RECONFIGURING: Self = Self(1 << 16);
    pub const VALIDATING: Self = Self(1 << 17);
    pub const ADDING_FILES: Self = Self(1 << 18);
    pub const PREALLOCATING: Self = Self(1 << 19);
    pub const DOWNLOADING: Self = Self(1 << 20);
    pub const STAGING: Self = Self(1 << 21);
    pub const COMMITTING: Self = Self(1 << 22);
    pub const UPDATE_STOPPING: Self = Self(1 << 23);

    /// Any of these disqualifies an app that is otherwise fully installed.
    const NOT_PLAYABLE: u32 = Self::UNINSTALLED.0
        | Self::FILES_MISSING.0
        | Self::FILES_CORRUPT.0
        | Self::UPDATE_RUNNING.0
        | Self::DOWNLOADING.0
        | Self::UNINSTALLING.0;

    const NAMES: &'static [(StateFlags, &'static str)] = &[
        (Self::UNINSTALLED, "Uninstalled"),
        (Self::UPDATE_REQUIRED, "UpdateRequired"),
        (Self::FULLY_INSTALLED, "FullyInstalled"),
        (Self::ENCRYPTED, "Encrypted"),
        (Self::LOCKED, "Locked"),
        (Self::FILES_MISSING, "FilesMissing"),
        (Self::APP_RUNNING, "AppRunning"),
        (Self::FILES_CORRUPT, "FilesCorrupt"),
        (Self::UPDATE_RUNNING, "UpdateRunning"),
        (Self::UPDATE_PAUSED, "UpdatePaused"),
        (Self::UPDATE_STARTED, "UpdateStarted"),
        (Self::UNINSTALLING, "Uninstalling"),
        (Self::BACKUP_RUNNING, "BackupRunning"),
        (Self::RECONFIGURING, "Reconfiguring"),
        (Self::VALIDATING, "Validating"),
        (Self::ADDING_FILES, "AddingFiles"),
        (Self::PREALLOCATING, "Preallocating"),
        (Self::DOWNLOADING, "Downloading"),
        (Self::STAGING, "Staging"),
        (Self::COMMITTING, "Committing"),
        (Self::UPDATE_STOPPING, "UpdateStopping"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Fully installed and not uninstalled, missing files, corrupt, updating,
    /// downloading, or uninstalling.
    pub const fn is_valid_install(self) -> bool {
        self.0 & Self::FULLY_INSTALLED.0 != 0 && self.0 & Self::NOT_PLAYABLE == 0
    }
}

impl BitOr for StateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("None");
        }

        let mut remaining = self.0;
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(*flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                remaining &= !flag.0;
                first = false;
            }
        }
        if remaining != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{remaining:#x}")?;
        }
        Ok(())
    }
}
