use std::fmt;
use std::str::FromStr;

use chromiumoxide::handler::viewport::Viewport;
use rand::prelude::IndexedRandom;

/// Desktop user-agent candidates. One is picked uniformly at random per
/// session so consecutive runs don't share a fixed fingerprint.
const DESKTOP_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
];

const TABLET_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; SM-T870) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
];

/// Emulated device class for a browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceProfile {
    #[default]
    Desktop,
    Tablet,
}

impl DeviceProfile {
    pub fn window_size(&self) -> (u32, u32) {
        match self {
            DeviceProfile::Desktop => (1920, 1080),
            DeviceProfile::Tablet => (1024, 768),
        }
    }

    pub fn pick_user_agent(&self) -> &'static str {
        let pool = match self {
            DeviceProfile::Desktop => DESKTOP_USER_AGENTS,
            DeviceProfile::Tablet => TABLET_USER_AGENTS,
        };
        pool.choose(&mut rand::rng()).copied().unwrap_or(pool[0])
    }

    /// Viewport passed to the CDP handler. The tablet profile enables mobile
    /// emulation with multi-touch metrics.
    pub fn viewport(&self) -> Viewport {
        let (width, height) = self.window_size();
        match self {
            DeviceProfile::Desktop => Viewport {
                width,
                height,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            },
            DeviceProfile::Tablet => Viewport {
                width,
                height,
                device_scale_factor: Some(2.0),
                emulating_mobile: true,
                is_landscape: true,
                has_touch: true,
            },
        }
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceProfile::Desktop => write!(f, "desktop"),
            DeviceProfile::Tablet => write!(f, "tablet"),
        }
    }
}

impl FromStr for DeviceProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(DeviceProfile::Desktop),
            "tablet" => Ok(DeviceProfile::Tablet),
            other => Err(format!("unknown device profile: {other}")),
        }
    }
}
