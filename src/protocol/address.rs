//! C-Bus point addressing and level arithmetic.
//!
//! Every controllable point on the bus is named by a network,
//! application and group number. C-Gate renders the full object path
//! as `//PROJECT/net/app/group`; bus topics use the bare
//! `net/app/group` form.

use std::fmt;

use crate::common::error::ProtocolError;

/// Step used for relative dimming, about ten percent of full scale.
pub const RAMP_STEP: u8 = 26;

/// One controllable point: network, application and group number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub network: u8,
    pub application: u8,
    pub group: u8,
}

impl Address {
    pub fn new(network: u8, application: u8, group: u8) -> Self {
        Self {
            network,
            application,
            group,
        }
    }

    /// Parse a C-Gate object path of the form `//PROJECT/net/app/group`.
    ///
    /// Trailing segments beyond the group are ignored.
    pub fn from_path(path: &str) -> Result<Self, ProtocolError> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 6 {
            return Err(ProtocolError::BadAddress {
                path: path.to_string(),
            });
        }

        let number = |segment: &str| {
            segment.parse::<u8>().map_err(|_| ProtocolError::BadAddress {
                path: path.to_string(),
            })
        };

        Ok(Self {
            network: number(segments[3])?,
            application: number(segments[4])?,
            group: number(segments[5])?,
        })
    }

    /// Render the full object path for a project.
    pub fn project_path(&self, project: &str) -> String {
        format!("//{}/{}/{}/{}", project, self.network, self.application, self.group)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.network, self.application, self.group)
    }
}

/// Convert a raw bus level (0-255) to a percentage (0-100), rounding
/// to nearest.
pub fn percent_from_level(level: u8) -> u8 {
    ((u32::from(level) * 100 + 127) / 255) as u8
}

/// Convert a percentage string to a raw bus level, rounding to
/// nearest. Non-numeric or out-of-range input yields `None`.
pub fn level_from_percent(percent: &str) -> Option<u8> {
    let percent: u32 = percent.trim().parse().ok()?;
    if percent > 100 {
        return None;
    }
    Some(((percent * 255 + 50) / 100) as u8)
}
