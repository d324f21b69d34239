//! Outbound C-Gate command construction.

use crate::protocol::address::Address;

/// A command heading for the C-Gate command port.
///
/// Rendering produces the wire line without its terminating newline;
/// the line codec appends that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Enable unsolicited event reporting for this session.
    EnableEvents,
    /// Switch a point fully on.
    TurnOn(Address),
    /// Switch a point fully off.
    TurnOff(Address),
    /// Ramp a point to a target level, optionally over a fade time.
    Ramp {
        address: Address,
        level: u8,
        fade: Option<String>,
    },
    /// Query one point's current level.
    GetLevel(Address),
    /// Query every group level under one application.
    GetAllLevels { network: u8, application: u8 },
    /// Request a network's object tree as XML.
    GetTree { network: u8 },
}

impl Request {
    /// Render the wire line for the given project.
    pub fn render(&self, project: &str) -> String {
        match self {
            Request::EnableEvents => "EVENT ON".to_string(),
            Request::TurnOn(address) => format!("ON {}", address.project_path(project)),
            Request::TurnOff(address) => format!("OFF {}", address.project_path(project)),
            Request::Ramp { address, level, fade } => match fade {
                Some(fade) => format!("RAMP {} {} {}", address.project_path(project), level, fade),
                None => format!("RAMP {} {}", address.project_path(project), level),
            },
            Request::GetLevel(address) => format!("GET {} level", address.project_path(project)),
            Request::GetAllLevels { network, application } => {
                format!("GET //{}/{}/{}/* level", project, network, application)
            }
            Request::GetTree { network } => format!("TREEXML {}", network),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Address {
        Address::new(254, 56, 4)
    }

    #[test]
    fn test_render_enable_events() {
        assert_eq!(Request::EnableEvents.render("HOME"), "EVENT ON");
    }

    #[test]
    fn test_render_switch() {
        assert_eq!(Request::TurnOn(point()).render("HOME"), "ON //HOME/254/56/4");
        assert_eq!(Request::TurnOff(point()).render("HOME"), "OFF //HOME/254/56/4");
    }

    #[test]
    fn test_render_ramp() {
        let plain = Request::Ramp {
            address: point(),
            level: 128,
            fade: None,
        };
        assert_eq!(plain.render("HOME"), "RAMP //HOME/254/56/4 128");

        let fading = Request::Ramp {
            address: point(),
            level: 255,
            fade: Some("4s".to_string()),
        };
        assert_eq!(fading.render("HOME"), "RAMP //HOME/254/56/4 255 4s");
    }

    #[test]
    fn test_render_queries() {
        assert_eq!(
            Request::GetLevel(point()).render("HOME"),
            "GET //HOME/254/56/4 level"
        );
        assert_eq!(
            Request::GetAllLevels {
                network: 254,
                application: 56
            }
            .render("HOME"),
            "GET //HOME/254/56/* level"
        );
        assert_eq!(Request::GetTree { network: 254 }.render("HOME"), "TREEXML 254");
    }

    #[test]
    fn test_render_uses_project_name() {
        assert_eq!(Request::TurnOn(point()).render("OFFICE"), "ON //OFFICE/254/56/4");
    }
}
