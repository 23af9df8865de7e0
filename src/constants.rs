use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const OK: u8 = 0;
pub const WARNING: u8 = 1;
pub const CRITICAL: u8 = 2;
pub const UNKNOWN: u8 = 3;

/// Service check status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Ok, Status::Warning, Status::Critical, Status::Unknown];

    pub fn code(self) -> u8 {
        match self {
            Status::Ok => OK,
            Status::Warning => WARNING,
            Status::Critical => CRITICAL,
            Status::Unknown => UNKNOWN,
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            OK => Ok(Status::Ok),
            WARNING => Ok(Status::Warning),
            CRITICAL => Ok(Status::Critical),
            UNKNOWN => Ok(Status::Unknown),
            other => Err(format!("invalid service check status: {other}")),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::Warning => write!(f, "warning"),
            Status::Critical => write!(f, "critical"),
            Status::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::Warning.code(), 1);
        assert_eq!(Status::Critical.code(), 2);
        assert_eq!(Status::Unknown.code(), 3);
    }

    #[test]
    fn test_status_round_trips_through_code() {
        for status in Status::ALL {
            assert_eq!(Status::try_from(status.code()), Ok(status));
        }
        assert!(Status::try_from(4).is_err());
    }

    #[test]
    fn test_status_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Status::Critical).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Status>("1").unwrap(), Status::Warning);
    }
}
