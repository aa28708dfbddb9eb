use std::fmt;

use crate::errors::CorruptRecord;

/// The kind of payload a [`LogEntry`](crate::LogEntry) carries.
///
/// Persisted as a single byte, see [`LogValueType::as_u8`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogValueType {
    /// An application command, consumed by the state machine.
    #[default]
    Application,

    /// A cluster configuration change.
    Configuration,

    /// A cluster server description, used when adding or removing a member.
    ClusterServer,

    /// A packed range of log entries, used to fast-forward a replica.
    LogPack,
}

impl LogValueType {
    pub fn as_u8(&self) -> u8 {
        match self {
            LogValueType::Application => 1,
            LogValueType::Configuration => 2,
            LogValueType::ClusterServer => 3,
            LogValueType::LogPack => 4,
        }
    }
}

impl TryFrom<u8> for LogValueType {
    type Error = CorruptRecord;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let typ = match value {
            1 => LogValueType::Application,
            2 => LogValueType::Configuration,
            3 => LogValueType::ClusterServer,
            4 => LogValueType::LogPack,
            _ => {
                return Err(CorruptRecord::new(format!(
                    "invalid log value type: {}",
                    value
                )));
            }
        };
        Ok(typ)
    }
}

impl fmt::Display for LogValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::LogValueType;
    use crate::errors::CorruptRecord;

    #[test]
    fn test_value_type_from_u8() {
        for typ in [
            LogValueType::Application,
            LogValueType::Configuration,
            LogValueType::ClusterServer,
            LogValueType::LogPack,
        ] {
            assert_eq!(Ok(typ), LogValueType::try_from(typ.as_u8()));
        }

        assert_eq!(
            Err(CorruptRecord::new("invalid log value type: 0")),
            LogValueType::try_from(0)
        );
        assert_eq!(
            Err(CorruptRecord::new("invalid log value type: 5")),
            LogValueType::try_from(5)
        );
    }
}
