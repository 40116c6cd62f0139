use std::fmt;

/// Bar interval of a chart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    OneMinute,
    OneDay,
}

/// Renders the `interval` query value.
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Interval::OneMinute => "1m",
            Interval::OneDay => "1d",
        })
    }
}
