use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Noop,
    NextMonth,
    PrevMonth,
    NextYear,
    PrevYear,
    NextDay,
    PrevDay,
    Select,
    Today,
    Exit,
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cmd::Noop => "noop",
            Cmd::NextMonth => "next month",
            Cmd::PrevMonth => "previous month",
            Cmd::NextYear => "next year",
            Cmd::PrevYear => "previous year",
            Cmd::NextDay => "next day",
            Cmd::PrevDay => "previous day",
            Cmd::Select => "select day",
            Cmd::Today => "today",
            Cmd::Exit => "quit",
        };
        write!(f, "{}", name)
    }
}
