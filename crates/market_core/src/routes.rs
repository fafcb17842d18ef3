/// The three top-level views behind the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Map,
    Calendar,
    List,
}

impl Route {
    pub const ALL: [Self; 3] = [Self::Map, Self::Calendar, Self::List];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Map => "/",
            Self::Calendar => "/calendar",
            Self::List => "/markets",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Calendar => "Calendar",
            Self::List => "Markets",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Map => 0,
            Self::Calendar => 1,
            Self::List => 2,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Map),
            1 => Some(Self::Calendar),
            2 => Some(Self::List),
            _ => None,
        }
    }

    /// Resolves a location path. Unknown paths land on the map.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "/calendar" | "calendar" => Self::Calendar,
            "/markets" | "markets" => Self::List,
            _ => Self::Map,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Map => Self::Calendar,
            Self::Calendar => Self::List,
            Self::List => Self::Map,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Map => Self::List,
            Self::Calendar => Self::Map,
            Self::List => Self::Calendar,
        }
    }
}
