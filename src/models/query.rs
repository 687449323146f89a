use std::fmt;
use std::str::FromStr;

/// Server-side sort key for the process list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Cpu,
    Mem,
    Pid,
    Name,
}

impl SortField {
    /// Value of the `sort` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::Cpu => "cpu",
            SortField::Mem => "mem",
            SortField::Pid => "pid",
            SortField::Name => "name",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SortField::Cpu => SortField::Mem,
            SortField::Mem => SortField::Pid,
            SortField::Pid => SortField::Name,
            SortField::Name => SortField::Cpu,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(SortField::Cpu),
            "mem" | "memory" => Ok(SortField::Mem),
            "pid" => Ok(SortField::Pid),
            "name" => Ok(SortField::Name),
            other => Err(format!("unknown sort field '{}' (cpu, mem, pid, name)", other)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Value of the `order` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Arrow shown next to the sorted column header.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Asc => " ▲",
            SortOrder::Desc => " ▼",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}' (asc, desc)", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Everything a read request is built from, captured from the input
/// controls at the instant the request is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub filter: String,
    pub sort: SortField,
    pub order: SortOrder,
    pub token: String,
}

impl QueryState {
    /// Query string pairs in the order the server documents them.
    /// The filter is trimmed; the server lowercases it itself.
    pub fn params(&self) -> [(&'static str, String); 3] {
        [
            ("q", self.filter.trim().to_string()),
            ("sort", self.sort.as_param().to_string()),
            ("order", self.order.as_param().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_cycles_through_all() {
        let mut f = SortField::Cpu;
        let mut seen = vec![f];
        for _ in 0..3 {
            f = f.next();
            seen.push(f);
        }
        assert_eq!(seen, vec![SortField::Cpu, SortField::Mem, SortField::Pid, SortField::Name]);
        assert_eq!(f.next(), SortField::Cpu);
    }

    #[test]
    fn sort_field_parses_aliases() {
        assert_eq!("MEM".parse::<SortField>(), Ok(SortField::Mem));
        assert_eq!("memory".parse::<SortField>(), Ok(SortField::Mem));
        assert!("disk".parse::<SortField>().is_err());
    }

    #[test]
    fn sort_order_toggles() {
        assert_eq!(SortOrder::Desc.toggled(), SortOrder::Asc);
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
        assert_eq!(" desc ".parse::<SortOrder>(), Ok(SortOrder::Desc));
    }

    #[test]
    fn params_trim_filter() {
        let q = QueryState {
            filter: "  nginx ".to_string(),
            sort: SortField::Name,
            order: SortOrder::Asc,
            token: "secret".to_string(),
        };
        let params = q.params();
        assert_eq!(params[0], ("q", "nginx".to_string()));
        assert_eq!(params[1], ("sort", "name".to_string()));
        assert_eq!(params[2], ("order", "asc".to_string()));
    }
}
