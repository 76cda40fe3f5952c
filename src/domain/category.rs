use serde::{Deserialize, Serialize};

/// Closed set of expense categories. Adding a category is a deliberate
/// schema change, not a runtime string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Entertainment,
    Travel,
}

impl Category {
    /// The full enumerated set, in display order.
    pub const ALL: [Category; 3] = [Category::Food, Category::Entertainment, Category::Travel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Entertainment => "entertainment",
            Category::Travel => "travel",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "food" => Some(Category::Food),
            "entertainment" => Some(Category::Entertainment),
            "travel" => Some(Category::Travel),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_str(s).ok_or_else(|| {
            format!(
                "unrecognized category '{}' (valid: food, entertainment, travel)",
                s
            )
        })
    }
}
