use serde::{Deserialize, Serialize};

/// Physical menu a category belongs to. Each category carries exactly one
/// of these tags; storage folders are organized under the same names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuSection {
    Taverna,
    Bar,
    Sushi,
}

pub const MENU_SECTIONS: [MenuSection; 3] =
    [MenuSection::Taverna, MenuSection::Bar, MenuSection::Sushi];

impl MenuSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuSection::Taverna => "taverna",
            MenuSection::Bar => "bar",
            MenuSection::Sushi => "sushi",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "taverna" => Some(MenuSection::Taverna),
            "bar" => Some(MenuSection::Bar),
            "sushi" => Some(MenuSection::Sushi),
            _ => None,
        }
    }
}

impl std::fmt::Display for MenuSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for section in MENU_SECTIONS {
            assert_eq!(MenuSection::parse(section.as_str()), Some(section));
        }
        assert_eq!(MenuSection::parse("terrace"), None);
    }
}
