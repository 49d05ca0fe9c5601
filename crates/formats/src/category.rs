use foundation::color::Rgb;

/// Name of the synthetic catch-all category.
pub const OTHER_CATEGORY: &str = "Other";

/// Join key for category and feature names: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub abbreviation: String,
    pub color: Rgb,
}

impl Category {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            color,
        }
    }
}

/// Closed, ordered set of categories.
///
/// Lookups are total: any name outside the set resolves to the designated
/// "Other" entry, so color and abbreviation queries never fail.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDimension {
    members: Vec<Category>,
    other: Category,
}

impl CategoryDimension {
    pub fn new(members: Vec<Category>, other: Category) -> Self {
        Self { members, other }
    }

    /// Canadian provinces and territories in east-to-west display order.
    pub fn canadian_provinces() -> Self {
        const PROVINCES: [(&str, &str, Rgb); 13] = [
            ("Newfoundland and Labrador", "NL", Rgb::new(0xfb, 0xc0, 0x2d)),
            ("Prince Edward Island", "PE", Rgb::new(0x45, 0x27, 0xa0)),
            ("Nova Scotia", "NS", Rgb::new(0x7b, 0x1f, 0xa2)),
            ("New Brunswick", "NB", Rgb::new(0x2e, 0x7d, 0x32)),
            ("Quebec", "QC", Rgb::new(0x00, 0x33, 0x66)),
            ("Ontario", "ON", Rgb::new(0x80, 0x00, 0x80)),
            ("Manitoba", "MB", Rgb::new(0xff, 0x8c, 0x00)),
            ("Saskatchewan", "SK", Rgb::new(0xb2, 0x22, 0x22)),
            ("Alberta", "AB", Rgb::new(0x00, 0x80, 0x80)),
            ("British Columbia", "BC", Rgb::new(0x00, 0x66, 0xcc)),
            ("Yukon", "YT", Rgb::new(0xd8, 0x1b, 0x60)),
            ("Northwest Territories", "NT", Rgb::new(0x00, 0x4d, 0x40)),
            ("Nunavut", "NU", Rgb::new(0xec, 0x40, 0x7a)),
        ];
        let members = PROVINCES
            .iter()
            .map(|(name, abbr, color)| Category::new(*name, *abbr, *color))
            .collect();
        Self::new(
            members,
            Category::new(OTHER_CATEGORY, "OT", Rgb::new(0x7f, 0x7f, 0x7f)),
        )
    }

    pub fn members(&self) -> &[Category] {
        &self.members
    }

    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn other(&self) -> &Category {
        &self.other
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        let key = normalize_name(name);
        self.members
            .iter()
            .position(|c| normalize_name(&c.name) == key)
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.members.get(index)
    }

    pub fn resolve(&self, name: &str) -> &Category {
        self.index_of(name)
            .and_then(|i| self.members.get(i))
            .unwrap_or(&self.other)
    }

    pub fn color(&self, name: &str) -> Rgb {
        self.resolve(name).color
    }

    pub fn abbreviation(&self, name: &str) -> &str {
        &self.resolve(name).abbreviation
    }
}
