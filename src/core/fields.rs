use serde::{Deserialize, Serialize};

/// Column names the dashboard reads from every dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFields {
    #[serde(default = "default_date_field")]
    pub date: String,
    #[serde(default = "default_value_field")]
    pub value: String,
    #[serde(default = "default_category_field")]
    pub category: String,
}

impl Default for DatasetFields {
    fn default() -> Self {
        Self {
            date: default_date_field(),
            value: default_value_field(),
            category: default_category_field(),
        }
    }
}

impl DatasetFields {
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        value: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            value: value.into(),
            category: category.into(),
        }
    }

    #[must_use]
    pub fn names(&self) -> [&str; 3] {
        [&self.date, &self.value, &self.category]
    }
}

fn default_date_field() -> String {
    "date".to_owned()
}

fn default_value_field() -> String {
    "value".to_owned()
}

fn default_category_field() -> String {
    "category".to_owned()
}
