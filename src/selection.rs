//! Which projects the dashboard shows, as remembered by the `projects` cookie.

use crate::jira::Project;

/// Ordered set of project keys chosen by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<String>,
}

impl Selection {
    /// Parses the comma-joined cookie value. Empty segments are ignored.
    pub fn from_cookie_value(value: &str) -> Self {
        Self::from_keys(value.split(','))
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for key in keys {
            let key = key.as_ref().trim();
            if !key.is_empty() && !selection.contains(key) {
                selection.keys.push(key.to_string());
            }
        }
        selection
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|selected| selected == key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn to_cookie_value(&self) -> String {
        self.keys.join(",")
    }

    /// Projects whose key is selected, in the order of `projects`.
    pub fn filter<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects
            .iter()
            .filter(|project| self.contains(&project.key))
            .collect()
    }
}
