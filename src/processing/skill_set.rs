//! Case-insensitive, order-preserving skill collections

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Ordered skills, unique by lowercase key. The first spelling seen is the
/// one kept for display.
#[derive(Debug, Clone, Default)]
pub struct SkillSet {
    skills: Vec<String>,
    keys: HashSet<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(skill: &str) -> String {
        skill.trim().to_lowercase()
    }

    /// Insert a skill, returning false if it was empty or already present.
    pub fn insert(&mut self, skill: &str) -> bool {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self.keys.insert(Self::key(trimmed)) {
            self.skills.push(trimmed.to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.keys.contains(&Self::key(skill))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.skills
    }

    /// Entries of `self` followed by the entries of `other` not already present.
    pub fn union(&self, other: &SkillSet) -> SkillSet {
        let mut merged = self.clone();
        merged.extend(other.iter());
        merged
    }

    /// Entries of `self` that `other` also contains, in `self`'s order.
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.iter().filter(|skill| other.contains(skill)).collect()
    }

    /// Entries of `self` that `other` lacks, in `self`'s order.
    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.iter().filter(|skill| !other.contains(skill)).collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.skills
    }
}

/// Case-insensitive de-duplication keeping first-seen casing and order.
pub fn normalize<I, S>(skills: I) -> SkillSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills.into_iter().collect()
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.skills == other.skills
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for SkillSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for skill in iter {
            self.insert(skill.as_ref());
        }
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.skills.iter()
    }
}

impl fmt::Display for SkillSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.skills.join(", "))
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.skills.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let skills = Vec::<String>::deserialize(deserializer)?;
        Ok(normalize(skills))
    }
}
