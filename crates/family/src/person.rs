use chrono::{Datelike, NaiveDate, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a person within a [`FamilyGraph`] registry.
///
/// Relation fields never own other records; they refer to them by id.
///
/// [`FamilyGraph`]: crate::FamilyGraph
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    From,
    Display,
)]
pub struct PersonId(pub u64);

/// Which parent slot a person occupies in a parent-child relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentRole {
    Father,
    Mother,
}

impl fmt::Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRole::Father => write!(f, "father"),
            ParentRole::Mother => write!(f, "mother"),
        }
    }
}

/// A member of the family graph.
///
/// Identity and attribute data are fixed at construction. Relation fields
/// are only mutated through [`FamilyGraph`] operations, which keep both
/// directions of every link in sync.
///
/// [`FamilyGraph`]: crate::FamilyGraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    name: String,
    birth_date: NaiveDate,
    alive: bool,
    age_at_death: Option<u32>,
    photo: Option<String>,
    latitude: f64,
    longitude: f64,
    pub(crate) father: Option<PersonId>,
    pub(crate) mother: Option<PersonId>,
    pub(crate) spouse: Option<PersonId>,
    pub(crate) children: Vec<PersonId>,
    pub(crate) siblings: Vec<PersonId>,
}

impl Person {
    /// Create a person with no relations.
    ///
    /// `age_at_death` is only meaningful for deceased persons; for the
    /// living, [`Person::age`] derives the age from the birth date.
    pub fn new(
        id: PersonId,
        name: impl Into<String>,
        birth_date: NaiveDate,
        alive: bool,
        age_at_death: Option<u32>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            birth_date,
            alive,
            age_at_death,
            photo: None,
            latitude: 0.0,
            longitude: 0.0,
            father: None,
            mother: None,
            spouse: None,
            children: Vec::new(),
            siblings: Vec::new(),
        }
    }

    /// Attach an opaque photo reference (a path or URL; never loaded here).
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Set the residence coordinates consumed by the geographic collaborator.
    pub fn with_residence(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current age for the living, recorded age at death otherwise.
    pub fn age(&self) -> Option<u32> {
        if self.alive {
            Some(self.age_on(Utc::now().date_naive()))
        } else {
            self.age_at_death
        }
    }

    pub(crate) fn age_on(&self, today: NaiveDate) -> u32 {
        let mut years = today.year() - self.birth_date.year();
        let birthday_passed =
            (today.month(), today.day()) >= (self.birth_date.month(), self.birth_date.day());
        if !birthday_passed {
            years -= 1;
        }
        years.max(0) as u32
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn father(&self) -> Option<PersonId> {
        self.father
    }

    pub fn mother(&self) -> Option<PersonId> {
        self.mother
    }

    pub fn spouse(&self) -> Option<PersonId> {
        self.spouse
    }

    /// Children in assignment order, without duplicates.
    pub fn children(&self) -> &[PersonId] {
        &self.children
    }

    /// Siblings; membership is symmetric across the graph.
    pub fn siblings(&self) -> &[PersonId] {
        &self.siblings
    }

    /// Every person directly linked to this one, deduplicated.
    ///
    /// This is the undirected neighbor set used by the deletion safety
    /// check: father, mother, spouse, children and siblings.
    pub fn relatives(&self) -> Vec<PersonId> {
        let mut out = Vec::new();
        let mut push = |id: Option<PersonId>| {
            if let Some(id) = id {
                if !out.contains(&id) {
                    out.push(id);
                }
            }
        };
        push(self.father);
        push(self.mother);
        push(self.spouse);
        for &c in &self.children {
            push(Some(c));
        }
        for &s in &self.siblings {
            push(Some(s));
        }
        out
    }
}
