use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[builder(setter(into))]
    pub address: String,
    #[builder(setter(into))]
    pub city: String,
    #[builder(default, setter(into))]
    pub state: String,
    #[builder(setter(into))]
    pub country: String,
    #[builder(default, setter(into))]
    pub postal_code: String,
}

/// Reference data; changes rarely, so it is cached with long TTLs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct Venue {
    #[builder(default = Uuid::now_v7())]
    pub id: Uuid,
    #[builder(setter(into))]
    pub name: String,
    pub location: Location,
    #[builder(default, setter(into))]
    pub description: String,
    #[builder(default)]
    pub capacity: i32,
    #[builder(default)]
    pub amenities: Vec<String>,
    #[builder(default)]
    pub images: Vec<String>,
}

impl Venue {
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.iter().any(|a| a.eq_ignore_ascii_case(amenity))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewVenue {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NewVenue {
    pub fn into_venue(self, id: Uuid) -> Venue {
        Venue {
            id,
            name: self.name,
            location: self.location,
            description: self.description,
            capacity: self.capacity,
            amenities: self.amenities,
            images: self.images,
        }
    }
}
