// Read-only hotel and destination catalog
// Stores only ever reference hotels by id; nothing here is mutated after loading

use crate::booking::SearchFilters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub const SAMPLE_CATALOG_PATH: &str = "samples/catalog.json";

const SAMPLE_CATALOG: &str = include_str!("../samples/catalog.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate hotel id: {0}")]
    DuplicateHotel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub location: String,
    // Nightly price
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub rating: f32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Hotel {
    pub fn stars(&self) -> u8 {
        self.rating.clamp(0.0, 5.0).floor() as u8
    }

    pub fn cover_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or_default()
    }

    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities
            .iter()
            .any(|offered| offered.eq_ignore_ascii_case(amenity))
    }

    /// Whether this hotel passes `filters`.
    ///
    /// Guests and dates are not considered since the catalog carries no
    /// availability data.
    pub fn matches(&self, filters: &SearchFilters) -> bool {
        let location = filters.location.trim().to_lowercase();
        if !location.is_empty()
            && !self.location.to_lowercase().contains(&location)
            && !self.name.to_lowercase().contains(&location)
        {
            return false;
        }

        if !filters.price_range.contains(self.price) {
            return false;
        }

        if !filters.star_rating.is_empty() && !filters.star_rating.contains(&self.stars()) {
            return false;
        }

        filters
            .amenities
            .iter()
            .all(|amenity| self.has_amenity(amenity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub image: String,
    pub hotel_count: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    hotels: Vec<Hotel>,
    destinations: Vec<Destination>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    hotels: Vec<Hotel>,
    destinations: Vec<Destination>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(hotels: Vec<Hotel>, destinations: Vec<Destination>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(hotels.len());
        for (position, hotel) in hotels.iter().enumerate() {
            if index.insert(hotel.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateHotel(hotel.id.clone()));
            }
        }

        Ok(Self {
            hotels,
            destinations,
            index,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.hotels, file.destinations)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    // The catalog bundled with the crate
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json(SAMPLE_CATALOG)
    }

    pub fn hotel(&self, id: &str) -> Option<&Hotel> {
        self.index.get(id).map(|&position| &self.hotels[position])
    }

    pub fn hotels(&self) -> &[Hotel] {
        &self.hotels
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn featured(&self, count: usize) -> &[Hotel] {
        &self.hotels[..count.min(self.hotels.len())]
    }

    pub fn search(&self, filters: &SearchFilters) -> Vec<&Hotel> {
        self.hotels
            .iter()
            .filter(|hotel| hotel.matches(filters))
            .collect()
    }

    // Resolves ids in catalog order, skipping ids the catalog does not know
    pub fn resolve<'a, I>(&self, ids: I) -> Vec<&Hotel>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions: Vec<usize> = ids
            .into_iter()
            .filter_map(|id| self.index.get(id).copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions.into_iter().map(|position| &self.hotels[position]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{FiltersUpdate, PriceRange};
    use std::collections::BTreeSet;
    use test_case::test_case;

    fn hotel(id: &str, location: &str, price: f64, rating: f32, amenities: &[&str]) -> Hotel {
        Hotel {
            id: id.to_string(),
            name: format!("Hotel {}", id),
            location: location.to_string(),
            price,
            images: vec![format!("https://img.example.com/{}.jpg", id)],
            rating,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            description: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                hotel("h1", "Kathmandu, Nepal", 12000.0, 4.8, &["WiFi", "Pool", "Spa"]),
                hotel("h2", "Pokhara, Nepal", 3500.0, 3.9, &["WiFi", "Parking"]),
                hotel("h3", "Chitwan, Nepal", 8000.0, 4.2, &["Pool", "Restaurant"]),
            ],
            vec![],
        )
        .unwrap()
    }

    fn filters(update: FiltersUpdate) -> SearchFilters {
        let mut filters = SearchFilters::default();
        update.apply_to(&mut filters);
        filters
    }

    #[test_case(FiltersUpdate::default(), vec!["h1", "h2", "h3"]; "#1 default filters match all")]
    #[test_case(FiltersUpdate::default().location("pokhara"), vec!["h2"]; "#2 location is case insensitive")]
    #[test_case(FiltersUpdate::default().location("Hotel h3"), vec!["h3"]; "#3 location matches name")]
    #[test_case(FiltersUpdate::default().price_range(3000.0, 8000.0), vec!["h2", "h3"]; "#4 price range inclusive")]
    #[test_case(FiltersUpdate::default().star_rating([4]), vec!["h1", "h3"]; "#5 stars use floor of rating")]
    #[test_case(FiltersUpdate::default().amenities(["wifi", "POOL"]), vec!["h1"]; "#6 all amenities required")]
    #[test_case(FiltersUpdate::default().location("Nepal").star_rating([3, 4]).price_range(0.0, 5000.0), vec!["h2"]; "#7 combined filters")]
    fn test_search(update: FiltersUpdate, expected: Vec<&str>) {
        let catalog = catalog();
        let found: Vec<&str> = catalog
            .search(&filters(update))
            .into_iter()
            .map(|h| h.id.as_str())
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_guests_and_dates_do_not_filter() {
        let catalog = catalog();
        let filters = SearchFilters {
            guests: 12,
            check_in: "2024-06-01".to_string(),
            check_out: "2024-06-02".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(catalog.search(&filters).len(), 3);
    }

    #[test]
    fn test_inverted_price_range_matches_nothing() {
        let catalog = catalog();
        let filters = SearchFilters {
            price_range: PriceRange(9000.0, 1000.0),
            star_rating: BTreeSet::new(),
            ..SearchFilters::default()
        };
        assert!(catalog.search(&filters).is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(
            vec![
                hotel("h1", "Kathmandu", 1.0, 3.0, &[]),
                hotel("h1", "Pokhara", 2.0, 4.0, &[]),
            ],
            vec![],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateHotel(id)) if id == "h1"));
    }

    #[test]
    fn test_resolve_skips_unknown_and_keeps_catalog_order() {
        let catalog = catalog();
        let resolved: Vec<&str> = catalog
            .resolve(["h3", "missing", "h1", "h3"])
            .into_iter()
            .map(|h| h.id.as_str())
            .collect();
        assert_eq!(resolved, vec!["h1", "h3"]);
    }

    #[test]
    fn test_featured_is_bounded() {
        let catalog = catalog();
        assert_eq!(catalog.featured(2).len(), 2);
        assert_eq!(catalog.featured(10).len(), 3);
    }

    #[test]
    fn test_load_sample_catalog() {
        let result = Catalog::load(SAMPLE_CATALOG_PATH);
        assert!(
            result.is_ok(),
            "Failed to load sample catalog: {:?}",
            result.err()
        );

        let catalog = result.unwrap();
        assert!(!catalog.hotels().is_empty());
        assert!(!catalog.destinations().is_empty());
        for hotel in catalog.hotels() {
            assert_eq!(catalog.hotel(&hotel.id), Some(hotel));
            assert!(!hotel.cover_image().is_empty());
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            Catalog::from_json("{\"hotels\": [{\"id\": 1}]}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Catalog::load("samples/does-not-exist.json"),
            Err(CatalogError::Io(_))
        ));
    }
}
