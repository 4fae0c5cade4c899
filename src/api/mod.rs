//! Data model for the Bayut listings API.
//!
//! The response schema is an external contract owned by the aggregator;
//! these types map the subset of fields the app renders. Unknown fields
//! are ignored, optional fields default so that a sparse hit never fails
//! the whole page.

pub mod client;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BayutError, Result};

/// Transaction type of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    ForSale,
    ForRent,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::ForSale => write!(f, "for-sale"),
            Purpose::ForRent => write!(f, "for-rent"),
        }
    }
}

impl FromStr for Purpose {
    type Err = BayutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "for-sale" | "sale" => Ok(Purpose::ForSale),
            "for-rent" | "rent" => Ok(Purpose::ForRent),
            _ => Err(BayutError::Config(format!(
                "unknown purpose '{}', expected 'for-sale' or 'for-rent'",
                s
            ))),
        }
    }
}

/// Furnishing state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurnishingStatus {
    Furnished,
    Unfurnished,
}

impl fmt::Display for FurnishingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FurnishingStatus::Furnished => write!(f, "furnished"),
            FurnishingStatus::Unfurnished => write!(f, "unfurnished"),
        }
    }
}

impl FromStr for FurnishingStatus {
    type Err = BayutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "furnished" => Ok(FurnishingStatus::Furnished),
            "unfurnished" => Ok(FurnishingStatus::Unfurnished),
            _ => Err(BayutError::Config(format!(
                "unknown furnishing status '{}', expected 'furnished' or 'unfurnished'",
                s
            ))),
        }
    }
}

/// Billing period for rentals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for RentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RentFrequency::Daily => "daily",
            RentFrequency::Weekly => "weekly",
            RentFrequency::Monthly => "monthly",
            RentFrequency::Yearly => "yearly",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RentFrequency {
    type Err = BayutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RentFrequency::Daily),
            "weekly" => Ok(RentFrequency::Weekly),
            "monthly" => Ok(RentFrequency::Monthly),
            "yearly" => Ok(RentFrequency::Yearly),
            _ => Err(BayutError::Config(format!(
                "unknown rent frequency '{}'",
                s
            ))),
        }
    }
}

/// Property category. The numeric external IDs are fixed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Apartment,
    Townhouses,
    Villas,
    Penthouses,
    HotelApartments,
    VillaCompound,
    ResidentialPlot,
    ResidentialFloor,
    ResidentialBuilding,
    Office,
    Shop,
    Warehouse,
    LabourCamp,
    CommercialVilla,
    BulkUnits,
    CommercialPlot,
    CommercialFloor,
    CommercialBuilding,
    Factory,
    IndustrialLand,
    MixedUseLand,
    Showroom,
    OtherCommercial,
}

impl Category {
    /// The `categoryExternalID` value the list endpoint expects.
    pub fn external_id(self) -> u32 {
        match self {
            Category::Apartment => 4,
            Category::Townhouses => 16,
            Category::Villas => 3,
            Category::Penthouses => 18,
            Category::HotelApartments => 21,
            Category::VillaCompound => 19,
            Category::ResidentialPlot => 14,
            Category::ResidentialFloor => 12,
            Category::ResidentialBuilding => 17,
            Category::Office => 5,
            Category::Shop => 6,
            Category::Warehouse => 7,
            Category::LabourCamp => 9,
            Category::CommercialVilla => 25,
            Category::BulkUnits => 20,
            Category::CommercialPlot => 15,
            Category::CommercialFloor => 13,
            Category::CommercialBuilding => 10,
            Category::Factory => 8,
            Category::IndustrialLand => 22,
            Category::MixedUseLand => 23,
            Category::Showroom => 24,
            Category::OtherCommercial => 11,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Apartment => "apartment",
            Category::Townhouses => "townhouses",
            Category::Villas => "villas",
            Category::Penthouses => "penthouses",
            Category::HotelApartments => "hotel-apartments",
            Category::VillaCompound => "villa-compound",
            Category::ResidentialPlot => "residential-plot",
            Category::ResidentialFloor => "residential-floor",
            Category::ResidentialBuilding => "residential-building",
            Category::Office => "office",
            Category::Shop => "shop",
            Category::Warehouse => "warehouse",
            Category::LabourCamp => "labour-camp",
            Category::CommercialVilla => "commercial-villa",
            Category::BulkUnits => "bulk-units",
            Category::CommercialPlot => "commercial-plot",
            Category::CommercialFloor => "commercial-floor",
            Category::CommercialBuilding => "commercial-building",
            Category::Factory => "factory",
            Category::IndustrialLand => "industrial-land",
            Category::MixedUseLand => "mixed-use-land",
            Category::Showroom => "showroom",
            Category::OtherCommercial => "other-commercial",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Category {
    type Err = BayutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "apartment" => Ok(Category::Apartment),
            "townhouses" => Ok(Category::Townhouses),
            "villas" => Ok(Category::Villas),
            "penthouses" => Ok(Category::Penthouses),
            "hotel-apartments" => Ok(Category::HotelApartments),
            "villa-compound" => Ok(Category::VillaCompound),
            "residential-plot" => Ok(Category::ResidentialPlot),
            "residential-floor" => Ok(Category::ResidentialFloor),
            "residential-building" => Ok(Category::ResidentialBuilding),
            "office" => Ok(Category::Office),
            "shop" => Ok(Category::Shop),
            "warehouse" => Ok(Category::Warehouse),
            "labour-camp" => Ok(Category::LabourCamp),
            "commercial-villa" => Ok(Category::CommercialVilla),
            "bulk-units" => Ok(Category::BulkUnits),
            "commercial-plot" => Ok(Category::CommercialPlot),
            "commercial-floor" => Ok(Category::CommercialFloor),
            "commercial-building" => Ok(Category::CommercialBuilding),
            "factory" => Ok(Category::Factory),
            "industrial-land" => Ok(Category::IndustrialLand),
            "mixed-use-land" => Ok(Category::MixedUseLand),
            "showroom" => Ok(Category::Showroom),
            "other-commercial" => Ok(Category::OtherCommercial),
            _ => Err(BayutError::Config(format!("unknown category '{}'", s))),
        }
    }
}

/// Latitude/longitude pair as returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Photo reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
}

/// Named location segment attached to a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationName {
    pub name: String,
}

/// Contact numbers attached to a listing or agency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneNumber {
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
}

/// Auto-complete hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: u64,
    pub name: String,
    #[serde(rename = "externalID")]
    pub external_id: String,
    #[serde(default)]
    pub geography: Option<GeoPoint>,
}

/// Agency reference embedded in a listing hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo: Option<Photo>,
}

/// One hit from the property list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: u64,
    #[serde(rename = "externalID", default)]
    pub external_id: Option<String>,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub purpose: Option<Purpose>,
    #[serde(default)]
    pub rent_frequency: Option<RentFrequency>,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub baths: u32,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub cover_photo: Option<Photo>,
    #[serde(default)]
    pub agency: Option<AgencyRef>,
    #[serde(default)]
    pub geography: Option<GeoPoint>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub location: Vec<LocationName>,
}

/// Full record from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    pub id: u64,
    #[serde(rename = "externalID", default)]
    pub external_id: Option<String>,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub purpose: Option<Purpose>,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub baths: u32,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub cover_photo: Option<Photo>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub location: Vec<LocationName>,
    #[serde(default)]
    pub geography: Option<GeoPoint>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<PhoneNumber>,
}

/// Office location of an agency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyLocation {
    #[serde(rename = "_geoloc", default)]
    pub geoloc: Option<GeoPoint>,
}

/// One hit from the agency directory endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub agents_count: Option<u32>,
    #[serde(default)]
    pub logo: Option<Photo>,
    #[serde(default)]
    pub phone_number: Option<PhoneNumber>,
    #[serde(default)]
    pub locations: Vec<AgencyLocation>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Free-text context for the paginated agency directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgencySearch(pub String);

/// Context for paging through one agency's listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencySlug(pub String);

/// The complete set of active search constraints for the list endpoint.
///
/// `None` means "no constraint" and the field is omitted from the query
/// string entirely; it is never sent as zero or empty. Structural
/// equality is what gates refetches, so two sets with identical field
/// values compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub location_external_ids: Option<String>,
    pub purpose: Option<Purpose>,
    pub category: Option<Category>,
    pub rooms_min: Option<u32>,
    pub rooms_max: Option<u32>,
    pub baths_min: Option<u32>,
    pub baths_max: Option<u32>,
    pub furnishing_status: Option<FurnishingStatus>,
    pub rent_frequency: Option<RentFrequency>,
}

impl FilterSet {
    /// Query parameters for the list endpoint. Only set fields appear.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ids) = &self.location_external_ids {
            params.push(("locationExternalIDs", ids.clone()));
        }
        if let Some(purpose) = self.purpose {
            params.push(("purpose", purpose.to_string()));
        }
        if let Some(category) = self.category {
            params.push(("categoryExternalID", category.external_id().to_string()));
        }
        if let Some(min) = self.rooms_min {
            params.push(("roomsMin", min.to_string()));
        }
        if let Some(max) = self.rooms_max {
            params.push(("roomsMax", max.to_string()));
        }
        if let Some(min) = self.baths_min {
            params.push(("bathsMin", min.to_string()));
        }
        if let Some(max) = self.baths_max {
            params.push(("bathsMax", max.to_string()));
        }
        if let Some(furnishing) = self.furnishing_status {
            params.push(("furnishingStatus", furnishing.to_string()));
        }
        if let Some(freq) = self.rent_frequency {
            params.push(("rentFrequency", freq.to_string()));
        }
        params
    }
}
