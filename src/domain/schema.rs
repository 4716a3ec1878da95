// Accepted apartment fields and their closed domains. The domains mirror the
// values observed in the training data; widening one pushes the model outside
// what it was fitted on and must be treated as a breaking change.

use serde_json::Value;
use std::fmt;

pub const YEARS_BUILT: &[i64] = &[
    1978, 1980, 1985, 1986, 1992, 1993, 1997, 2003, 2005, 2006, 2007, 2008, 2009, 2013, 2014,
    2015,
];

pub const HALLWAY_TYPES: &[&str] = &["Corridor", "Mixed", "Terraced"];

pub const TIMES_TO_SUBWAY: &[&str] = &[
    "0-5min",
    "5min~10min",
    "10min~15min",
    "15min~20min",
    "no_bus_stop_nearby",
];

pub const SUBWAY_STATIONS: &[&str] = &[
    "Bangoge",
    "Banwoldang",
    "Chil-sung-market",
    "Daegu",
    "Kyungbuk_uni_hospital",
    "Myung-duk",
    "Sin-nam",
    "no_subway_nearby",
];

pub const FACILITIES_IN_APT: &[i64] = &[1, 2, 3, 4, 5, 7, 8, 9, 10];

pub const PARKING_LOTS: &[i64] = &[
    0, 18, 56, 76, 79, 108, 181, 184, 203, 218, 400, 475, 524, 536, 605, 798, 930, 1174, 1270,
    1321,
];

pub const UNIVERSITIES: &[i64] = &[0, 1, 2, 3, 4, 5];

pub const PUBLIC_OFFICES: &[i64] = &[0, 1, 2, 3, 4, 5, 7];

pub const OTHER_FACILITIES: &[i64] = &[0, 1, 2, 5];

pub const SIZE_MIN: i64 = 135;
pub const SIZE_MAX: i64 = 2337;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDomain {
    IntRange { min: i64, max: i64 },
    IntSet(&'static [i64]),
    Categories(&'static [&'static str]),
}

impl FieldDomain {
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            FieldDomain::IntRange { min, max } => value
                .as_i64()
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(false),
            FieldDomain::IntSet(allowed) => {
                value.as_i64().map(|v| allowed.contains(&v)).unwrap_or(false)
            }
            FieldDomain::Categories(allowed) => {
                value.as_str().map(|v| allowed.contains(&v)).unwrap_or(false)
            }
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, FieldDomain::Categories(_))
    }

    pub fn describe(&self) -> String {
        match self {
            FieldDomain::IntRange { min, max } => format!("integer between {} and {}", min, max),
            FieldDomain::IntSet(allowed) => format!(
                "one of {}",
                allowed
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            FieldDomain::Categories(allowed) => format!("one of {}", allowed.join(", ")),
        }
    }
}

/// The ten user-facing apartment attributes, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureField {
    Size,
    YearBuilt,
    HallwayType,
    TimeToSubway,
    SubwayStation,
    NumFacilitiesInApt,
    NumParking,
    NumUniversities,
    NumPublicOffices,
    NumOtherFacilities,
}

impl FeatureField {
    pub const ALL: [FeatureField; 10] = [
        FeatureField::Size,
        FeatureField::YearBuilt,
        FeatureField::HallwayType,
        FeatureField::TimeToSubway,
        FeatureField::SubwayStation,
        FeatureField::NumFacilitiesInApt,
        FeatureField::NumParking,
        FeatureField::NumUniversities,
        FeatureField::NumPublicOffices,
        FeatureField::NumOtherFacilities,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeatureField::Size => "size",
            FeatureField::YearBuilt => "year_built",
            FeatureField::HallwayType => "hallway_type",
            FeatureField::TimeToSubway => "time_to_subway",
            FeatureField::SubwayStation => "subway_station",
            FeatureField::NumFacilitiesInApt => "num_facilities_in_apt",
            FeatureField::NumParking => "num_parking",
            FeatureField::NumUniversities => "num_universities",
            FeatureField::NumPublicOffices => "num_public_offices",
            FeatureField::NumOtherFacilities => "num_other_facilities",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn domain(&self) -> FieldDomain {
        match self {
            FeatureField::Size => FieldDomain::IntRange {
                min: SIZE_MIN,
                max: SIZE_MAX,
            },
            FeatureField::YearBuilt => FieldDomain::IntSet(YEARS_BUILT),
            FeatureField::HallwayType => FieldDomain::Categories(HALLWAY_TYPES),
            FeatureField::TimeToSubway => FieldDomain::Categories(TIMES_TO_SUBWAY),
            FeatureField::SubwayStation => FieldDomain::Categories(SUBWAY_STATIONS),
            FeatureField::NumFacilitiesInApt => FieldDomain::IntSet(FACILITIES_IN_APT),
            FeatureField::NumParking => FieldDomain::IntSet(PARKING_LOTS),
            FeatureField::NumUniversities => FieldDomain::IntSet(UNIVERSITIES),
            FeatureField::NumPublicOffices => FieldDomain::IntSet(PUBLIC_OFFICES),
            FeatureField::NumOtherFacilities => FieldDomain::IntSet(OTHER_FACILITIES),
        }
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column names the regression model was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelColumn {
    TimeToSubway,
    SubwayStation,
    PublicOfficesNearBy,
    UniversitiesNearBy,
    BasementParkingLots,
    YearBuilt,
    SizeSqf,
    HallwayType,
    FacilitiesInApt,
    OtherFacilitiesNearBy,
}

impl ModelColumn {
    /// Training-time column order. The model reads features positionally, so
    /// this order is part of the artifact contract and differs from
    /// `FeatureField::ALL`.
    pub const TRAINED_ORDER: [ModelColumn; 10] = [
        ModelColumn::TimeToSubway,
        ModelColumn::SubwayStation,
        ModelColumn::PublicOfficesNearBy,
        ModelColumn::UniversitiesNearBy,
        ModelColumn::BasementParkingLots,
        ModelColumn::YearBuilt,
        ModelColumn::SizeSqf,
        ModelColumn::HallwayType,
        ModelColumn::FacilitiesInApt,
        ModelColumn::OtherFacilitiesNearBy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelColumn::TimeToSubway => "TimeToSubway",
            ModelColumn::SubwayStation => "SubwayStation",
            ModelColumn::PublicOfficesNearBy => "N_FacilitiesNearBy(PublicOffice)",
            ModelColumn::UniversitiesNearBy => "N_SchoolNearBy(University)",
            ModelColumn::BasementParkingLots => "N_Parkinglot(Basement)",
            ModelColumn::YearBuilt => "YearBuilt",
            ModelColumn::SizeSqf => "Size(sqf)",
            ModelColumn::HallwayType => "HallwayType",
            ModelColumn::FacilitiesInApt => "N_FacilitiesInApt",
            ModelColumn::OtherFacilitiesNearBy => "N_FacilitiesNearBy(ETC)",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::TRAINED_ORDER
            .iter()
            .copied()
            .find(|c| c.as_str() == name)
    }

    pub fn source_field(&self) -> FeatureField {
        match self {
            ModelColumn::TimeToSubway => FeatureField::TimeToSubway,
            ModelColumn::SubwayStation => FeatureField::SubwayStation,
            ModelColumn::PublicOfficesNearBy => FeatureField::NumPublicOffices,
            ModelColumn::UniversitiesNearBy => FeatureField::NumUniversities,
            ModelColumn::BasementParkingLots => FeatureField::NumParking,
            ModelColumn::YearBuilt => FeatureField::YearBuilt,
            ModelColumn::SizeSqf => FeatureField::Size,
            ModelColumn::HallwayType => FeatureField::HallwayType,
            ModelColumn::FacilitiesInApt => FeatureField::NumFacilitiesInApt,
            ModelColumn::OtherFacilitiesNearBy => FeatureField::NumOtherFacilities,
        }
    }
}

impl fmt::Display for ModelColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static view over the accepted fields.
pub struct FeatureSchema;

impl FeatureSchema {
    pub fn validate(field: FeatureField, value: &Value) -> bool {
        field.domain().contains(value)
    }

    pub fn all_field_names() -> Vec<&'static str> {
        FeatureField::ALL.iter().map(|f| f.name()).collect()
    }
}
