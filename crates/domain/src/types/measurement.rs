//! Measurement request types accepted when ordering a report

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::EagleViewError;
use crate::impl_name_conversions;

/// Which structures on a parcel an order asks to be measured
///
/// Serialized as its numeric id, the form the API uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MeasurementRequest {
    PrimaryPlusDetachedGarage,
    PrimaryStructureOnly,
    AllStructuresOnParcel,
    CommercialComplex,
    Other,
}

impl_name_conversions!(MeasurementRequest {
    PrimaryPlusDetachedGarage => "PrimaryPlusDetachedGarage",
    PrimaryStructureOnly => "PrimaryStructureOnly",
    AllStructuresOnParcel => "AllStructuresOnParcel",
    CommercialComplex => "CommercialComplex",
    Other => "Other",
});

impl MeasurementRequest {
    pub const ALL: [Self; 5] = [
        Self::PrimaryPlusDetachedGarage,
        Self::PrimaryStructureOnly,
        Self::AllStructuresOnParcel,
        Self::CommercialComplex,
        Self::Other,
    ];

    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Self::PrimaryPlusDetachedGarage => 1,
            Self::PrimaryStructureOnly => 2,
            Self::AllStructuresOnParcel => 3,
            Self::CommercialComplex => 4,
            Self::Other => 5,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::PrimaryPlusDetachedGarage => {
                "Request that the primary structure and the detached garage be measured."
            }
            Self::PrimaryStructureOnly => "Request that only the primary structure be measured.",
            Self::AllStructuresOnParcel => "Request that all structures on the parcel be measured.",
            Self::CommercialComplex => {
                "Request that notes the structure to be measured is a commercial complex."
            }
            Self::Other => "Request that does not fit any of the other measurement request types.",
        }
    }

    /// Look a variant up by numeric id, `None` when the id is unknown
    #[must_use]
    pub fn from_value(value: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| u64::from(kind.value()) == value)
    }

    /// `{value, name, description}` view of the variant
    #[must_use]
    pub fn to_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("value".to_string(), json!(self.value()));
        map.insert("name".to_string(), json!(self.to_string()));
        map.insert("description".to_string(), json!(self.description()));
        map
    }
}

impl TryFrom<u8> for MeasurementRequest {
    type Error = EagleViewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(u64::from(value)).ok_or_else(|| {
            EagleViewError::InvalidInput(format!("unknown measurement request type: {value}"))
        })
    }
}

impl From<MeasurementRequest> for u8 {
    fn from(kind: MeasurementRequest) -> Self {
        kind.value()
    }
}
