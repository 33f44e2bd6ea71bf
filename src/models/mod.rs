pub mod enums;
pub mod profile;
pub mod reference;

pub use enums::TreatmentCategory;
pub use profile::{PatientPayload, PatientProfile, ValidationError};
pub use reference::{CostRecord, ResourceRecord};
