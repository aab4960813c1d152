//! The clinic's four resources: records, inputs, tables and rules.

pub mod animal;
pub mod consultation;
pub mod secretary;
pub mod veterinarian;

pub use animal::{Animal, AnimalInput, Animals, ANIMAL_TABLE};
pub use consultation::{
    Consultation, ConsultationInput, ConsultationStatus, Consultations, CONSULTATION_TABLE,
};
pub use secretary::{Secretaries, Secretary, SecretaryInput, SECRETARY_TABLE};
pub use veterinarian::{Veterinarian, VeterinarianInput, Veterinarians, VETERINARIAN_TABLE};

/// Maximum lengths shared by the text fields of every resource.
pub(crate) const NAME_MAX: usize = 120;
pub(crate) const EMAIL_MAX: usize = 160;
pub(crate) const TEXT_MAX: usize = 2000;
pub(crate) const CODE_MAX: usize = 32;
