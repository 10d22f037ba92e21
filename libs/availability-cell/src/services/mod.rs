pub mod availability;
pub mod conflict;
pub mod engine;
pub mod horizon;
pub mod lookup;
pub mod reception;
pub mod slots;

pub use availability::AvailabilityService;
pub use engine::AvailabilitySnapshot;
pub use lookup::{
    BookingLookup, MedicalServiceLookup, ReceptionWindowLookup, SupabaseAvailabilityStore,
    VetLookup,
};
