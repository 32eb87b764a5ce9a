//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as the first argument, or `&mut PgConnection` when the write
//! must join a caller-owned transaction.

pub mod agreement_repo;
pub mod assessment_repo;
pub mod booking_repo;
pub mod contact_repo;
pub mod dog_repo;
pub mod medication_repo;
pub mod profile_repo;
pub mod session_repo;
pub mod subscription_repo;
pub mod tier_repo;
pub mod user_repo;
pub mod webhook_event_repo;

pub use agreement_repo::LegalAgreementRepo;
pub use assessment_repo::{AssessmentFormRepo, AssessmentRepo};
pub use booking_repo::BookingRepo;
pub use contact_repo::ContactRepo;
pub use dog_repo::DogRepo;
pub use medication_repo::MedicationRepo;
pub use profile_repo::ProfileRepo;
pub use session_repo::SessionRepo;
pub use subscription_repo::SubscriptionRepo;
pub use tier_repo::TierRepo;
pub use user_repo::UserRepo;
pub use webhook_event_repo::WebhookEventRepo;
