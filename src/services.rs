pub mod auth;
pub mod booking_service;
pub mod contact_service;
pub mod crud_service;
pub mod destination_service;
pub mod mailer;
pub mod media;
pub mod region_service;
pub mod tour_service;
pub mod user_service;

pub use auth::AuthService;
pub use booking_service::BookingService;
pub use contact_service::ContactService;
pub use crud_service::CrudService;
pub use destination_service::DestinationService;
pub use region_service::RegionService;
pub use tour_service::TourService;
pub use user_service::UserService;
