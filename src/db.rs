pub mod crud_repo;
pub use crud_repo::CrudRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod region_repo;
pub use region_repo::RegionRepository;
pub mod destination_repo;
pub use destination_repo::DestinationRepository;
pub mod tour_repo;
pub use tour_repo::TourRepository;
pub mod booking_repo;
pub use booking_repo::BookingRepository;
