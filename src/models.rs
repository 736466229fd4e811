pub mod auth;
pub mod banner;
pub mod booking;
pub mod contact;
pub mod customer;
pub mod destination;
pub mod province_category;
pub mod region;
pub mod testimonial;
pub mod tour;
pub mod tour_package;

pub use auth::User;
pub use banner::Banner;
pub use booking::Booking;
pub use contact::Contact;
pub use customer::Customer;
pub use destination::Destination;
pub use province_category::ProvinceCategory;
pub use region::Region;
pub use testimonial::Testimonial;
pub use tour::{Tour, TourImage};
pub use tour_package::TourPackage;
