// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

// As rotas genéricas de CRUD (handlers::crud) não aparecem aqui: são
// funções genéricas e o utoipa só documenta handlers concretos.
#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Public ---
        handlers::public::list_regions,
        handlers::public::region_by_key,
        handlers::public::list_destinations,
        handlers::public::destination_by_slug,
        handlers::public::list_tours,
        handlers::public::tour_by_slug,
        handlers::public::list_tour_packages,
        handlers::public::list_banners,
        handlers::public::list_testimonials,
        handlers::contact::submit,

        // --- Regions ---
        handlers::regions::get_by_key,
        handlers::regions::delete,

        // --- Destinations ---
        handlers::destinations::create,
        handlers::destinations::update,

        // --- Tours ---
        handlers::tours::get_one,
        handlers::tours::create,
        handlers::tours::update,
        handlers::tours::gallery,
        handlers::tours::replace_gallery,
        handlers::tours::reorder_gallery,

        // --- Bookings ---
        handlers::bookings::create,
        handlers::bookings::update,
        handlers::bookings::delete,

        // --- Users ---
        handlers::users::create,

        // --- Media ---
        handlers::media::upload,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::AccountStatus,
            models::auth::UserRole,
            models::auth::User,
            models::auth::UserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catálogo ---
            models::region::Region,
            models::region::RegionPayload,
            models::destination::Destination,
            models::destination::DestinationPayload,
            models::province_category::ProvinceCategory,
            models::province_category::ProvinceCategoryPayload,
            models::tour::TourStatus,
            models::tour::Tour,
            models::tour::TourImage,
            models::tour::TourDetail,
            models::tour::GalleryImageInput,
            models::tour::TourPayload,
            models::tour::ReplaceGalleryPayload,
            models::tour::ReorderGalleryPayload,
            models::tour_package::TourPackage,
            models::tour_package::TourPackagePayload,

            // --- Vendas ---
            models::booking::BookingStatus,
            models::booking::Booking,
            models::booking::BookingPayload,
            models::customer::Customer,
            models::customer::CustomerPayload,
            models::contact::ContactStatus,
            models::contact::Contact,
            models::contact::ContactPayload,

            // --- Site ---
            models::banner::BannerType,
            models::banner::Banner,
            models::banner::BannerPayload,
            models::testimonial::Testimonial,
            models::testimonial::TestimonialPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login e sessão do painel"),
        (name = "Public", description = "Leitura pública do site e formulário de contato"),
        (name = "Regions", description = "Regiões (Norte, Centro, Sul)"),
        (name = "Destinations", description = "Destinos e vínculo com a região"),
        (name = "Tours", description = "Tours e galeria ordenada"),
        (name = "Bookings", description = "Reservas"),
        (name = "Users", description = "Contas do painel"),
        (name = "Media", description = "Upload de imagens")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_paths_declare_bearer_security() {
        let doc = ApiDoc::openapi();
        let schemes = doc.components.as_ref().map(|c| c.security_schemes.clone()).unwrap_or_default();
        assert!(schemes.contains_key("api_jwt"));
        assert!(doc.paths.paths.contains_key("/api/admin/regions/{id}"));
        assert!(doc.paths.paths.contains_key("/api/tours/{slug}"));
    }
}
