use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
///
/// Paths are collected from the routers, so only metadata lives here.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Authentication", description = "The authenticated user"),
        (name = "Dashboard", description = "Headline counts"),
        (name = "Branches", description = "Branch management"),
        (name = "Users", description = "Staff accounts"),
        (name = "Groups", description = "Course groups and rosters"),
        (name = "Students", description = "Student records"),
        (name = "Enrollments", description = "Enrollment, transfer and history"),
        (name = "Attendance", description = "Lecture attendance"),
        (name = "Reports", description = "Group attendance reports"),
    ),
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = "Branch-scoped student attendance tracking",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
