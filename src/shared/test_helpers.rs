#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::shared::constants::ROLE_OFFICIAL;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, Router};

#[cfg(test)]
#[allow(dead_code)]
pub fn create_citizen_user(sub: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.to_string(),
        name: Some("Test Citizen".to_string()),
        roles: vec![],
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn create_official_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "official-sub".to_string(),
        name: Some("Test Official".to_string()),
        roles: vec![ROLE_OFFICIAL.to_string()],
    }
}

/// Wraps a router so every request carries the given identity, standing in
/// for the bearer-token middleware.
#[cfg(test)]
#[allow(dead_code)]
pub fn with_user_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}
