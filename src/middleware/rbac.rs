// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::Capability,
};

/// 1. O Trait que define qual flag de `permisos` a rota exige
pub trait CapabilityDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// 2. O Extractor (Guardião). O supermax passa sempre.
pub struct RequireCapability<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Ok(locale) = Locale::from_request_parts(parts, state).await;
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        let capability = T::capability();
        if !user.can(capability) {
            return Err(AppError::MissingCapability(capability.slug()).to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireCapability(PhantomData))
    }
}

/// Só `max` e `supermax` passam.
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Ok(locale) = Locale::from_request_parts(parts, state).await;
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::AdminOnly.to_api_error(&locale, &app_state.i18n_store));
        }
        Ok(RequireAdmin)
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermCreateCompanies;
impl CapabilityDef for PermCreateCompanies {
    fn capability() -> Capability { Capability::CreateCompanies }
}

pub struct PermCreateBranches;
impl CapabilityDef for PermCreateBranches {
    fn capability() -> Capability { Capability::CreateBranches }
}

pub struct PermCreateAudits;
impl CapabilityDef for PermCreateAudits {
    fn capability() -> Capability { Capability::CreateAudits }
}
