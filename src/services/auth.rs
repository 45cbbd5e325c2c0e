// src/services/auth.rs

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, SessionUser},
};

// As credenciais vivem no provedor de autenticação; aqui só validamos o token
// e carregamos o perfil `usuarios/{sub}`.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn validate_token(&self, token: &str) -> Result<SessionUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let profile = match self.user_repo.find_by_id(&token_data.claims.sub).await {
            Ok(profile) => profile,
            // Perfil com papel desconhecido não vira sessão
            Err(AppError::SerializationError(e)) => {
                tracing::warn!("Perfil {} ilegível: {}", token_data.claims.sub, e);
                return Err(AppError::InvalidToken);
            }
            Err(e) => return Err(e),
        };

        profile.map(SessionUser::from).ok_or(AppError::UserNotFound)
    }

    #[cfg(test)]
    pub fn issue_token(&self, user_id: &str) -> Result<String, AppError> {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(self.jwt_secret.as_ref()))?)
    }
}
