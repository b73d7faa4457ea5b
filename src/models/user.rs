use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::api::ApiDecodeTokenResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub rol: i64,
}

impl User {
    /// The decode endpoint sends numeric ids as strings.
    pub fn from_decoded(decoded: &ApiDecodeTokenResponse) -> Result<Self, ApiError> {
        let usuario = &decoded.usuario;
        let id = usuario.id_usuario.trim().parse().map_err(|_| {
            ApiError::Decode(format!("idUsuario `{}` is not a number", usuario.id_usuario))
        })?;
        let rol = usuario.id_rol.trim().parse().map_err(|_| {
            ApiError::Decode(format!("idRol `{}` is not a number", usuario.id_rol))
        })?;
        Ok(User {
            id,
            login: usuario.login.clone(),
            email: usuario.email.clone(),
            rol,
        })
    }
}
