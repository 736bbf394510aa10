//! CTF entity <-> model mapper

use ctf_core::{Ctf, DomainError, Snowflake};

use crate::models::CtfModel;

/// Convert a CtfModel row to a Ctf entity
///
/// Fails only if the stored role id is not a snowflake, which the schema
/// cannot rule out on its own.
impl TryFrom<CtfModel> for Ctf {
    type Error = DomainError;

    fn try_from(model: CtfModel) -> Result<Self, Self::Error> {
        let role_id = Snowflake::parse(&model.role_id).map_err(|_| {
            DomainError::DatabaseError(format!(
                "ctf {} has malformed role_id {:?}",
                model.id, model.role_id
            ))
        })?;

        Ok(Ctf {
            id: model.id,
            name: model.name,
            start: model.start,
            role_id,
            can_join: model.can_join,
            ctftime_url: model.ctftime_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Column values of a Ctf entity, ready for binding
pub struct CtfRow<'a> {
    pub name: &'a str,
    pub role_id: String,
    pub can_join: bool,
    pub ctftime_url: &'a str,
}

impl<'a> CtfRow<'a> {
    pub fn new(ctf: &'a Ctf) -> Self {
        Self {
            name: &ctf.name,
            role_id: ctf.role_id.to_string(),
            can_join: ctf.can_join,
            ctftime_url: &ctf.ctftime_url,
        }
    }
}
