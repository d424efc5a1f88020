//! Profile workflows: duplication with rights, right toggling, profile and user closure.
//!
//! Each mutating workflow runs in one transaction on the request's connection. Any
//! failure rolls back explicitly before the error is returned.

use crate::domain::*;
use crate::error::AppError;
use crate::schema::{describe_table, TableMeta};
use crate::service::{merge_with_key, RequestValidator};
use crate::sql::{self, exec};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{Connection, Sqlite, SqliteConnection, Transaction};
use std::str::FromStr;

const DUPLICATE_CONTEXT: &str = "Erreur lors de la duplication du profil";
const RIGHTS_CONTEXT: &str = "Erreur lors de la modification des droits";
const CLOSE_PROFILE_CONTEXT: &str = "Erreur lors de la clôture du profil";
const CLOSE_USER_CONTEXT: &str = "Erreur lors de la clôture de l'utilisateur";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RightAction {
    Add,
    Remove,
}

impl FromStr for RightAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ajouter" => Ok(RightAction::Add),
            "Supprimer" => Ok(RightAction::Remove),
            _ => Err(AppError::Validation(
                "Le typeAction doit être \"Ajouter\" ou \"Supprimer\"".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RightsChanged {
    pub message: String,
    pub id_profil: Value,
    pub droits: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileClosed {
    pub message: String,
    pub id_profil: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClosed {
    pub message: String,
    pub id_utilisateur: Value,
}

pub struct ProfileWorkflow;

impl ProfileWorkflow {
    /// Profile row plus its origin profile's name as `NomProfilOrigine`.
    pub async fn get_profile(conn: &mut SqliteConnection, id: &Value) -> Result<Value, AppError> {
        let profiles = describe_table(conn, PROFILE_TABLE).await?;
        let pk = profiles.require_primary_key()?;
        let q = sql::select_by_id_with_self_ref(&profiles, pk, PROFILE_ORIGIN, PROFILE_NAME, PROFILE_ORIGIN_NAME, id)?;
        exec::fetch_optional(conn, &q)
            .await?
            .ok_or_else(AppError::record_not_found)
    }

    /// Rights currently granted to a profile.
    pub async fn rights_for_profile(conn: &mut SqliteConnection, profile_id: &Value) -> Result<Vec<Value>, AppError> {
        let profiles = describe_table(conn, PROFILE_TABLE).await?;
        ensure_exists(conn, &profiles, profile_id, "Profil non trouvé").await?;
        current_rights(conn, profile_id).await
    }

    /// Copy a profile (minus identity and default flag) under a new name, with all of
    /// its rights. All or nothing.
    pub async fn duplicate_profile(conn: &mut SqliteConnection, body: &Map<String, Value>) -> Result<Value, AppError> {
        let [source_id, name] = RequestValidator::require_fields(
            body,
            ["idProfilOrigineCopie", "nom"],
            "Les champs id et nom sont requis",
        )?;
        let mut tx = conn.begin().await.map_err(|e| AppError::from(e).in_workflow(DUPLICATE_CONTEXT))?;
        let outcome = Self::duplicate_in(&mut tx, source_id, name).await;
        let created = finish(tx, outcome, DUPLICATE_CONTEXT).await?;
        tracing::info!(source = %source_id, profile = %created[PROFILE_ID], "profile duplicated");
        Ok(created)
    }

    async fn duplicate_in(conn: &mut SqliteConnection, source_id: &Value, name: &Value) -> Result<Value, AppError> {
        let profiles = describe_table(conn, PROFILE_TABLE).await?;
        let pk = profiles.require_primary_key()?;
        let source = exec::fetch_optional(conn, &sql::select_by_id(&profiles, pk, source_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Profil d'origine non trouvé".into()))?;

        let mut copy = into_map(source);
        copy.remove(&pk.name);
        copy.remove(PROFILE_DEFAULT_FLAG);
        copy.insert(PROFILE_NAME.into(), name.clone());
        copy.insert(PROFILE_ORIGIN.into(), source_id.clone());
        let done = exec::execute(conn, &sql::insert(&profiles, &copy)?).await?;
        let new_id = Value::from(done.last_insert_rowid());

        let links = describe_table(conn, PROFILE_RIGHT_TABLE).await?;
        let source_links = exec::fetch_all(conn, &sql::select_where(&links, &[(PROFILE_ID, source_id.clone())])?).await?;
        for link in source_links {
            let mut link = into_map(link);
            link.remove(PROFILE_RIGHT_ID);
            link.insert(PROFILE_ID.into(), new_id.clone());
            exec::execute(conn, &sql::insert(&links, &link)?).await?;
        }

        Ok(merge_with_key(PROFILE_ID, new_id, &copy))
    }

    /// Grant or revoke one right. Granting twice is a conflict; revoking is idempotent.
    /// Returns the profile's rights after the change.
    pub async fn set_right(conn: &mut SqliteConnection, body: &Map<String, Value>) -> Result<RightsChanged, AppError> {
        let [profile_id, right_id, action] = RequestValidator::require_fields(
            body,
            ["idProfil", "idDroit", "typeAction"],
            "Les champs idProfil, idDroit et typeAction sont requis",
        )?;
        let action: RightAction = action.as_str().unwrap_or_default().parse()?;

        let mut tx = conn.begin().await.map_err(|e| AppError::from(e).in_workflow(RIGHTS_CONTEXT))?;
        let outcome = Self::set_right_in(&mut tx, profile_id, right_id, action).await;
        finish(tx, outcome, RIGHTS_CONTEXT).await?;

        let droits = current_rights(conn, profile_id)
            .await
            .map_err(|e| e.in_workflow(RIGHTS_CONTEXT))?;
        tracing::info!(profile = %profile_id, right = %right_id, action = ?action, "profile rights changed");
        Ok(RightsChanged {
            message: match action {
                RightAction::Add => "Droit ajouté avec succès".into(),
                RightAction::Remove => "Droit supprimé avec succès".into(),
            },
            id_profil: profile_id.clone(),
            droits,
        })
    }

    async fn set_right_in(
        conn: &mut SqliteConnection,
        profile_id: &Value,
        right_id: &Value,
        action: RightAction,
    ) -> Result<(), AppError> {
        let profiles = describe_table(conn, PROFILE_TABLE).await?;
        ensure_exists(conn, &profiles, profile_id, "Profil non trouvé").await?;
        let rights = describe_table(conn, RIGHT_TABLE).await?;
        ensure_exists(conn, &rights, right_id, "Droit non trouvé").await?;

        let links = describe_table(conn, PROFILE_RIGHT_TABLE).await?;
        let pair = [(PROFILE_ID, profile_id.clone()), (RIGHT_ID, right_id.clone())];
        match action {
            RightAction::Add => {
                if exec::exists(conn, &sql::select_where(&links, &pair)?).await? {
                    return Err(AppError::Conflict("Ce droit est déjà associé au profil".into()));
                }
                let row: Map<String, Value> = pair.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
                exec::execute(conn, &sql::insert(&links, &row)?).await?;
            }
            RightAction::Remove => {
                exec::execute(conn, &sql::delete_where(&links, &pair)?).await?;
            }
        }
        Ok(())
    }

    /// Flag a profile and every user attached to it as closed. Rights links are kept.
    pub async fn close_profile(conn: &mut SqliteConnection, body: &Map<String, Value>) -> Result<ProfileClosed, AppError> {
        let [profile_id] = RequestValidator::require_fields(body, ["idProfil"], "Le champ idProfil est requis")?;
        let mut tx = conn.begin().await.map_err(|e| AppError::from(e).in_workflow(CLOSE_PROFILE_CONTEXT))?;
        let outcome = Self::close_profile_in(&mut tx, profile_id).await;
        finish(tx, outcome, CLOSE_PROFILE_CONTEXT).await?;
        tracing::info!(profile = %profile_id, "profile closed");
        Ok(ProfileClosed {
            message: "Profil clôturé avec succès".into(),
            id_profil: profile_id.clone(),
        })
    }

    async fn close_profile_in(conn: &mut SqliteConnection, profile_id: &Value) -> Result<(), AppError> {
        let profiles = describe_table(conn, PROFILE_TABLE).await?;
        ensure_exists(conn, &profiles, profile_id, "Profil non trouvé").await?;
        let users = describe_table(conn, USER_TABLE).await?;
        let closed = closed_flag();
        exec::execute(conn, &sql::update_where(&profiles, &closed, &[(PROFILE_ID, profile_id.clone())])?).await?;
        let users_closed = exec::execute(conn, &sql::update_where(&users, &closed, &[(PROFILE_ID, profile_id.clone())])?).await?;
        tracing::debug!(profile = %profile_id, users = users_closed.rows_affected(), "users closed with profile");
        Ok(())
    }

    /// Flag one user as closed.
    pub async fn close_user(conn: &mut SqliteConnection, body: &Map<String, Value>) -> Result<UserClosed, AppError> {
        let [user_id] = RequestValidator::require_fields(body, ["idUtilisateur"], "Le champ idUtilisateur est requis")?;
        let mut tx = conn.begin().await.map_err(|e| AppError::from(e).in_workflow(CLOSE_USER_CONTEXT))?;
        let outcome = Self::close_user_in(&mut tx, user_id).await;
        finish(tx, outcome, CLOSE_USER_CONTEXT).await?;
        tracing::info!(user = %user_id, "user closed");
        Ok(UserClosed {
            message: "Utilisateur clôturé avec succès".into(),
            id_utilisateur: user_id.clone(),
        })
    }

    async fn close_user_in(conn: &mut SqliteConnection, user_id: &Value) -> Result<(), AppError> {
        let users = describe_table(conn, USER_TABLE).await?;
        ensure_exists(conn, &users, user_id, "Utilisateur non trouvé").await?;
        exec::execute(conn, &sql::update_where(&users, &closed_flag(), &[(USER_ID, user_id.clone())])?).await?;
        Ok(())
    }
}

/// Commit on success; otherwise roll back explicitly and surface the error.
async fn finish<T>(tx: Transaction<'_, Sqlite>, outcome: Result<T, AppError>, context: &str) -> Result<T, AppError> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(|e| AppError::from(e).in_workflow(context))?;
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(error = %e, "{}: rolling back", context);
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(error = %rollback, "rollback failed");
            }
            Err(e.in_workflow(context))
        }
    }
}

async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &TableMeta,
    id: &Value,
    message: &str,
) -> Result<(), AppError> {
    let pk = table.require_primary_key()?;
    if exec::exists(conn, &sql::select_exists(table, pk, id)).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(message.to_string()))
    }
}

async fn current_rights(conn: &mut SqliteConnection, profile_id: &Value) -> Result<Vec<Value>, AppError> {
    let rights = describe_table(conn, RIGHT_TABLE).await?;
    let rights_pk = rights.require_primary_key()?;
    let links = describe_table(conn, PROFILE_RIGHT_TABLE).await?;
    let q = sql::select_through(&rights, rights_pk, &links, RIGHT_ID, PROFILE_ID, profile_id)?;
    exec::fetch_all(conn, &q).await
}

fn closed_flag() -> Map<String, Value> {
    let mut m = Map::new();
    m.insert(CLOSED_FLAG.into(), Value::from(1));
    m
}

fn into_map(row: Value) -> Map<String, Value> {
    match row {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_two_literals_are_actions() {
        assert_eq!("Ajouter".parse::<RightAction>().unwrap(), RightAction::Add);
        assert_eq!("Supprimer".parse::<RightAction>().unwrap(), RightAction::Remove);
        assert!(matches!("ajouter".parse::<RightAction>(), Err(AppError::Validation(_))));
        assert!("Delete".parse::<RightAction>().is_err());
    }

    #[test]
    fn rights_response_uses_wire_names() {
        let r = RightsChanged {
            message: "Droit ajouté avec succès".into(),
            id_profil: Value::from(3),
            droits: vec![],
        };
        let v = serde_json::to_value(r).unwrap();
        assert_eq!(v["idProfil"], 3);
        assert!(v["droits"].is_array());
    }
}
