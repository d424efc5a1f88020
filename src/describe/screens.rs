//! Sensor-console tables (`/Capteur/Tableau*`): full-row dumps with field metadata.

use crate::describe::{DescribedQuery, DescribedResult};
use crate::domain;
use crate::error::AppError;
use crate::schema::describe_table;
use crate::sql;
use sqlx::SqliteConnection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Users with their profile.
    Utilisateurs,
    Overloads,
    Droits,
    Capteurs,
}

impl Screen {
    /// Statement for the screen, generated from the current catalog.
    pub async fn statement(self, conn: &mut SqliteConnection) -> Result<String, AppError> {
        match self {
            Screen::Utilisateurs => {
                let users = describe_table(conn, domain::USER_TABLE).await?;
                let profiles = describe_table(conn, domain::PROFILE_TABLE).await?;
                sql::select_qualified_left_join(&users, &profiles, domain::PROFILE_ID)
            }
            Screen::Overloads => Ok(sql::select_qualified(&describe_table(conn, domain::OVERLOAD_TABLE).await?)),
            Screen::Droits => Ok(sql::select_qualified(&describe_table(conn, domain::RIGHT_TABLE).await?)),
            Screen::Capteurs => Ok(sql::select_qualified(&describe_table(conn, domain::SENSOR_TABLE).await?)),
        }
    }

    pub async fn load(self, conn: &mut SqliteConnection, query: &DescribedQuery<'_>) -> Result<DescribedResult, AppError> {
        let statement = self.statement(conn).await?;
        query.run(conn, &statement, &[]).await
    }
}
