//! Table and column names of the administered ACRN database.
//!
//! These are fixed by the existing schema; they are still checked against the catalog
//! before being used in a statement.

pub const PROFILE_TABLE: &str = "TableProfils";
pub const PROFILE_ID: &str = "IdProfil";
pub const PROFILE_NAME: &str = "NomProfil";
pub const PROFILE_DEFAULT_FLAG: &str = "NomProfilDefaut";
pub const PROFILE_ORIGIN: &str = "IdProfilOrigineCopie";
/// Alias under which a profile read exposes its origin profile's name.
pub const PROFILE_ORIGIN_NAME: &str = "NomProfilOrigine";

pub const RIGHT_TABLE: &str = "TableDroits";
pub const RIGHT_ID: &str = "IdDroit";

pub const PROFILE_RIGHT_TABLE: &str = "TableProfilsDroits";
pub const PROFILE_RIGHT_ID: &str = "IdProfilDroit";

pub const USER_TABLE: &str = "TableUtilisateurs";
pub const USER_ID: &str = "IdUtilisateur";

/// Soft-delete flag shared by profiles and users.
pub const CLOSED_FLAG: &str = "Cloture";

pub const OVERLOAD_TABLE: &str = "TableOverloads";
pub const SENSOR_TABLE: &str = "TableCapteurs";
