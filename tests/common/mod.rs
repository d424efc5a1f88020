// Shared fixture: a throwaway SQLite file with the ACRN administration tables, and a
// router mounted over it.

#![allow(dead_code)]

use acrn_gateway::{app, connect_options, AppState, FieldDescriptions, Settings};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use tempfile::TempDir;
use tower::ServiceExt;

const SCHEMA: &str = r#"
CREATE TABLE TableProfils (
    IdProfil INTEGER PRIMARY KEY AUTOINCREMENT,
    NomProfil TEXT NOT NULL,
    NomProfilDefaut TEXT,
    IdProfilOrigineCopie INTEGER,
    Cloture INTEGER DEFAULT 0
);
CREATE TABLE TableDroits (
    IdDroit INTEGER PRIMARY KEY,
    NomDroit TEXT NOT NULL
);
CREATE TABLE TableProfilsDroits (
    IdProfilDroit INTEGER PRIMARY KEY AUTOINCREMENT,
    IdProfil INTEGER NOT NULL,
    IdDroit INTEGER NOT NULL
);
CREATE TABLE TableUtilisateurs (
    IdUtilisateur INTEGER PRIMARY KEY,
    Nom TEXT NOT NULL,
    IdProfil INTEGER,
    Cloture INTEGER DEFAULT 0
);
CREATE TABLE TableCapteurs (
    IdCapteur INTEGER PRIMARY KEY,
    Libelle TEXT
);
CREATE TABLE TableOverloads (
    IdOverload INTEGER PRIMARY KEY,
    Valeur REAL
);
CREATE TABLE TableSites (
    IdSite INTEGER PRIMARY KEY,
    Nom TEXT NOT NULL,
    Ville TEXT NOT NULL,
    Commentaire TEXT
);
CREATE TABLE TableJournal (
    Message TEXT NOT NULL,
    Horodatage TEXT DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE TableLien (
    A INTEGER NOT NULL,
    B INTEGER NOT NULL,
    PRIMARY KEY (A, B)
);
CREATE TABLE TableDescriptionChamps (
    NomChamp TEXT PRIMARY KEY,
    Libelle TEXT,
    Filtrable INTEGER,
    Scrutable INTEGER,
    Modifiable INTEGER,
    TypeChamp TEXT,
    ValeurDefaut TEXT
);

INSERT INTO TableProfils (IdProfil, NomProfil, NomProfilDefaut) VALUES (1, 'Admin', 'Admin');
INSERT INTO TableProfils (IdProfil, NomProfil) VALUES (2, 'Opérateur');
INSERT INTO TableDroits (IdDroit, NomDroit) VALUES (10, 'Lire'), (11, 'Ecrire'), (12, 'Supprimer');
INSERT INTO TableProfilsDroits (IdProfil, IdDroit) VALUES (1, 10), (1, 11);
INSERT INTO TableUtilisateurs (IdUtilisateur, Nom, IdProfil) VALUES (100, 'Alice', 1), (101, 'Bob', 1), (102, 'Carole', 2);
INSERT INTO TableOverloads (IdOverload, Valeur) VALUES (1, 2.5);
INSERT INTO TableDescriptionChamps (NomChamp, Libelle, Filtrable, Scrutable, Modifiable, TypeChamp, ValeurDefaut)
    VALUES ('TableDroits.NomDroit', 'Nom du droit', 1, 1, 0, 'texte', NULL);
"#;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acrn.db");
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(connect_options(&path).create_if_missing(true))
            .await
            .unwrap();
        sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();

        let vars: HashMap<String, String> =
            [("DATABASE_URL".to_string(), format!("sqlite:///{}", path.display()))].into();
        let settings = Settings::from_map(&vars).unwrap();
        let descriptions = {
            let mut conn = pool.acquire().await.unwrap();
            FieldDescriptions::load(&mut conn, &settings.description_table).await.unwrap()
        };
        let router = app(AppState::new(pool.clone(), descriptions), &settings);
        TestApp {
            router,
            pool,
            _dir: dir,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql).fetch_one(&self.pool).await.unwrap()
    }
}
