//! HTTP handlers: generic table CRUD, profile workflows, sensor-console tables.

pub mod capteur;
pub mod profile;
pub mod tables;
