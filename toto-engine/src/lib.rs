//! Moteur de scoring et de sélection par paliers pour le TOTO (6 numéros parmi 49).
//!
//! Chaque prédiction est une fonction pure de l'historique, des numéros de base
//! et de la configuration : aucun état partagé, aucun aléa.

pub mod backtest;
pub mod check;
pub mod cold;
pub mod compatibility;
pub mod config;
pub mod decay;
pub mod error;
pub mod frequency;
pub mod history;
pub mod predict;
pub mod scoring;
pub mod selector;
pub mod stats;
pub mod temperature;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use predict::{predict, PredictionResult};
