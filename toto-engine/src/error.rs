use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Entrée invalide : {0}")]
    InvalidInput(String),

    /// Ne doit jamais arriver : 49 numéros pour au plus 6 places.
    #[error("Sélection incomplète : {picked} numéros choisis sur {needed}")]
    SelectionUnderflow { needed: usize, picked: usize },

    #[error("Erreur d'E/S : {0}")]
    Io(#[from] std::io::Error),

    #[error("Erreur JSON : {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
