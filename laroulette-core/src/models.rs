use anyhow::{bail, Result};

/// Décision finale rendue à l'utilisateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Bet,
    Wait,
    Error,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Bet => write!(f, "BET"),
            Action::Wait => write!(f, "WAIT"),
            Action::Error => write!(f, "ERROR"),
        }
    }
}

/// Sortie unique du moteur de décision.
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// 3 terminaux distincts (0-9) dès que l'action est BET ou WAIT.
    pub terminals: Vec<u8>,
    /// 0 à 2 douzaines distinctes dans {1, 2, 3}, triées.
    pub dozens: Vec<u8>,
    /// Indice de confiance (0-100), purement informatif.
    pub confidence: u8,
    pub action: Action,
    pub reasoning: String,
    /// Écho de la séquence réellement utilisée (10 numéros max).
    pub detected_history: Vec<u8>,
}

impl Recommendation {
    /// État ERROR remonté tel quel depuis le collaborateur d'extraction.
    /// Le moteur lui-même ne produit jamais cet état.
    pub fn extraction_error(message: &str) -> Self {
        Self {
            terminals: Vec::new(),
            dozens: Vec::new(),
            confidence: 0,
            action: Action::Error,
            reasoning: message.to_string(),
            detected_history: Vec::new(),
        }
    }
}

pub fn validate_pocket(n: u8) -> Result<()> {
    if n > 36 {
        bail!("Numéro {} hors limites (0-36)", n);
    }
    Ok(())
}

pub fn dozen_label(d: u8) -> &'static str {
    match d {
        1 => "1re",
        2 => "2e",
        3 => "3e",
        _ => "?",
    }
}

pub fn format_dozens(dozens: &[u8]) -> String {
    if dozens.is_empty() {
        return "—".to_string();
    }
    dozens
        .iter()
        .map(|&d| dozen_label(d).to_string())
        .collect::<Vec<_>>()
        .join(" et ")
}
