/// Taille maximale d'historique conservée pour l'analyse.
pub const MAX_HISTORY: usize = 12;
/// En dessous de ce seuil, la lecture est jugée insuffisante
/// et l'analyse bascule sur le mode repli (WAIT).
pub const MIN_HISTORY: usize = 3;

#[derive(Debug, Clone)]
pub struct Normalized {
    pub accepted: bool,
    /// history[0] = dernier numéro sorti. Conservé même en cas de refus,
    /// pour que l'utilisateur voie ce qui a réellement été lu.
    pub history: Vec<u8>,
}

/// Filtre une séquence brute issue de l'extraction : les valeurs hors 0-36
/// (bruit de lecture) sont écartées, la séquence est tronquée aux 12
/// entrées les plus récentes. Une séquence courte n'est pas une erreur,
/// c'est une branche normale.
pub fn normalize(raw: &[i64]) -> Normalized {
    let history: Vec<u8> = raw
        .iter()
        .filter(|&&n| (0..=36).contains(&n))
        .map(|&n| n as u8)
        .take(MAX_HISTORY)
        .collect();

    Normalized {
        accepted: history.len() >= MIN_HISTORY,
        history,
    }
}
