use std::path::Path;

use anyhow::{Context, Result};

/// Extrait les entiers d'une chaîne brute. Les séparateurs usuels des
/// exports d'extraction sont acceptés ; les jetons illisibles (bruit de
/// lecture) sont simplement ignorés, le normaliseur fait le tri ensuite.
pub fn parse_numbers(raw: &str) -> Vec<i64> {
    raw.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}

/// Lit la sortie du collaborateur d'extraction depuis un fichier texte.
/// Une erreur ici est une panne d'extraction, pas une lecture courte.
pub fn read_numbers_file(path: &Path) -> Result<Vec<i64>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    Ok(parse_numbers(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_spaces() {
        assert_eq!(parse_numbers("7 7 22 5"), vec![7, 7, 22, 5]);
    }

    #[test]
    fn test_parse_numbers_mixed_separators() {
        assert_eq!(parse_numbers("7,7; 22\n5"), vec![7, 7, 22, 5]);
    }

    #[test]
    fn test_parse_numbers_skips_noise_tokens() {
        assert_eq!(parse_numbers("7 xx 22 -- 5"), vec![7, 22, 5]);
    }

    #[test]
    fn test_parse_numbers_keeps_out_of_range_for_normalizer() {
        // Le filtrage 0-36 appartient au normaliseur, pas au parseur
        assert_eq!(parse_numbers("99 7 -1"), vec![99, 7, -1]);
    }

    #[test]
    fn test_parse_numbers_empty() {
        assert!(parse_numbers("").is_empty());
        assert!(parse_numbers("   \n  ").is_empty());
    }
}
