use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::models::{format_dozens, Action, Recommendation};
use crate::normalizer;
use crate::wheel;

/// Nombre maximal de numéros renvoyés en écho pour l'affichage.
pub const DISPLAY_CAP: usize = 10;

/// Analyse un historique déjà normalisé (longueur >= 3, numéros 0-36).
/// Déterministe pour les règles 1 et 2 ; la branche par défaut et le
/// complément de terminaux sont les seuls points de tirage aléatoire.
pub fn analyze(history: &[u8], rng: &mut impl Rng) -> Recommendation {
    debug_assert!(history.len() >= normalizer::MIN_HISTORY);

    let last = history[0];
    let previous = history[1];
    let last_terminal = wheel::terminal(last);
    let previous_terminal = wheel::terminal(previous);

    // Règles en ordre strict de priorité.
    let (mut terminals, confidence, rule_text) = if last_terminal == previous_terminal {
        // Règle 1 : répétition de terminal.
        (
            vec![
                last_terminal,
                (last_terminal + 3) % 10,
                (last_terminal + 7) % 10,
            ],
            95u8,
            format!(
                "Répétition forte du terminal {}. Suivi du flux en cours.",
                last_terminal
            ),
        )
    } else if last_terminal.abs_diff(previous_terminal) == 1 {
        // Règle 2 : terminaux consécutifs (ex : 2 puis 3).
        (
            vec![
                (last_terminal + 1) % 10,
                (last_terminal + 2) % 10,
                (last_terminal + 9) % 10,
            ],
            88u8,
            "Séquence de terminaux voisins détectée. Mise sur la continuité.".to_string(),
        )
    } else {
        // Règle 3 : pas de motif clair, on vise la zone physique du dernier
        // numéro (voisins de roue) plus un terminal éloigné.
        let pair = wheel::neighbors(last);
        (
            vec![pair[0] % 10, pair[1] % 10, (last + 5) % 10],
            rng.random_range(75..=89u8),
            format!("Cible sur la zone du numéro {} (voisins et miroirs).", last),
        )
    };

    terminals.sort_unstable();
    terminals.dedup();
    fill_terminals(&mut terminals, rng);

    let dozens = suggest_dozens(last, previous);

    let mut detected = history.to_vec();
    detected.truncate(DISPLAY_CAP);

    Recommendation {
        terminals,
        reasoning: format!(
            "{} Douzaines visées : {}.",
            rule_text,
            format_dozens(&dozens)
        ),
        dozens,
        confidence,
        action: Action::Bet,
        detected_history: detected,
    }
}

/// Mode repli quand la lecture est insuffisante (moins de 3 numéros) :
/// recommandation d'attente à confiance moyenne, jamais une erreur.
pub fn fallback(partial: &[u8], rng: &mut impl Rng) -> Recommendation {
    let t = rng.random_range(0..10u8);
    let mut terminals = vec![t, (t + 3) % 10, (t + 7) % 10];
    terminals.sort_unstable();

    Recommendation {
        terminals,
        dozens: vec![1, 2],
        confidence: 60,
        action: Action::Wait,
        reasoning: format!(
            "Lecture partielle ({} numéro(s)). Signal instable, attendez le prochain tour.",
            partial.len()
        ),
        detected_history: partial.to_vec(),
    }
}

/// Complète jusqu'à 3 terminaux distincts après déduplication.
fn fill_terminals(terminals: &mut Vec<u8>, rng: &mut impl Rng) {
    while terminals.len() < 3 {
        let t = rng.random_range(0..10u8);
        if !terminals.contains(&t) {
            terminals.push(t);
        }
    }
}

/// Choix des douzaines, indépendant de la règle de terminaux retenue.
fn suggest_dozens(last: u8, previous: u8) -> Vec<u8> {
    let last_dozen = wheel::dozen(last);
    let previous_dozen = wheel::dozen(previous);

    let mut dozens = if last_dozen == 0 {
        // Zéro sorti : protection sur les douzaines 1 et 2.
        vec![1, 2]
    } else if last_dozen == previous_dozen {
        vec![last_dozen, (last_dozen % 3) + 1]
    } else {
        let mut d: Vec<u8> = [last_dozen, previous_dozen]
            .into_iter()
            .filter(|&x| x != 0)
            .collect();
        if d.len() < 2 {
            d.push((d[0] % 3) + 1);
        }
        d
    };

    dozens.sort_unstable();
    dozens
}

/// Capacité commune à tous les moteurs de recommandation : une séquence
/// brute en entrée, une recommandation valide en sortie, toujours.
pub trait AdviceEngine {
    fn name(&self) -> &str;
    /// raw[0] = dernier numéro sorti. Ne renvoie jamais d'erreur :
    /// une entrée inutilisable produit une recommandation WAIT.
    fn advise(&mut self, raw: &[i64]) -> Recommendation;
}

/// Moteur piloté par les motifs observés (le seul retenu : la variante
/// purement aléatoire n'a pas de logique de décision à préserver).
pub struct PatternEngine {
    rng: StdRng,
}

impl PatternEngine {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }
}

impl AdviceEngine for PatternEngine {
    fn name(&self) -> &str {
        "Pattern"
    }

    fn advise(&mut self, raw: &[i64]) -> Recommendation {
        let norm = normalizer::normalize(raw);
        if norm.accepted {
            analyze(&norm.history, &mut self.rng)
        } else {
            fallback(&norm.history, &mut self.rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn assert_valid_terminals(rec: &Recommendation) {
        assert_eq!(rec.terminals.len(), 3);
        for &t in &rec.terminals {
            assert!(t <= 9, "Terminal {} hors limites", t);
        }
        for i in 0..rec.terminals.len() {
            for j in (i + 1)..rec.terminals.len() {
                assert_ne!(rec.terminals[i], rec.terminals[j]);
            }
        }
    }

    fn assert_valid_dozens(rec: &Recommendation) {
        assert!(rec.dozens.len() <= 2);
        for &d in &rec.dozens {
            assert!((1..=3).contains(&d));
        }
        if rec.dozens.len() == 2 {
            assert_ne!(rec.dozens[0], rec.dozens[1]);
        }
    }

    #[test]
    fn test_repeat_terminal_rule() {
        let rec = analyze(&[7, 7, 22, 5], &mut rng(1));
        assert_eq!(rec.action, Action::Bet);
        assert_eq!(rec.confidence, 95);
        // 7, (7+3)%10 = 0, (7+7)%10 = 4, triés
        assert_eq!(rec.terminals, vec![0, 4, 7]);
        assert_valid_dozens(&rec);
    }

    #[test]
    fn test_repeat_terminal_across_pockets() {
        // terminal(13) = terminal(23) = 3
        let rec = analyze(&[13, 23, 5], &mut rng(1));
        assert_eq!(rec.confidence, 95);
        assert_eq!(rec.terminals, vec![0, 3, 6]);
    }

    #[test]
    fn test_adjacent_terminal_rule() {
        // terminal(13) = 3, terminal(12) = 2 : écart de 1
        let rec = analyze(&[13, 12, 5], &mut rng(1));
        assert_eq!(rec.action, Action::Bet);
        assert_eq!(rec.confidence, 88);
        // (3+1, 3+2, 3-1) mod 10 = {4, 5, 2}, triés
        assert_eq!(rec.terminals, vec![2, 4, 5]);
        assert_valid_terminals(&rec);
    }

    #[test]
    fn test_adjacent_terminal_wraps() {
        // terminal(9) = 9, terminal(8) = 8
        let rec = analyze(&[9, 8, 22], &mut rng(1));
        assert_eq!(rec.confidence, 88);
        // (9+1, 9+2, 9-1) mod 10 = {0, 1, 8}
        assert_eq!(rec.terminals, vec![0, 1, 8]);
    }

    #[test]
    fn test_rules_one_and_two_are_deterministic() {
        // Propriété d'idempotence : aucune influence du RNG sur ces branches.
        let a = analyze(&[7, 7, 22, 5], &mut rng(1));
        let b = analyze(&[7, 7, 22, 5], &mut rng(999));
        assert_eq!(a.terminals, b.terminals);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.action, b.action);

        let a = analyze(&[13, 12, 5], &mut rng(2));
        let b = analyze(&[13, 12, 5], &mut rng(777));
        assert_eq!(a.terminals, b.terminals);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_default_rule_uses_wheel_neighbors() {
        // terminal(0) = 0, terminal(15) = 5 : ni répétition ni voisinage
        let rec = analyze(&[0, 15, 22], &mut rng(42));
        assert_eq!(rec.action, Action::Bet);
        assert!((75..=89).contains(&rec.confidence));
        // Voisins de 0 : 26 et 32 → terminaux 6 et 2, plus (0+5)%10 = 5
        assert_eq!(rec.terminals, vec![2, 5, 6]);
        assert_valid_terminals(&rec);
    }

    #[test]
    fn test_default_rule_fills_after_collision() {
        // Voisins de 4 : 19 et 21 → terminaux 9 et 1 ; (4+5)%10 = 9 (doublon)
        let rec = analyze(&[4, 17, 30], &mut rng(3));
        assert_valid_terminals(&rec);
        assert!(rec.terminals.contains(&9));
        assert!(rec.terminals.contains(&1));
    }

    #[test]
    fn test_zero_drawn_suggests_first_two_dozens() {
        let rec = analyze(&[0, 15, 22], &mut rng(4));
        assert_eq!(rec.dozens, vec![1, 2]);
    }

    #[test]
    fn test_equal_dozens_extend_cyclically() {
        // 5 et 7 : douzaine 1 les deux fois → [1, 2]
        let rec = analyze(&[5, 7, 22], &mut rng(5));
        assert_eq!(rec.dozens, vec![1, 2]);

        // 30 et 27 : douzaine 3 les deux fois → 3 puis (3%3)+1 = 1, triées
        let rec = analyze(&[30, 27, 5], &mut rng(5));
        assert_eq!(rec.dozens, vec![1, 3]);
    }

    #[test]
    fn test_distinct_dozens_both_covered() {
        // 5 (douzaine 1) et 30 (douzaine 3)
        let rec = analyze(&[5, 30, 22], &mut rng(6));
        assert_eq!(rec.dozens, vec![1, 3]);
    }

    #[test]
    fn test_previous_zero_completes_dozens() {
        // 5 (douzaine 1) après un zéro : le zéro est écarté, complété par 2
        let rec = analyze(&[5, 0, 22], &mut rng(7));
        assert_eq!(rec.dozens, vec![1, 2]);
    }

    #[test]
    fn test_detected_history_capped_at_ten() {
        let history: Vec<u8> = vec![7, 7, 1, 2, 3, 4, 5, 6, 8, 9, 10, 11];
        let rec = analyze(&history, &mut rng(8));
        assert_eq!(rec.detected_history.len(), 10);
        assert_eq!(rec.detected_history[0], 7);
    }

    #[test]
    fn test_reasoning_mentions_dozens() {
        let rec = analyze(&[7, 7, 22, 5], &mut rng(9));
        assert!(rec.reasoning.contains("Douzaines visées"));
        assert!(rec.reasoning.contains("terminal 7"));
    }

    #[test]
    fn test_fallback_shape() {
        let rec = fallback(&[], &mut rng(10));
        assert_eq!(rec.action, Action::Wait);
        assert_eq!(rec.confidence, 60);
        assert_eq!(rec.dozens, vec![1, 2]);
        assert!(rec.detected_history.is_empty());
        assert_valid_terminals(&rec);
        // Triés en ordre croissant
        let mut sorted = rec.terminals.clone();
        sorted.sort_unstable();
        assert_eq!(rec.terminals, sorted);
    }

    #[test]
    fn test_fallback_echoes_partial_history() {
        let rec = fallback(&[5, 17], &mut rng(11));
        assert_eq!(rec.detected_history, vec![5, 17]);
        assert!(rec.reasoning.contains("2 numéro(s)"));
    }

    #[test]
    fn test_engine_routes_short_input_to_fallback() {
        let mut engine = PatternEngine::new(Some(12));
        let rec = engine.advise(&[7, 22]);
        assert_eq!(rec.action, Action::Wait);
        assert_eq!(rec.confidence, 60);
        assert_eq!(rec.detected_history, vec![7, 22]);
    }

    #[test]
    fn test_engine_filters_noise_then_analyzes() {
        let mut engine = PatternEngine::new(Some(13));
        let rec = engine.advise(&[7, 99, 7, -1, 22, 5]);
        assert_eq!(rec.action, Action::Bet);
        assert_eq!(rec.confidence, 95);
        assert_eq!(rec.terminals, vec![0, 4, 7]);
    }

    #[test]
    fn test_terminals_always_three_distinct() {
        let mut engine = PatternEngine::new(Some(14));
        let samples: [&[i64]; 5] = [
            &[7, 7, 22],
            &[13, 12, 5],
            &[0, 15, 22],
            &[4, 17, 30],
            &[36, 13, 11, 30],
        ];
        for raw in samples {
            let rec = engine.advise(raw);
            assert_valid_terminals(&rec);
            assert_valid_dozens(&rec);
        }
    }
}
