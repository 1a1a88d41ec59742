use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::StateStore;

pub const USAGE_KEY: &str = "usage";
pub const SESSION_KEY: &str = "session_signals";

pub const DEFAULT_DAILY_LIMIT: u32 = 50;
pub const DEFAULT_SESSION_LIMIT: u32 = 10;

/// Compteur journalier persisté : (date ISO, nombre d'appels).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageState {
    pub date: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageDecision {
    Allow,
    /// Entre 85 % et 90 % du budget : l'appelant peut demander confirmation.
    SoftWarn,
    /// Budget de sécurité atteint : aucun appel ne doit partir.
    Deny,
}

/// Garde-fou budgétaire consulté avant tout appel au collaborateur
/// d'analyse payant. Pure vérification de quota, aucune logique métier.
pub struct UsageGuard<'a, S: StateStore> {
    store: &'a S,
    daily_limit: u32,
}

impl<'a, S: StateStore> UsageGuard<'a, S> {
    pub fn new(store: &'a S, daily_limit: u32) -> Self {
        Self { store, daily_limit }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Plafond de sécurité : 90 % du budget journalier, arrondi à l'entier
    /// inférieur.
    pub fn safe_limit(&self) -> u32 {
        self.daily_limit * 9 / 10
    }

    /// Seuil d'alerte douce : 85 % du budget journalier.
    pub fn warn_threshold(&self) -> u32 {
        self.daily_limit * 85 / 100
    }

    /// État courant pour la date donnée (AAAA-MM-JJ). Une valeur absente,
    /// corrompue ou datée d'un autre jour repart de zéro.
    pub fn state(&self, today: &str) -> Result<UsageState> {
        let stored = match self.store.get(USAGE_KEY)? {
            Some(raw) => serde_json::from_str::<UsageState>(&raw).unwrap_or_default(),
            None => UsageState::default(),
        };
        if stored.date == today {
            Ok(stored)
        } else {
            Ok(UsageState {
                date: today.to_string(),
                count: 0,
            })
        }
    }

    /// Décision de quota. Ne modifie jamais le compteur.
    pub fn check(&self, today: &str) -> Result<UsageDecision> {
        let state = self.state(today)?;
        if state.count >= self.safe_limit() {
            Ok(UsageDecision::Deny)
        } else if state.count >= self.warn_threshold() {
            Ok(UsageDecision::SoftWarn)
        } else {
            Ok(UsageDecision::Allow)
        }
    }

    /// À appeler après chaque appel réussi au collaborateur.
    pub fn record_success(&self, today: &str) -> Result<()> {
        let mut state = self.state(today)?;
        state.count += 1;
        self.store.set(USAGE_KEY, &serde_json::to_string(&state)?)
    }
}

/// Compteur de signaux de la session courante : simple incitation à la
/// pause, remis à zéro sur confirmation explicite de l'utilisateur.
pub struct SessionCounter<'a, S: StateStore> {
    store: &'a S,
    limit: u32,
}

impl<'a, S: StateStore> SessionCounter<'a, S> {
    pub fn new(store: &'a S, limit: u32) -> Self {
        Self { store, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn count(&self) -> Result<u32> {
        let count = match self.store.get(SESSION_KEY)? {
            Some(raw) => serde_json::from_str::<u32>(&raw).unwrap_or(0),
            None => 0,
        };
        Ok(count)
    }

    /// Incrémente et renvoie le nouveau total.
    pub fn record(&self) -> Result<u32> {
        let count = self.count()? + 1;
        self.store.set(SESSION_KEY, &count.to_string())?;
        Ok(count)
    }

    pub fn limit_reached(&self) -> Result<bool> {
        Ok(self.count()? >= self.limit)
    }

    pub fn reset(&self) -> Result<()> {
        self.store.set(SESSION_KEY, "0")
    }
}
