use anyhow::{bail, Result};

pub const POCKET_COUNT: usize = 37;

/// Voisins physiques immédiats de chaque poche sur la roue européenne,
/// indexés par le numéro de la poche. L'ordre des paires suit le sens
/// de lecture de la table de référence.
pub const NEIGHBORS: [[u8; 2]; POCKET_COUNT] = [
    [26, 32], // 0
    [33, 20], // 1
    [21, 25], // 2
    [35, 26], // 3
    [19, 21], // 4
    [10, 24], // 5
    [34, 27], // 6
    [29, 28], // 7
    [30, 23], // 8
    [31, 22], // 9
    [23, 5],  // 10
    [36, 30], // 11
    [28, 35], // 12
    [27, 36], // 13
    [20, 31], // 14
    [32, 19], // 15
    [24, 33], // 16
    [25, 34], // 17
    [22, 29], // 18
    [15, 4],  // 19
    [1, 14],  // 20
    [4, 2],   // 21
    [9, 18],  // 22
    [8, 10],  // 23
    [5, 16],  // 24
    [2, 17],  // 25
    [3, 0],   // 26
    [6, 13],  // 27
    [7, 12],  // 28
    [18, 7],  // 29
    [11, 8],  // 30
    [14, 9],  // 31
    [0, 15],  // 32
    [16, 1],  // 33
    [17, 6],  // 34
    [12, 3],  // 35
    [13, 11], // 36
];

/// Poches rouges de la roue européenne standard (affichage uniquement).
pub const RED_POCKETS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketColor {
    Red,
    Black,
    Green,
}

pub fn pocket_color(n: u8) -> PocketColor {
    if n == 0 {
        PocketColor::Green
    } else if RED_POCKETS.contains(&n) {
        PocketColor::Red
    } else {
        PocketColor::Black
    }
}

/// Voisins physiques d'une poche. Le repli {0, 1} ne devrait jamais
/// servir pour une entrée valide 0-36.
pub fn neighbors(n: u8) -> [u8; 2] {
    if (n as usize) < POCKET_COUNT {
        NEIGHBORS[n as usize]
    } else {
        [0, 1]
    }
}

/// Dernier chiffre de la poche (0-9).
pub fn terminal(n: u8) -> u8 {
    n % 10
}

/// Douzaine de la poche : 0 pour le zéro, sinon 1 (1-12), 2 (13-24) ou 3 (25-36).
pub fn dozen(n: u8) -> u8 {
    if n == 0 {
        0
    } else if n <= 12 {
        1
    } else if n <= 24 {
        2
    } else {
        3
    }
}

/// Vérifie que la table de voisinage couvre les 37 poches et reste
/// symétrique : si b est voisin de a, alors a est voisin de b.
pub fn validate_wheel() -> Result<()> {
    for n in 0..POCKET_COUNT as u8 {
        let pair = NEIGHBORS[n as usize];
        for &v in &pair {
            if v as usize >= POCKET_COUNT {
                bail!("Voisin {} de la poche {} hors limites", v, n);
            }
            if !NEIGHBORS[v as usize].contains(&n) {
                bail!("Table de voisinage asymétrique : {} ↔ {}", n, v);
            }
        }
        if pair[0] == pair[1] {
            bail!("Voisins en double pour la poche {}", n);
        }
    }
    Ok(())
}
