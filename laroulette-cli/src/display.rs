use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use laroulette_core::guard::UsageState;
use laroulette_core::models::{format_dozens, Action, Recommendation};
use laroulette_core::wheel::{pocket_color, PocketColor};
use laroulette_db::db::JournalEntry;

fn action_color(action: Action) -> Color {
    match action {
        Action::Bet => Color::Green,
        Action::Wait => Color::Yellow,
        Action::Error => Color::Red,
    }
}

fn history_cells(history: &[u8]) -> Vec<Cell> {
    history
        .iter()
        .map(|&n| {
            let color = match pocket_color(n) {
                PocketColor::Red => Color::Red,
                PocketColor::Black => Color::Grey,
                PocketColor::Green => Color::Green,
            };
            Cell::new(format!("{:2}", n)).fg(color)
        })
        .collect()
}

pub fn display_recommendation(rec: &Recommendation) {
    println!("\n🎯 Recommandation\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Action"),
        Cell::new(rec.action.to_string()).fg(action_color(rec.action)),
    ]);
    table.add_row(vec![
        Cell::new("Confiance"),
        Cell::new(format!("{} %", rec.confidence)),
    ]);

    let terminals = if rec.terminals.is_empty() {
        "—".to_string()
    } else {
        rec.terminals
            .iter()
            .map(|t| format!("T{}", t))
            .collect::<Vec<_>>()
            .join("  ")
    };
    table.add_row(vec![Cell::new("Terminaux"), Cell::new(terminals)]);
    table.add_row(vec![
        Cell::new("Douzaines"),
        Cell::new(format_dozens(&rec.dozens)),
    ]);
    table.add_row(vec![Cell::new("Analyse"), Cell::new(&rec.reasoning)]);

    println!("{table}");

    if !rec.detected_history.is_empty() {
        println!("\n🎡 Historique détecté (du plus récent au plus ancien)\n");
        let mut history = Table::new();
        history
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        history.add_row(history_cells(&rec.detected_history));
        println!("{history}");
    }
}

pub fn display_journal(entries: &[JournalEntry]) {
    if entries.is_empty() {
        println!("Aucune analyse enregistrée.");
        return;
    }

    println!("\n📒 Dernières recommandations\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Horodatage",
            "Action",
            "Confiance",
            "Terminaux",
            "Douzaines",
            "Historique lu",
        ]);

    for entry in entries {
        let color = match entry.action.as_str() {
            "BET" => Color::Green,
            "WAIT" => Color::Yellow,
            _ => Color::Red,
        };
        table.add_row(vec![
            Cell::new(&entry.timestamp),
            Cell::new(&entry.action).fg(color),
            Cell::new(format!("{} %", entry.confidence)),
            Cell::new(&entry.terminals),
            Cell::new(&entry.dozens),
            Cell::new(&entry.history),
        ]);
    }
    println!("{table}");
}

pub fn display_usage(state: &UsageState, daily_limit: u32, warn_threshold: u32, safe_limit: u32) {
    println!("\n🧮 Compteur d'utilisation\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let status = if state.count >= safe_limit {
        Cell::new("BLOQUÉ").fg(Color::Red)
    } else if state.count >= warn_threshold {
        Cell::new("ZONE D'ALERTE").fg(Color::Yellow)
    } else {
        Cell::new("OK").fg(Color::Green)
    };

    table.add_row(vec![Cell::new("Date"), Cell::new(&state.date)]);
    table.add_row(vec![
        Cell::new("Analyses effectuées"),
        Cell::new(state.count.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Budget quotidien"),
        Cell::new(daily_limit.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Seuil d'alerte (85 %)"),
        Cell::new(warn_threshold.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Plafond de sécurité (90 %)"),
        Cell::new(safe_limit.to_string()),
    ]);
    table.add_row(vec![Cell::new("État"), status]);

    println!("{table}");
}
