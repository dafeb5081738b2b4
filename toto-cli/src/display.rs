use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use toto_db::models::{Draw, NumberStats, Temperature};
use toto_engine::backtest::BacktestReport;
use toto_engine::check::{PrizeGroup, TicketCheck};
use toto_engine::stats::RangeMix;
use toto_engine::PredictionResult;

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn temperature_color(temperature: Temperature) -> Color {
    match temperature {
        Temperature::Hot => Color::Red,
        Temperature::Cold => Color::Blue,
        Temperature::Neutral => Color::White,
    }
}

fn format_range_mix(mix: &RangeMix) -> String {
    let (low, mid, high) = mix.shares();
    format!(
        "bas (1-16) {} [{:.0} %] · moyen (17-33) {} [{:.0} %] · haut (34-49) {} [{:.0} %]",
        mix.low, low, mix.mid, mid, mix.high, high
    )
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Numéros", "Complémentaire"]);
    for draw in draws {
        table.add_row(vec![
            draw.date.clone(),
            join_numbers(&draw.sorted_numbers()),
            format!("{:2}", draw.additional),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(stats: &[NumberStats], ranges: &RangeMix, window: usize) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);
    println!("Répartition : {}\n", format_range_mix(ranges));

    let mut table = new_table(vec!["Numéro", "Fréquence", "Retard", "Température"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)),
            Cell::new(stat.frequency),
            Cell::new(stat.gap),
            Cell::new(stat.temperature.to_string()).fg(temperature_color(stat.temperature)),
        ]);
    }
    println!("{table}");
}

pub fn display_prediction(result: &PredictionResult, top: usize) {
    println!(
        "\n🎯 Prédiction sur {} tirages (décroissance {})\n",
        result.window, result.regime
    );

    let mut ranked: Vec<_> = result.scores.values().collect();
    ranked.sort_by(|a, b| {
        b.composite_score
            .total_cmp(&a.composite_score)
            .then(a.value.cmp(&b.value))
    });

    let mut table = new_table(vec!["Numéro", "Fréquence", "Compatibilité", "Température", "Score", "Choix"]);
    for score in ranked.iter().take(top) {
        let choice = if result.anchors.contains(&score.value) {
            "base".to_string()
        } else if let Some(pick) = result.picks.iter().find(|p| p.number == score.value) {
            pick.tier.to_string()
        } else if result.cold.contains(&score.value) {
            "froid".to_string()
        } else {
            String::new()
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", score.value)),
            Cell::new(format!("{:.3}", score.frequency_score)),
            Cell::new(format!("{:.3}", score.compatibility_score)),
            Cell::new(score.temperature.to_string()).fg(temperature_color(score.temperature)),
            Cell::new(format!("{:.3}", score.composite_score)),
            Cell::new(choice),
        ]);
    }
    println!("{table}");

    // Choix hors du top affiché
    for pick in &result.picks {
        if !ranked.iter().take(top).any(|s| s.value == pick.number) {
            println!("  {:2} retenu en {}", pick.number, pick.tier);
        }
    }

    println!("\n🎲 Grille : {}", join_numbers(&result.values));
    println!("   Répartition : {}", format_range_mix(&result.range_mix));
}

pub fn display_check(ticket: &[u8], draw: &Draw, check: &TicketCheck) {
    println!("\nTirage du {} : {}  + {:2}", draw.date, join_numbers(&draw.sorted_numbers()), draw.additional);
    let mut sorted = ticket.to_vec();
    sorted.sort();
    println!("Grille          : {}", join_numbers(&sorted));
    println!(
        "Bons numéros    : {} ({})",
        check.matched.len(),
        if check.matched.is_empty() { "aucun".to_string() } else { join_numbers(&check.matched) }
    );
    println!("Complémentaire  : {}", if check.additional_hit { "oui" } else { "non" });
    match check.group {
        Some(group) => println!("Gain            : {}", group),
        None => println!("Gain            : aucun"),
    }
}

pub fn display_backtest(report: &BacktestReport) {
    println!("\n📈 Backtest sur {} tirages\n", report.tests);

    let mut table = new_table(vec!["Bons numéros", "Tirages", "%"]);
    for (k, &count) in report.hits.iter().enumerate() {
        let pct = if report.tests > 0 { count as f64 * 100.0 / report.tests as f64 } else { 0.0 };
        table.add_row(vec![k.to_string(), count.to_string(), format!("{:.1}", pct)]);
    }
    println!("{table}");

    let mut table = new_table(vec!["Groupe", "Gains"]);
    for group in PrizeGroup::ALL {
        table.add_row(vec![group.to_string(), report.prize_count(group).to_string()]);
    }
    println!("{table}");

    println!("Moyenne de bons numéros : {:.3}", report.average_hits());
    println!("Complémentaire trouvé   : {}", report.additional_hits);
    println!("Tirages gagnants        : {}", report.winning_tests());
}
