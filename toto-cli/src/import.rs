use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::path::Path;
use toto_db::rusqlite::Connection;

use toto_db::db::insert_draw;
use toto_db::models::{Draw, validate_draw};

const CSV_HEADER: [&str; 8] = ["Date", "N1", "N2", "N3", "N4", "N5", "N6", "Additional"];

/// Accepte `31-Oct-25` (format des résultats publiés) ou `2025-10-31`.
pub fn parse_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%d-%b-%y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .with_context(|| format!("Format de date invalide: '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    if record.len() < CSV_HEADER.len() {
        bail!("{} colonnes au lieu de {}", record.len(), CSV_HEADER.len());
    }

    let date = parse_date(get(0)?)?;
    let numbers: [u8; 6] = [
        get_u8(1)?,
        get_u8(2)?,
        get_u8(3)?,
        get_u8(4)?,
        get_u8(5)?,
        get_u8(6)?,
    ];
    let additional = get_u8(7)?;
    validate_draw(&numbers, additional)?;

    Ok(Draw { date, numbers, additional })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        let draw = record_result
            .map_err(anyhow::Error::from)
            .and_then(|record| parse_record(&record));
        match draw {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    tracing::warn!(line = result.total_records, "insertion impossible: {e:#}");
                    result.errors += 1;
                }
            },
            Err(e) => {
                tracing::warn!(line = result.total_records, "ligne rejetée: {e:#}");
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

/// Écrit les tirages (le plus récent en premier) au même format que l'import, dates ISO.
pub fn export_csv(draws: &[Draw], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;
    writer.write_record(CSV_HEADER)?;
    for draw in draws {
        let mut row = vec![draw.date.clone()];
        row.extend(draw.numbers.iter().map(|n| n.to_string()));
        row.push(draw.additional.to_string());
        writer.write_record(&row)?;
    }
    writer.flush().context("Échec de l'écriture CSV")?;
    Ok(())
}
