use std::env;
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

const PROBABILITY_CARD_TEST: f64 = 0.02;
const PROBABILITY_BURST: f64 = 0.05;
const PROBABILITY_CHARGEBACK: f64 = 0.08;
const PROBABILITY_SHARED_DEVICE: f64 = 0.03;

struct GeneratorConfig {
    num_records: usize,
    num_cards: usize,
    num_merchants: usize,
    seed: u64,
    output_path: String,
}

impl GeneratorConfig {
    fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let num_records = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);
        let num_cards = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(50_000);
        let seed = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(7);

        Self {
            num_records,
            num_cards: num_cards.max(1),
            num_merchants: (num_cards / 10).max(1),
            seed,
            output_path: "samples/stress_test.csv".to_string(),
        }
    }
}

struct Card {
    number: String,
    user_id: u32,
    device_id: u32,
    last_seen: NaiveDateTime,
}

fn random_amount(rng: &mut StdRng, low: f64, high: f64) -> Decimal {
    Decimal::from_f64(rng.random_range(low..high))
        .map(|amount| amount.round_dp(2))
        .unwrap_or(Decimal::ONE)
}

fn write_row(writer: &mut impl Write, transaction_id: u64, merchant_id: u32, card: &Card, amount: Decimal, chargeback: bool) -> io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{},{},{},{},{}",
        transaction_id,
        merchant_id,
        card.user_id,
        card.number,
        card.last_seen.format("%Y-%m-%dT%H:%M:%S%.6f"),
        amount,
        card.device_id,
        if chargeback { "TRUE" } else { "FALSE" }
    )
}

fn main() -> io::Result<()> {
    let config = GeneratorConfig::from_args();

    println!(
        "Generating {} transactions for {} cards across {} merchants in {}...",
        config.num_records, config.num_cards, config.num_merchants, config.output_path
    );

    if let Some(parent) = Path::new(&config.output_path).parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(&config.output_path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "transaction_id,merchant_id,user_id,card_number,transaction_date,transaction_amount,device_id,has_cbk")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let start = NaiveDate::from_ymd_opt(2019, 11, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| io::Error::other("invalid start date"))?;

    let mut cards: Vec<Card> = (0..config.num_cards)
        .map(|index| Card {
            number: format!("{:06}******{:04}", rng.random_range(400_000..560_000), index % 10_000),
            user_id: rng.random_range(1..200_000),
            device_id: rng.random_range(100_000..900_000),
            last_seen: start + TimeDelta::seconds(rng.random_range(0..86_400 * 30)),
        })
        .collect();

    let mut transaction_id: u64 = 21_320_000;
    let mut written = 0usize;

    while written < config.num_records {
        let index = rng.random_range(0..cards.len());
        let merchant_id = rng.random_range(1..config.num_merchants as u32 + 1);

        if rng.random_bool(PROBABILITY_SHARED_DEVICE) {
            let other = rng.random_range(0..cards.len());
            cards[index].device_id = cards[other].device_id;
        }

        let gap = if rng.random_bool(PROBABILITY_BURST) {
            TimeDelta::seconds(rng.random_range(0..180))
        } else {
            TimeDelta::seconds(rng.random_range(600..86_400 * 3))
        };
        cards[index].last_seen += gap;

        if rng.random_bool(PROBABILITY_CARD_TEST) && written + 1 < config.num_records {
            let chargeback = rng.random_bool(0.5);
            write_row(&mut writer, transaction_id, merchant_id, &cards[index], random_amount(&mut rng, 0.5, 4.99), chargeback)?;
            transaction_id += 1;

            cards[index].last_seen += TimeDelta::seconds(rng.random_range(5..120));
            write_row(&mut writer, transaction_id, merchant_id, &cards[index], random_amount(&mut rng, 200.0, 3_000.0), chargeback)?;
            transaction_id += 1;
            written += 2;
            continue;
        }

        let chargeback = rng.random_bool(PROBABILITY_CHARGEBACK);
        write_row(&mut writer, transaction_id, merchant_id, &cards[index], random_amount(&mut rng, 5.0, 1_500.0), chargeback)?;
        transaction_id += 1;
        written += 1;
    }

    writer.flush()?;

    println!("Done. Wrote {} transactions.", written);

    Ok(())
}
