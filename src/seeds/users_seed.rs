// ==================== USERS SEED ====================
// One-time startup population of the users collection with synthetic data.
// Best-effort: a failed batch is logged and the loader moves on.

use crate::{database::MongoDB, models::User, services::user_service};
use rand::seq::SliceRandom;
use rand::Rng;
use std::env;

const EMAIL_DOMAIN: &str = "example.com";

const FIRST_NAMES: &[&str] = &[
    "Jane", "John", "Olena", "Taras", "Maria", "Petro", "Anna", "Dmytro", "Sofia", "Andriy",
    "José", "Renée", "Björn", "Chloé", "François", "Iryna", "Oksana", "Mykola", "Kateryna",
    "Viktor",
];

const LAST_NAMES: &[&str] = &[
    "Doe", "Smith", "Shevchenko", "Kovalenko", "Bondarenko", "Tkachenko", "Müller", "García",
    "Fernández", "Melnyk", "Kravchenko", "Boyko", "Álvarez", "Moreau", "Lindqvist", "Polishchuk",
];

/// Seeds synthetic users if the collection is empty. Called from `main`
/// after the database connection is established, before the server binds.
pub async fn seed_users(db: &MongoDB) {
    let count = user_service::count_users(db).await;

    if !should_seed(&count) {
        match count {
            Ok(n) => log::info!("🌱 Users seed: {} users already in DB — skipping", n),
            Err(e) => log::error!("🌱 Users seed: could not count users ({}) — skipping", e),
        }
        return;
    }

    let total = env_usize("SEED_TOTAL_USERS", 10);
    let batch = env_usize("SEED_BATCH_SIZE", 2).max(1);

    log::info!(
        "🌱 Users seed: generating {} synthetic users in batches of {}...",
        total,
        batch
    );

    let mut rng = rand::thread_rng();
    let mut inserted = 0;

    for (i, size) in batch_plan(total, batch).into_iter().enumerate() {
        let users: Vec<User> = (0..size).map(|_| synthetic_user(&mut rng)).collect();

        match user_service::bulk_create(db, &users).await {
            Ok(n) => {
                inserted += n;
                log::info!("   ✅ Seed batch {} inserted ({} users)", i + 1, n);
            }
            Err(e) => {
                log::error!("   ❌ Seed batch {} failed: {}", i + 1, e);
            }
        }
    }

    log::info!("🌱 Users seed: finished, {} users inserted", inserted);
}

/// Seed only runs against a store that is verifiably empty. A count failure
/// skips seeding rather than risking inserts into a populated collection.
fn should_seed(count: &Result<u64, crate::utils::error::AppError>) -> bool {
    matches!(count, Ok(0))
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Batch sizes covering `total` records: full batches of `batch` plus one
/// short remainder batch when `total` is not divisible.
pub fn batch_plan(total: usize, batch: usize) -> Vec<usize> {
    let mut plan = vec![batch; total / batch];
    if total % batch > 0 {
        plan.push(total % batch);
    }
    plan
}

fn synthetic_user(rng: &mut impl Rng) -> User {
    let first = FIRST_NAMES.choose(rng).unwrap();
    let last = LAST_NAMES.choose(rng).unwrap();
    let name = format!("{} {}", first, last);

    User {
        id: None,
        email: derive_email(&name),
        name,
        phone: random_phone(rng),
        birthday: random_birthday(rng),
    }
}

/// Deterministic email from a full name: lower-cased, diacritics stripped,
/// whitespace collapsed to dots, fixed domain.
pub fn derive_email(name: &str) -> String {
    let mut local = String::with_capacity(name.len());
    let mut pending_dot = false;

    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            pending_dot = !local.is_empty();
            continue;
        }
        if pending_dot {
            local.push('.');
            pending_dot = false;
        }
        local.push(strip_diacritic(c));
    }

    format!("{}@{}", local, EMAIL_DOMAIN)
}

fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Ukrainian-style number: +380 followed by 9 random digits.
pub fn random_phone(rng: &mut impl Rng) -> String {
    format!("+380{}", rng.gen_range(100_000_000u32..=999_999_999))
}

/// Random DD-MM-YYYY date; day capped at 28 so any month is valid.
pub fn random_birthday(rng: &mut impl Rng) -> String {
    let day = rng.gen_range(1..=28);
    let month = rng.gen_range(1..=12);
    let year = rng.gen_range(1970..=2005);
    format!("{:02}-{:02}-{}", day, month, year)
}
