//! Validates, repairs, and if necessary rebuilds the advisor's candidate
//! list. The advisor is an untrusted hint generator: every id it returns is
//! re-checked against the catalog and against the independently extracted
//! constraint, and an empty result after validation falls back to
//! deterministic catalog filters.

use crate::catalog::Catalog;
use crate::constraint::{Constraint, NOISE_CANCEL_HINT};
use crate::domain::product::{Category, Product};

/// How the candidate ids were obtained from the advisor text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    /// Strict JSON array of integers.
    Json,
    /// JSON parse failed; ids scraped from maximal digit runs.
    DigitScrape,
    /// Neither parse produced anything.
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Advisor ids survived catalog and category validation.
    Validated,
    /// Category validation emptied the list; candidates rebuilt from the
    /// expected category's products.
    CategoryFallback,
    /// Nothing usable remained; degraded result built from the whole catalog
    /// (or the category subset) with only the price filter.
    GlobalFallback,
}

#[derive(Clone, Debug)]
pub struct Reconciliation {
    /// Final products, catalog order.
    pub products: Vec<Product>,
    pub message: String,
    pub outcome: ReconcileOutcome,
    pub parse_mode: ParseMode,
}

pub fn reconcile(catalog: &Catalog, constraint: &Constraint, advisor_text: &str) -> Reconciliation {
    let (mut candidate_ids, parse_mode) = parse_candidate_ids(advisor_text);

    candidate_ids.retain(|id| catalog.exists(*id));

    let mut outcome = ReconcileOutcome::Validated;
    if let Some(category) = constraint.category {
        // Authoritative cross-category guard: runs even when the advisor's
        // output already claims to be category-correct.
        candidate_ids.retain(|id| {
            catalog.get(*id).map(|product| product.category == category).unwrap_or(false)
        });

        if candidate_ids.is_empty() {
            candidate_ids = category_fallback_ids(catalog, constraint, category);
            outcome = ReconcileOutcome::CategoryFallback;
        }
    }

    let products: Vec<Product> =
        catalog.by_ids(&candidate_ids).into_iter().cloned().collect();

    if products.is_empty() {
        let survivors = global_fallback(catalog, constraint);
        // The degraded message reports the survivor count before truncation.
        let message = format!("Found {} products matching your criteria:", survivors.len());
        let products = survivors.into_iter().take(5).cloned().collect();
        return Reconciliation {
            products,
            message,
            outcome: ReconcileOutcome::GlobalFallback,
            parse_mode,
        };
    }

    let message = match constraint.category {
        Some(category) => format!(
            "Found {} {}(s) matching your requirements:",
            products.len(),
            category.label()
        ),
        None => format!("Found {} product(s) matching your requirements:", products.len()),
    };

    Reconciliation { products, message, outcome, parse_mode }
}

/// Strict JSON first, digit scrape second, empty last. Parsed as `i64` so a
/// negative id survives parsing and dies at catalog validation instead of
/// sending the whole text to the digit scrape.
pub fn parse_candidate_ids(text: &str) -> (Vec<u32>, ParseMode) {
    if let Ok(ids) = serde_json::from_str::<Vec<i64>>(text) {
        let ids = ids.into_iter().filter_map(|id| u32::try_from(id).ok()).collect();
        return (ids, ParseMode::Json);
    }

    let scraped = scrape_digit_runs(text);
    if scraped.is_empty() {
        (Vec::new(), ParseMode::Empty)
    } else {
        (scraped, ParseMode::DigitScrape)
    }
}

fn scrape_digit_runs(text: &str) -> Vec<u32> {
    let mut ids = Vec::new();
    let mut run = String::new();

    for character in text.chars() {
        if character.is_ascii_digit() {
            run.push(character);
        } else if !run.is_empty() {
            push_parsed_run(&mut ids, &run);
            run.clear();
        }
    }
    if !run.is_empty() {
        push_parsed_run(&mut ids, &run);
    }

    ids
}

fn push_parsed_run(ids: &mut Vec<u32>, run: &str) {
    // Runs too long for u32 cannot name a catalog product; skip them.
    if let Ok(id) = run.parse() {
        ids.push(id);
    }
}

fn category_fallback_ids(
    catalog: &Catalog,
    constraint: &Constraint,
    category: Category,
) -> Vec<u32> {
    let mut survivors = catalog.by_category(category);

    if let Some(max_price) = constraint.max_price {
        survivors.retain(|product| product.price <= max_price);
    }
    if constraint.feature_hints.contains(NOISE_CANCEL_HINT) {
        survivors
            .retain(|product| product.specs.to_ascii_lowercase().contains(NOISE_CANCEL_HINT));
    }

    // Headphones keep every survivor when at least three remain; other
    // categories cap at the first five in catalog order.
    if category == Category::Headphones && survivors.len() >= 3 {
        survivors.iter().map(|product| product.id.0).collect()
    } else {
        survivors.iter().take(5).map(|product| product.id.0).collect()
    }
}

fn global_fallback<'a>(catalog: &'a Catalog, constraint: &Constraint) -> Vec<&'a Product> {
    let mut survivors: Vec<&Product> = match constraint.category {
        Some(category) => catalog.by_category(category),
        None => catalog.all().iter().collect(),
    };

    if let Some(max_price) = constraint.max_price {
        survivors.retain(|product| product.price <= max_price);
    }

    survivors
}
