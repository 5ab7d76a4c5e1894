//! Personal shopper: a fixed product catalog with preference scoring.
//!
//! Search only ranks products. Spending the chosen price happens through the
//! ledger (wallet deduction and/or an expense), see `Engine::purchase`.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::money;

/// Student discount applied when the shopper asks for it.
pub const STUDENT_DISCOUNT: f64 = 0.15;

const DEFAULT_MAX_PRICE: f64 = 100.0;
const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub vendor: String,
    pub price: f64,
    /// Kilometres from the user.
    pub distance: f64,
    pub rating: f64,
    pub student_discount: bool,
    pub halal: bool,
    pub vegan: bool,
    pub ethical: bool,
}

/// A product with its score and effective price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub ai_score: f64,
    pub discounted_price: f64,
    pub savings: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizeFor {
    Cheapest,
    Closest,
    BestRated,
    #[default]
    Balanced,
}

impl OptimizeFor {
    /// Weights for price, distance, rating and filter match.
    pub fn weights(self) -> Weights {
        let (price, distance, rating, filters) = match self {
            Self::Cheapest => (0.7, 0.1, 0.1, 0.1),
            Self::Closest => (0.1, 0.7, 0.1, 0.1),
            Self::BestRated => (0.1, 0.1, 0.7, 0.1),
            Self::Balanced => (0.4, 0.3, 0.2, 0.1),
        };
        Weights {
            price,
            distance,
            rating,
            filters,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    pub price: f64,
    pub distance: f64,
    pub rating: f64,
    pub filters: f64,
}

/// What the shopper is looking for. Boolean flags are hard requirements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub category: String,
    #[serde(default)]
    pub optimize_for: OptimizeFor,
    #[serde(default)]
    pub student_discount: bool,
    #[serde(default)]
    pub halal: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub ethical: bool,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub max_distance: Option<f64>,
}

impl Preferences {
    pub fn balanced(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    fn accepts(&self, product: &Product) -> bool {
        if self.student_discount && !product.student_discount {
            return false;
        }
        if self.halal && !product.halal {
            return false;
        }
        if self.vegan && !product.vegan {
            return false;
        }
        if self.ethical && !product.ethical {
            return false;
        }
        if let Some(max) = self.max_price.filter(|m| *m > 0.0)
            && product.price > max
        {
            return false;
        }
        if let Some(max) = self.max_distance.filter(|m| *m > 0.0)
            && product.distance > max
        {
            return false;
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub name: String,
    pub vendor: String,
    pub value: f64,
}

/// Side-by-side summary of search results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub total_options: usize,
    pub best_price: Pick,
    pub closest: Pick,
    pub highest_rated: Pick,
    pub recommendation: Pick,
    pub reasoning: String,
}

fn product(
    name: &str,
    vendor: &str,
    price: f64,
    distance: f64,
    rating: f64,
    flags: [bool; 4],
) -> Product {
    let [student_discount, halal, vegan, ethical] = flags;
    Product {
        name: name.to_string(),
        vendor: vendor.to_string(),
        price,
        distance,
        rating,
        student_discount,
        halal,
        vegan,
        ethical,
    }
}

static CATALOG: LazyLock<Vec<(&'static str, Vec<Product>)>> = LazyLock::new(|| {
    vec![
        (
            "food",
            vec![
                product("Pizza Combo", "Pizza Palace", 25.99, 2.3, 4.5, [true, false, false, true]),
                product("Veggie Pizza", "Green Slice", 22.50, 3.1, 4.7, [false, true, true, true]),
                product("Meat Lovers Pizza", "Quick Bite", 18.99, 1.5, 4.2, [true, true, false, false]),
                product("Gourmet Pizza", "Artisan Kitchen", 32.00, 4.0, 4.9, [false, false, false, true]),
                product("Grocery Bundle", "Fresh Mart", 45.00, 1.0, 4.3, [true, true, true, true]),
            ],
        ),
        (
            "venue",
            vec![
                product("Community Hall", "City Events", 150.00, 2.0, 4.4, [true, true, true, true]),
                product("Modern Conference Room", "Business Center", 200.00, 5.0, 4.6, [false, true, true, true]),
                product("Outdoor Space", "Park Services", 80.00, 3.5, 4.1, [true, true, true, true]),
            ],
        ),
        (
            "decor",
            vec![
                product("Balloon Package", "Party Plus", 35.00, 2.5, 4.3, [true, true, true, false]),
                product("Premium Decorations", "Elegant Affairs", 65.00, 4.5, 4.8, [false, true, true, true]),
                product("Budget Decor Set", "ValueDecorations", 25.00, 1.2, 3.9, [true, true, true, false]),
            ],
        ),
        (
            "misc",
            vec![
                product("Supplies Bundle", "Office Depot", 30.00, 2.0, 4.5, [true, true, true, true]),
                product("Tech Equipment Rental", "TechRent", 75.00, 3.0, 4.7, [true, true, true, true]),
            ],
        ),
    ]
});

/// Categories the catalog knows about.
pub fn catalog_categories() -> Vec<&'static str> {
    CATALOG.iter().map(|(category, _)| *category).collect()
}

fn catalog(category: &str) -> &'static [Product] {
    CATALOG
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, products)| products.as_slice())
        .unwrap_or_default()
}

/// Scores a product between 0 and 100.
pub fn score(product: &Product, prefs: &Preferences) -> f64 {
    let weights = prefs.optimize_for.weights();

    let max_price = prefs.max_price.filter(|m| *m > 0.0).unwrap_or(DEFAULT_MAX_PRICE);
    let price_score = (100.0 - product.price / max_price * 100.0).max(0.0);

    let max_distance = prefs
        .max_distance
        .filter(|m| *m > 0.0)
        .unwrap_or(DEFAULT_MAX_DISTANCE_KM);
    let distance_score = (100.0 - product.distance / max_distance * 100.0).max(0.0);

    let rating_score = product.rating / 5.0 * 100.0;

    let mut filter_score: f64 = 100.0;
    if prefs.student_discount && !product.student_discount {
        filter_score -= 30.0;
    }
    if prefs.halal && !product.halal {
        filter_score -= 40.0;
    }
    if prefs.vegan && !product.vegan {
        filter_score -= 40.0;
    }
    if prefs.ethical && !product.ethical {
        filter_score -= 25.0;
    }

    let total = price_score * weights.price
        + distance_score * weights.distance
        + rating_score * weights.rating
        + filter_score.max(0.0) * weights.filters;
    money::round_cents(total)
}

/// Filters, scores and ranks the catalog for `prefs.category`, best first.
pub fn search(prefs: &Preferences) -> Vec<ScoredProduct> {
    let mut scored: Vec<ScoredProduct> = catalog(&prefs.category)
        .iter()
        .filter(|p| prefs.accepts(p))
        .map(|p| {
            let savings = if p.student_discount && prefs.student_discount {
                money::round_cents(p.price * STUDENT_DISCOUNT)
            } else {
                0.0
            };
            ScoredProduct {
                product: p.clone(),
                ai_score: score(p, prefs),
                discounted_price: p.price - savings,
                savings,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.ai_score.total_cmp(&a.ai_score));
    scored
}

/// Explains why a product was picked.
pub fn reasoning(item: &ScoredProduct, prefs: Option<&Preferences>) -> String {
    let product = &item.product;
    let mut reasons = Vec::new();

    match prefs.map(|p| p.optimize_for) {
        Some(OptimizeFor::Cheapest) => reasons.push(format!(
            "Lowest price option at {}",
            money::format_amount(item.discounted_price)
        )),
        Some(OptimizeFor::Closest) => {
            reasons.push(format!("Closest option at {} km away", product.distance));
        }
        Some(OptimizeFor::BestRated) => {
            reasons.push(format!("Highest rated option ({}/5.0 stars)", product.rating));
        }
        Some(OptimizeFor::Balanced) | None => {}
    }
    if item.savings > 0.0 {
        reasons.push(format!(
            "Saved {} with student discount",
            money::format_amount(item.savings)
        ));
    }
    if let Some(prefs) = prefs {
        if prefs.ethical && product.ethical {
            reasons.push("Ethical brand as requested".to_string());
        }
        if prefs.vegan && product.vegan {
            reasons.push("Vegan-friendly option".to_string());
        }
        if prefs.halal && product.halal {
            reasons.push("Halal-certified".to_string());
        }
    }
    if product.rating >= 4.5 {
        reasons.push(format!("Excellent customer reviews ({}/5.0)", product.rating));
    }

    if reasons.is_empty() {
        "Best match for your preferences".to_string()
    } else {
        reasons.join(" • ")
    }
}

/// Builds the comparison report. `None` for an empty result list.
pub fn compare(products: &[ScoredProduct]) -> Option<Comparison> {
    let best_overall = products.first()?;
    let pick = |item: &ScoredProduct, value: f64| Pick {
        name: item.product.name.clone(),
        vendor: item.product.vendor.clone(),
        value,
    };

    let best_price = products
        .iter()
        .min_by(|a, b| a.discounted_price.total_cmp(&b.discounted_price))?;
    let closest = products
        .iter()
        .min_by(|a, b| a.product.distance.total_cmp(&b.product.distance))?;
    let highest_rated = products
        .iter()
        .max_by(|a, b| a.product.rating.total_cmp(&b.product.rating))?;

    Some(Comparison {
        total_options: products.len(),
        best_price: pick(best_price, best_price.discounted_price),
        closest: pick(closest, closest.product.distance),
        highest_rated: pick(highest_rated, highest_rated.product.rating),
        recommendation: pick(best_overall, best_overall.ai_score),
        reasoning: reasoning(best_overall, None),
    })
}

/// Human-friendly delivery estimate.
pub fn delivery_estimate(product: &Product) -> String {
    if product.distance < 5.0 {
        format!("{} minutes", (product.distance * 15.0).round())
    } else {
        "1-2 hours".to_string()
    }
}
