//! Personal shopper endpoints.

use api_types::shop::{Categories, Filter, OptimizeOption, Purchase};
use axum::{Json, extract::State};
use engine::{
    PurchaseOrder,
    shopper::{self, Comparison, Preferences, ScoredProduct},
};
use serde::Serialize;

use crate::{ServerError, server::ServerState, validate};

/// Results shown per search.
const MAX_RESULTS: usize = 10;

#[derive(Serialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
enum SearchStatus {
    Success,
    NoResults,
}

#[derive(Serialize)]
pub struct SearchResponse {
    status: SearchStatus,
    message: String,
    products: Vec<ScoredProduct>,
    comparison: Option<Comparison>,
}

pub async fn search(
    Json(mut prefs): Json<Preferences>,
) -> Result<Json<SearchResponse>, ServerError> {
    prefs.category = validate::non_empty(&prefs.category, "category")?.to_lowercase();

    let mut products = shopper::search(&prefs);
    let comparison = shopper::compare(&products);
    let (status, message) = if products.is_empty() {
        (
            SearchStatus::NoResults,
            "No products found matching your criteria. Try relaxing some filters.".to_string(),
        )
    } else {
        (
            SearchStatus::Success,
            format!(
                "AI found {} options. Showing best matches first.",
                products.len()
            ),
        )
    };
    products.truncate(MAX_RESULTS);

    Ok(Json(SearchResponse {
        status,
        message,
        products,
        comparison,
    }))
}

pub async fn purchase(
    State(state): State<ServerState>,
    Json(payload): Json<Purchase>,
) -> Result<Json<engine::Purchase>, ServerError> {
    let category = validate::non_empty(&payload.category, "category")?.to_lowercase();

    let order = PurchaseOrder {
        product_index: payload.product_index,
        category,
        auto_add_expense: payload.auto_add_expense,
        use_wallet: payload.use_wallet,
    };
    let purchase = state.run(move |engine| engine.purchase(order)).await??;
    Ok(Json(purchase))
}

pub async fn categories() -> Json<Categories> {
    let filter = |id: &str, name: &str| Filter {
        id: id.to_string(),
        name: name.to_string(),
        kind: "boolean".to_string(),
    };
    let option = |id: &str, name: &str, description: &str| OptimizeOption {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    };

    Json(Categories {
        categories: shopper::catalog_categories()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
        filters: vec![
            filter("student_discount", "Student Discount"),
            filter("halal", "Halal Certified"),
            filter("vegan", "Vegan"),
            filter("ethical", "Ethical Brands"),
        ],
        optimize_options: vec![
            option("balanced", "Balanced (AI Recommended)", "Best overall value"),
            option("cheapest", "Cheapest", "Lowest price"),
            option("closest", "Closest", "Nearest location"),
            option("best_rated", "Best Rated", "Highest customer ratings"),
        ],
    })
}
