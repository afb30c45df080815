//! Builds the strict advisor prompt: the full catalog, the per-category
//! permitted-id rules, and the output format contract. The id sets are
//! derived from the injected catalog so a substitute catalog keeps the prompt
//! and the reconciler's validation in agreement.

use shelfwise_core::catalog::Catalog;
use shelfwise_core::domain::product::Category;

pub fn build_recommendation_prompt(catalog: &Catalog, user_input: &str) -> String {
    let product_rows = catalog
        .all()
        .iter()
        .map(|product| {
            format!(
                "ID: {} | Name: {} | Category: {} | Price: ${} | Specs: {}",
                product.id.0, product.name, product.category, product.price, product.specs
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let headphone_ids = id_list(catalog, Category::Headphones);
    let tablet_ids = id_list(catalog, Category::Tablet);
    let phone_ids = id_list(catalog, Category::Phone);
    let laptop_ids = id_list(catalog, Category::Laptop);
    let smartwatch_ids = id_list(catalog, Category::Smartwatch);

    format!(
        r#"You are a strict product recommendation system. You must ONLY recommend products that EXACTLY match the user's requirements.

AVAILABLE PRODUCTS DATABASE:
{product_rows}

USER REQUEST: "{user_input}"

STRICT RULES:
1. If user asks for "headphones", "earphones", "earbuds", "airpods", or "audio", ONLY return IDs: {headphone_ids} (ALL OF THEM)
2. If user asks for "tablet" or "tablets", ONLY return IDs: {tablet_ids} (NEVER phones)
3. If user asks for "phone" or "mobile", ONLY return IDs from: {phone_ids}
4. If user asks for "laptop", ONLY return IDs from: {laptop_ids}
5. If user asks for "watch" or "smartwatch", ONLY return IDs: {smartwatch_ids}
6. Filter by price if user mentions budget (e.g., "under $500" means price <= 500)
7. If user mentions features (e.g., "noise cancelling"), prioritize products with those features BUT stay in same category
8. Return 3-5 most relevant product IDs from the CORRECT category
9. NEVER mix categories - if they ask for headphones, DO NOT include watches, phones, or anything else

RESPONSE FORMAT:
You must respond with ONLY a JSON array of product IDs that match ALL criteria.
Example: [13, 14, 15]

Do not include ANY text, explanations, or markdown. Just the JSON array.

YOUR RESPONSE:"#
    )
}

fn id_list(catalog: &Catalog, category: Category) -> String {
    catalog
        .by_category(category)
        .iter()
        .map(|product| product.id.0.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
